//! Name-based references and the submission payload.
//!
//! References look like `/household/member[2]/age`; repeat instances are
//! one-based and a repeat prompt renders as `[new]`.

use form_model::{FormModel, PathStep, Position};
use serde_json::{Map, Value, json};

use crate::compile::{Node, Shape};
use crate::tree::{FormTree, Resolved};

const PROMPT_MARKER: &str = "new";

impl FormTree {
    /// Renders a position as a name path.
    pub fn reference(&self, position: &Position) -> Option<String> {
        match position {
            Position::BeginningOfForm => return Some("/".to_string()),
            Position::EndOfForm => return None,
            Position::Node(_) => {}
        }
        let is_prompt = matches!(self.resolve(position)?, Resolved::Prompt(_));
        let steps = position.steps();
        let mut children = &self.nodes;
        let mut out = String::new();
        for (depth, step) in steps.iter().enumerate() {
            let node = children.get(step.index)?;
            out.push('/');
            out.push_str(&node.name);
            if let Some(instance) = step.instance {
                if is_prompt && depth + 1 == steps.len() {
                    out.push_str(&format!("[{PROMPT_MARKER}]"));
                } else {
                    out.push_str(&format!("[{}]", instance + 1));
                }
            }
            children = &node.children;
        }
        Some(out)
    }

    /// Renders the repeat addressed by an instance or prompt position,
    /// without the trailing instance.
    pub fn repeat_reference(&self, position: &Position) -> Option<String> {
        position.last_step()?.instance?;
        let full = self.reference(position)?;
        let cut = full.rfind('[')?;
        Some(full[..cut].to_string())
    }

    /// Parses a reference back into a position.
    ///
    /// A repeat segment without an instance addresses its first instance.
    pub fn find(&self, reference: &str) -> Option<Position> {
        let trimmed = reference.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Some(Position::BeginningOfForm);
        }
        let mut children: &[Node] = &self.nodes;
        let mut steps = Vec::new();
        for segment in trimmed.split('/') {
            let (name, instance) = parse_segment(segment)?;
            let index = children.iter().position(|node| node.name == name)?;
            let node = &children[index];
            let step = match (&node.shape, instance) {
                (Shape::Repeat(_), Segment::Instance(n)) if n > 0 => PathStep::repeat(index, n - 1),
                (Shape::Repeat(_), Segment::Bare) => PathStep::repeat(index, 0),
                (Shape::Repeat(_), Segment::Prompt) => {
                    let parent = Position::node(steps.clone());
                    let count = self.repeat_instance_count(&parent.child(PathStep::repeat(index, 0)));
                    PathStep::repeat(index, count)
                }
                (Shape::Question(_) | Shape::Group, Segment::Bare) => PathStep::child(index),
                _ => return None,
            };
            steps.push(step);
            children = &node.children;
        }
        let position = Position::node(steps);
        self.resolve(&position).map(|_| position)
    }

    /// The submission payload: every relevant answer keyed by reference.
    pub fn payload(&self) -> Value {
        let mut answers = Map::new();
        for (position, value) in &self.answers {
            if !self.is_relevant(position) {
                continue;
            }
            let Some(reference) = self.reference(position) else {
                continue;
            };
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            answers.insert(reference, value);
        }
        json!({
            "title": self.title(),
            "completed": self.is_completed(),
            "answers": Value::Object(answers),
        })
    }
}

enum Segment {
    Bare,
    Instance(usize),
    Prompt,
}

fn parse_segment(segment: &str) -> Option<(&str, Segment)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Segment::Bare));
    };
    let name = &segment[..open];
    let inner = segment[open + 1..].strip_suffix(']')?;
    if inner == PROMPT_MARKER {
        return Some((name, Segment::Prompt));
    }
    Some((name, Segment::Instance(inner.parse().ok()?)))
}
