//! The in-memory form document.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use form_model::{
    AnswerValue, FailureKind, FormModel, ModelError, NodeKind, PathStep, Position,
};
use tracing::{debug, info, warn};

use crate::compile::{Node, QuestionRules, Shape, compile, node_at};
use crate::definition::{Condition, FormDefinition};
use crate::error::{Result, TreeError};

/// What a position addresses once resolved against the current instance.
#[derive(Clone, Copy)]
pub(crate) enum Resolved<'a> {
    Question(&'a Node),
    Group(&'a Node),
    RepeatInstance(&'a Node),
    Prompt(&'a Node),
}

impl<'a> Resolved<'a> {
    pub fn node(self) -> &'a Node {
        match self {
            Self::Question(node)
            | Self::Group(node)
            | Self::RepeatInstance(node)
            | Self::Prompt(node) => node,
        }
    }

    fn kind(self) -> NodeKind {
        match self {
            Self::Question(_) => NodeKind::Question,
            Self::Group(_) => NodeKind::Group,
            Self::RepeatInstance(_) => NodeKind::Repeat,
            Self::Prompt(_) => NodeKind::RepeatInstancePrompt,
        }
    }

    fn has_children(self) -> bool {
        matches!(self, Self::Group(_) | Self::RepeatInstance(_))
    }
}

/// A form definition together with the answers and repeat instances of one
/// filling session.
pub struct FormTree {
    title: String,
    pub(crate) nodes: Vec<Node>,
    names: HashMap<String, Vec<usize>>,
    pub(crate) answers: BTreeMap<Position, AnswerValue>,
    /// Instance counts keyed by the repeat's position without an instance.
    /// Untouched repeats fall back to their initial count.
    repeat_counts: BTreeMap<Position, usize>,
    completed: bool,
}

impl FormTree {
    pub fn from_definition(definition: FormDefinition) -> Result<Self> {
        let compiled = compile(definition.children)?;
        Ok(Self {
            title: definition.title,
            nodes: compiled.nodes,
            names: compiled.names,
            answers: BTreeMap::new(),
            repeat_counts: BTreeMap::new(),
            completed: false,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let definition: FormDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn resolve(&self, position: &Position) -> Option<Resolved<'_>> {
        let steps = position.steps();
        let mut children = &self.nodes;
        let mut resolved = None;
        for (depth, step) in steps.iter().enumerate() {
            if resolved.is_some_and(|found: Resolved<'_>| !found.has_children()) {
                return None;
            }
            let node = children.get(step.index)?;
            let last = depth + 1 == steps.len();
            resolved = Some(match (&node.shape, step.instance) {
                (Shape::Question(_), None) => Resolved::Question(node),
                (Shape::Group, None) => Resolved::Group(node),
                (Shape::Repeat(rules), Some(instance)) => {
                    let count = self.count_of(&Position::node(steps[..depth].to_vec()), step.index);
                    if instance < count {
                        Resolved::RepeatInstance(node)
                    } else if instance == count && rules.has_prompt() && last {
                        Resolved::Prompt(node)
                    } else {
                        return None;
                    }
                }
                _ => return None,
            });
            children = &node.children;
        }
        resolved
    }

    fn children_of(&self, parent: &Position) -> Option<&[Node]> {
        if parent.is_beginning() {
            return Some(&self.nodes);
        }
        match self.resolve(parent)? {
            Resolved::Group(node) | Resolved::RepeatInstance(node) => Some(&node.children),
            Resolved::Question(_) | Resolved::Prompt(_) => None,
        }
    }

    /// The repeat's key: its position with the instance stripped.
    fn repeat_key(parent: &Position, index: usize) -> Position {
        parent.child(PathStep::child(index))
    }

    /// Instances of the repeat at child `index` of `parent`.
    fn count_of(&self, parent: &Position, index: usize) -> usize {
        let path: Vec<usize> = parent
            .steps()
            .iter()
            .map(|step| step.index)
            .chain(std::iter::once(index))
            .collect();
        let Some(Shape::Repeat(rules)) = node_at(&self.nodes, &path).map(|node| &node.shape) else {
            return 0;
        };
        if let Some(fixed) = rules.fixed {
            return fixed;
        }
        self.repeat_counts
            .get(&Self::repeat_key(parent, index))
            .copied()
            .unwrap_or(rules.initial)
    }

    /// The first position among children `start..` of `parent`.
    fn first_entry(&self, parent: &Position, start: usize) -> Option<Position> {
        let children = self.children_of(parent)?;
        for (index, node) in children.iter().enumerate().skip(start) {
            match &node.shape {
                Shape::Question(_) | Shape::Group => {
                    return Some(parent.child(PathStep::child(index)));
                }
                Shape::Repeat(rules) => {
                    if self.count_of(parent, index) > 0 || rules.has_prompt() {
                        return Some(parent.child(PathStep::repeat(index, 0)));
                    }
                }
            }
        }
        None
    }

    /// The last position among children `..end` of `parent`.
    fn last_entry(&self, parent: &Position, end: usize) -> Option<Position> {
        let children = self.children_of(parent)?;
        for index in (0..end.min(children.len())).rev() {
            match &children[index].shape {
                Shape::Question(_) | Shape::Group => {
                    return Some(parent.child(PathStep::child(index)));
                }
                Shape::Repeat(rules) => {
                    let count = self.count_of(parent, index);
                    if rules.has_prompt() {
                        return Some(parent.child(PathStep::repeat(index, count)));
                    }
                    if count > 0 {
                        return Some(parent.child(PathStep::repeat(index, count - 1)));
                    }
                }
            }
        }
        None
    }

    fn deepest_last(&self, mut position: Position) -> Position {
        while let Some(child) = self.last_entry(&position, usize::MAX) {
            position = child;
        }
        position
    }

    fn next_sibling_or_up(&self, from: &Position) -> Position {
        let mut current = from.clone();
        loop {
            let Some(step) = current.last_step() else {
                return Position::EndOfForm;
            };
            let parent = current.parent().unwrap_or(Position::BeginningOfForm);
            if let Some(instance) = step.instance {
                let count = self.count_of(&parent, step.index);
                let has_prompt = matches!(
                    self.resolve(&current),
                    Some(Resolved::RepeatInstance(node)) if matches!(&node.shape, Shape::Repeat(rules) if rules.has_prompt())
                );
                if instance + 1 < count || (instance + 1 == count && has_prompt) {
                    return current.with_last(PathStep::repeat(step.index, instance + 1));
                }
            }
            if let Some(next) = self.first_entry(&parent, step.index + 1) {
                return next;
            }
            if parent.is_beginning() {
                return Position::EndOfForm;
            }
            current = parent;
        }
    }

    /// Finds the position of question `name` as seen from `context`.
    ///
    /// Repeat instances on the question's path are taken from the context
    /// while the two paths agree; a repeat the context is not inside makes
    /// the lookup ambiguous.
    fn locate(&self, name: &str, context: &Position) -> Option<Position> {
        let path = self.names.get(name)?;
        let context_steps = context.steps();
        let mut steps = Vec::with_capacity(path.len());
        let mut shared = true;
        for (depth, &index) in path.iter().enumerate() {
            let node = node_at(&self.nodes, &path[..=depth])?;
            let context_step = context_steps.get(depth).filter(|step| step.index == index);
            shared = shared && context_step.is_some();
            let instance = match node.shape {
                Shape::Repeat(_) => Some(context_step.filter(|_| shared)?.instance?),
                Shape::Question(_) | Shape::Group => None,
            };
            steps.push(PathStep { index, instance });
        }
        Some(Position::node(steps))
    }

    fn condition_holds(&self, condition: &Condition, context: &Position) -> bool {
        let answer = self
            .locate(condition.question(), context)
            .and_then(|position| self.answers.get(&position));
        match condition {
            Condition::Answered { .. } => answer.is_some_and(|value| !value.is_empty()),
            Condition::Equals { value, .. } => answer.is_some_and(|answer| value_matches(answer, value)),
            Condition::NotEquals { value, .. } => !answer.is_some_and(|answer| value_matches(answer, value)),
        }
    }

    fn check_answer(rules: &QuestionRules, value: Option<&AnswerValue>) -> Option<FailureKind> {
        match value.filter(|value| !value.is_empty()) {
            None if rules.required => Some(FailureKind::RequiredButEmpty),
            None => None,
            Some(value) => match &rules.check {
                Some(check) if !check.accepts(value) => Some(FailureKind::ConstraintViolated),
                _ => None,
            },
        }
    }

    fn question_rules(&self, position: &Position) -> Option<&QuestionRules> {
        match self.resolve(position)? {
            Resolved::Question(Node {
                shape: Shape::Question(rules),
                ..
            }) => Some(rules),
            _ => None,
        }
    }

    /// The first relevant question or prompt at or after `slot`.
    ///
    /// After a delete the slot holds the next instance or the repeat's
    /// prompt; a bare instance is not something a screen can show.
    fn landing_after_delete(&self, slot: Position) -> Position {
        let mut position = slot;
        while position.is_in_form() {
            let relevant = self.is_relevant(&position);
            if relevant
                && matches!(
                    self.event_at(&position),
                    NodeKind::Question | NodeKind::RepeatInstancePrompt
                )
            {
                break;
            }
            position = self.next(&position, relevant);
        }
        position
    }

    /// Drops `removed` and moves later instances of the same repeat down one slot.
    fn shift_after_delete<V>(map: BTreeMap<Position, V>, removed: &Position) -> BTreeMap<Position, V> {
        let depth = removed.depth() - 1;
        let Some(removed_step) = removed.last_step() else {
            return map;
        };
        let removed_instance = removed_step.instance.unwrap_or_default();
        map.into_iter()
            .filter(|(key, _)| key != removed && !key.is_sub_position_of(removed))
            .map(|(key, value)| {
                let steps = key.steps();
                let same_repeat = steps.len() > depth
                    && steps[..depth] == removed.steps()[..depth]
                    && steps[depth].index == removed_step.index;
                match steps.get(depth).and_then(|step| step.instance) {
                    Some(instance) if same_repeat && instance > removed_instance => {
                        let mut shifted = steps.to_vec();
                        shifted[depth].instance = Some(instance - 1);
                        (Position::node(shifted), value)
                    }
                    _ => (key, value),
                }
            })
            .collect()
    }
}

fn value_matches(answer: &AnswerValue, expected: &AnswerValue) -> bool {
    match (answer, expected) {
        (AnswerValue::Choices(choices), AnswerValue::Text(text)) => choices.contains(text),
        _ => match (answer.as_number(), expected.as_number()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => answer.to_string() == expected.to_string(),
        },
    }
}

impl FormModel for FormTree {
    fn event_at(&self, position: &Position) -> NodeKind {
        match position {
            Position::BeginningOfForm => NodeKind::BeginningOfForm,
            Position::EndOfForm => NodeKind::EndOfForm,
            Position::Node(_) => match self.resolve(position) {
                Some(resolved) => resolved.kind(),
                None => {
                    warn!(position = %position, "event requested for a position that does not exist");
                    NodeKind::EndOfForm
                }
            },
        }
    }

    fn next(&self, from: &Position, into_groups: bool) -> Position {
        match from {
            Position::BeginningOfForm => self
                .first_entry(&Position::BeginningOfForm, 0)
                .unwrap_or(Position::EndOfForm),
            Position::EndOfForm => Position::EndOfForm,
            Position::Node(_) => {
                let Some(resolved) = self.resolve(from) else {
                    warn!(position = %from, "stepping from a position that does not exist");
                    return Position::EndOfForm;
                };
                if into_groups && resolved.has_children() {
                    if let Some(child) = self.first_entry(from, 0) {
                        return child;
                    }
                }
                self.next_sibling_or_up(from)
            }
        }
    }

    fn previous(&self, from: &Position) -> Position {
        match from {
            Position::BeginningOfForm => Position::BeginningOfForm,
            Position::EndOfForm => self
                .last_entry(&Position::BeginningOfForm, usize::MAX)
                .map_or(Position::BeginningOfForm, |last| self.deepest_last(last)),
            Position::Node(_) => {
                let Some(step) = from.last_step() else {
                    return Position::BeginningOfForm;
                };
                if let Some(instance) = step.instance.filter(|instance| *instance > 0) {
                    return self.deepest_last(from.with_last(PathStep::repeat(step.index, instance - 1)));
                }
                let parent = from.parent().unwrap_or(Position::BeginningOfForm);
                match self.last_entry(&parent, step.index) {
                    Some(sibling) => self.deepest_last(sibling),
                    None => parent,
                }
            }
        }
    }

    fn is_relevant(&self, position: &Position) -> bool {
        if !position.is_in_form() {
            return true;
        }
        if self.resolve(position).is_none() {
            return false;
        }
        position.ancestors().iter().all(|ancestor| {
            self.resolve(ancestor)
                .and_then(|resolved| resolved.node().relevant.as_ref())
                .is_none_or(|condition| self.condition_holds(condition, position))
        })
    }

    fn appearance(&self, position: &Position) -> Option<&str> {
        self.resolve(position)?.node().appearance.as_deref()
    }

    fn label(&self, position: &Position) -> Option<String> {
        let node = self.resolve(position)?.node();
        Some(node.label.clone().unwrap_or_else(|| node.name.clone()))
    }

    fn answer(
        &mut self,
        position: &Position,
        value: Option<AnswerValue>,
        validate: bool,
    ) -> std::result::Result<(), FailureKind> {
        let Some(rules) = self.question_rules(position) else {
            warn!(position = %position, "ignoring answer for a position that is not a question");
            return Ok(());
        };
        if validate {
            if let Some(failure) = Self::check_answer(rules, value.as_ref()) {
                debug!(position = %position, failure = %failure, "answer rejected");
                return Err(failure);
            }
        }
        match value.filter(|value| !value.is_empty()) {
            Some(value) => {
                self.answers.insert(position.clone(), value);
            }
            None => {
                self.answers.remove(position);
            }
        }
        Ok(())
    }

    fn answer_at(&self, position: &Position) -> Option<AnswerValue> {
        self.answers.get(position).cloned()
    }

    fn constraint_message(&self, position: &Position) -> Option<String> {
        self.question_rules(position)?.message.clone()
    }

    fn repeat_instance_count(&self, position: &Position) -> usize {
        match position.last_step() {
            Some(step) if step.instance.is_some() => {
                let parent = position.parent().unwrap_or(Position::BeginningOfForm);
                self.count_of(&parent, step.index)
            }
            _ => 0,
        }
    }

    fn create_repeat_instance(&mut self, at: &Position) -> form_model::Result<()> {
        let Some(Resolved::Prompt(node)) = self.resolve(at) else {
            return Err(ModelError::NotARepeatPrompt {
                position: at.clone(),
            });
        };
        let (Some(step), Shape::Repeat(rules)) = (at.last_step(), &node.shape) else {
            return Err(ModelError::NotARepeatPrompt {
                position: at.clone(),
            });
        };
        let parent = at.parent().unwrap_or(Position::BeginningOfForm);
        let count = self.count_of(&parent, step.index);
        if let Some(limit) = rules.max.filter(|limit| count >= *limit) {
            return Err(ModelError::RepeatLimitReached {
                name: node.name.clone(),
                limit,
            });
        }
        info!(repeat = %node.name, instance = count + 1, "created repeat instance");
        self.repeat_counts
            .insert(Self::repeat_key(&parent, step.index), count + 1);
        Ok(())
    }

    fn delete_repeat_instance(&mut self, at: &Position) -> form_model::Result<Position> {
        let instance = at
            .ancestors()
            .into_iter()
            .rev()
            .find(|candidate| matches!(self.resolve(candidate), Some(Resolved::RepeatInstance(_))))
            .ok_or_else(|| ModelError::NotInRepeat {
                position: at.clone(),
            })?;
        let Some(node) = self.resolve(&instance).map(Resolved::node) else {
            return Err(ModelError::UnknownPosition { position: instance });
        };
        if matches!(&node.shape, Shape::Repeat(rules) if rules.fixed.is_some()) {
            return Err(ModelError::FixedRepeatCount {
                name: node.name.clone(),
            });
        }
        let name = node.name.clone();
        let Some(step) = instance.last_step() else {
            return Err(ModelError::UnknownPosition { position: instance });
        };
        let parent = instance.parent().unwrap_or(Position::BeginningOfForm);
        let count = self.count_of(&parent, step.index);

        self.answers = Self::shift_after_delete(std::mem::take(&mut self.answers), &instance);
        self.repeat_counts =
            Self::shift_after_delete(std::mem::take(&mut self.repeat_counts), &instance);
        self.repeat_counts
            .insert(Self::repeat_key(&parent, step.index), count.saturating_sub(1));
        let landing = self.landing_after_delete(instance.clone());
        info!(repeat = %name, position = %instance, to = %landing, "deleted repeat instance");
        Ok(landing)
    }

    fn validate_document(&mut self, mark_completed: bool) -> Option<(Position, FailureKind)> {
        let mut position = self.next(&Position::BeginningOfForm, true);
        while !position.is_end() {
            if !self.is_relevant(&position) {
                position = self.next(&position, false);
                continue;
            }
            if let Some(rules) = self.question_rules(&position) {
                if let Some(failure) = Self::check_answer(rules, self.answers.get(&position)) {
                    return Some((position, failure));
                }
            }
            position = self.next(&position, true);
        }
        if mark_completed {
            self.completed = true;
        }
        None
    }
}
