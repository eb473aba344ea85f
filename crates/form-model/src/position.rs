//! Document-order locators for nodes in a form tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One level of a node path.
///
/// `index` selects a child of the parent node. `instance` is set only for
/// steps that address a repeat: `Some(k)` is the k-th instance (zero-based),
/// and `Some(count)` addresses the repeat's "add another?" prompt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PathStep {
    pub index: usize,
    pub instance: Option<usize>,
}

impl PathStep {
    pub fn child(index: usize) -> Self {
        Self {
            index,
            instance: None,
        }
    }

    pub fn repeat(index: usize, instance: usize) -> Self {
        Self {
            index,
            instance: Some(instance),
        }
    }
}

/// An opaque, document-ordered location in the form.
///
/// The derived ordering is document order: the beginning sentinel sorts
/// first, the end sentinel last, and an ancestor precedes all of its
/// descendants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    BeginningOfForm,
    Node(Vec<PathStep>),
    EndOfForm,
}

impl Position {
    /// Builds a node position. An empty path is the beginning of the form.
    pub fn node(steps: Vec<PathStep>) -> Self {
        if steps.is_empty() {
            Self::BeginningOfForm
        } else {
            Self::Node(steps)
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        match self {
            Self::Node(steps) => steps,
            Self::BeginningOfForm | Self::EndOfForm => &[],
        }
    }

    /// Nesting level; sentinels have depth zero.
    pub fn depth(&self) -> usize {
        self.steps().len()
    }

    pub fn is_beginning(&self) -> bool {
        matches!(self, Self::BeginningOfForm)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndOfForm)
    }

    pub fn is_in_form(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// True when `self` is nested (strictly) under `ancestor`.
    pub fn is_sub_position_of(&self, ancestor: &Position) -> bool {
        let (Self::Node(own), Self::Node(theirs)) = (self, ancestor) else {
            return false;
        };
        own.len() > theirs.len() && own.starts_with(theirs)
    }

    /// The enclosing node, or `None` for top-level nodes and sentinels.
    pub fn parent(&self) -> Option<Position> {
        match self {
            Self::Node(steps) if steps.len() > 1 => {
                Some(Self::Node(steps[..steps.len() - 1].to_vec()))
            }
            _ => None,
        }
    }

    /// Every enclosing node from the outermost inward, ending with `self`.
    pub fn ancestors(&self) -> Vec<Position> {
        let steps = self.steps();
        (1..=steps.len())
            .map(|len| Self::Node(steps[..len].to_vec()))
            .collect()
    }

    /// The position of a child of this node.
    pub fn child(&self, step: PathStep) -> Position {
        let mut steps = self.steps().to_vec();
        steps.push(step);
        Self::Node(steps)
    }

    /// The same parent with the last step replaced.
    pub fn with_last(&self, step: PathStep) -> Position {
        let mut steps = self.steps().to_vec();
        steps.pop();
        steps.push(step);
        Self::Node(steps)
    }

    pub fn last_step(&self) -> Option<PathStep> {
        self.steps().last().copied()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginningOfForm => f.write_str("BOF"),
            Self::EndOfForm => f.write_str("EOF"),
            Self::Node(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{}", step.index)?;
                    if let Some(instance) = step.instance {
                        write!(f, "[{instance}]")?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(steps: &[(usize, Option<usize>)]) -> Position {
        Position::node(
            steps
                .iter()
                .map(|&(index, instance)| PathStep { index, instance })
                .collect(),
        )
    }

    #[test]
    fn display_renders_instances() {
        assert_eq!(pos(&[(0, None), (2, Some(1)), (0, None)]).to_string(), "0/2[1]/0");
        assert_eq!(Position::BeginningOfForm.to_string(), "BOF");
        assert_eq!(Position::EndOfForm.to_string(), "EOF");
    }

    #[test]
    fn empty_path_is_beginning() {
        assert!(Position::node(Vec::new()).is_beginning());
    }
}
