use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Position;

/// The kind of content found at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BeginningOfForm,
    EndOfForm,
    Question,
    Group,
    Repeat,
    /// The "add another?" junction that follows the instances of a repeat.
    RepeatInstancePrompt,
    /// Never rendered; stepping passes straight through it.
    RepeatJuncture,
}

impl NodeKind {
    pub fn is_group_like(self) -> bool {
        matches!(self, Self::Group | Self::Repeat)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeginningOfForm => "beginning_of_form",
            Self::EndOfForm => "end_of_form",
            Self::Question => "question",
            Self::Group => "group",
            Self::Repeat => "repeat",
            Self::RepeatInstancePrompt => "repeat_prompt",
            Self::RepeatJuncture => "repeat_juncture",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an answer or a whole document failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConstraintViolated,
    RequiredButEmpty,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstraintViolated => f.write_str("constraint violated"),
            Self::RequiredButEmpty => f.write_str("required but empty"),
        }
    }
}

/// Result of committing answers or validating the document.
///
/// Validation failures are expected and user-correctable, so they are
/// reported as data rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Failed { position: Position, kind: FailureKind },
}

impl ValidationOutcome {
    pub fn failed(position: Position, kind: FailureKind) -> Self {
        Self::Failed { position, kind }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failure(&self) -> Option<(&Position, FailureKind)> {
        match self {
            Self::Valid => None,
            Self::Failed { position, kind } => Some((position, *kind)),
        }
    }
}
