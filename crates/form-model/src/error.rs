use thiserror::Error;

use crate::Position;

/// Failures reported by a form model operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("position {position} does not exist in the form")]
    UnknownPosition { position: Position },
    #[error("position {position} is not a repeat prompt")]
    NotARepeatPrompt { position: Position },
    #[error("position {position} is not inside a repeat instance")]
    NotInRepeat { position: Position },
    #[error("repeat '{name}' already has the maximum of {limit} instances")]
    RepeatLimitReached { name: String, limit: usize },
    #[error("repeat '{name}' has a fixed instance count")]
    FixedRepeatCount { name: String },
    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
