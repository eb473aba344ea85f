use form_model::{ModelError, NodeKind, Position};
use thiserror::Error;

/// Errors raised by navigation operations.
///
/// Validation failures are not errors; they are returned as
/// [`ValidationOutcome`](form_model::ValidationOutcome) values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The form cannot be rendered as designed and must be fixed.
    #[error("form design error at {position}: {reason}")]
    FormDesign { position: Position, reason: String },

    /// A model operation was rejected; the session is unchanged.
    #[error("{message}")]
    NonFatal { message: String },

    /// The position does not denote a screen.
    #[error("position {position} ({kind}) is not a screen")]
    NotRenderable { position: Position, kind: NodeKind },
}

impl EngineError {
    pub fn is_form_design(&self) -> bool {
        matches!(self, Self::FormDesign { .. })
    }
}

impl From<ModelError> for EngineError {
    fn from(error: ModelError) -> Self {
        Self::NonFatal {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
