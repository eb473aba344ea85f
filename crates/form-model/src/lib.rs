//! Shared vocabulary for form navigation: positions, node kinds, answers,
//! validation outcomes and the [`FormModel`] boundary.

pub mod ancestry;
pub mod answer;
pub mod error;
pub mod kinds;
pub mod model;
pub mod position;

pub use ancestry::AncestorChain;
pub use answer::AnswerValue;
pub use error::{ModelError, Result};
pub use kinds::{FailureKind, NodeKind, ValidationOutcome};
pub use model::FormModel;
pub use position::{PathStep, Position};
