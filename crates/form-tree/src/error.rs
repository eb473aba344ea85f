use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a form definition.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to read form definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid form definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node name must not be empty")]
    EmptyName,
    #[error("duplicate node name: {name}")]
    DuplicateName { name: String },
    #[error("question '{question}' has an invalid pattern: {source}")]
    InvalidPattern {
        question: String,
        #[source]
        source: regex::Error,
    },
    #[error("'{referenced_by}' refers to unknown question '{name}'")]
    UnknownQuestion { name: String, referenced_by: String },
}

pub type Result<T> = std::result::Result<T, TreeError>;
