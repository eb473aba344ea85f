//! In-memory form document.
//!
//! [`FormTree`] compiles a JSON [`FormDefinition`] and implements
//! [`form_model::FormModel`] over it: raw document-order stepping, repeat
//! instances with "add another?" prompts, declarative relevance conditions
//! and per-question constraints.
//!
//! ```
//! use form_model::{FormModel, NodeKind, Position};
//! use form_tree::FormTree;
//!
//! let tree = FormTree::from_json(
//!     r#"{ "title": "Visit", "children": [ { "type": "question", "name": "age" } ] }"#,
//! )
//! .unwrap();
//! let first = tree.next(&Position::BeginningOfForm, true);
//! assert_eq!(tree.event_at(&first), NodeKind::Question);
//! assert_eq!(tree.reference(&first).as_deref(), Some("/age"));
//! ```

mod compile;
pub mod definition;
pub mod error;
mod reference;
mod tree;

pub use definition::{
    Condition, Constraint, FormDefinition, GroupDef, NodeDef, QuestionDef, RepeatDef,
};
pub use error::{Result, TreeError};
pub use tree::FormTree;
