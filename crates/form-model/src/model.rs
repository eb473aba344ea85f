//! The boundary between the navigation engine and the form evaluation library.

use std::cmp::Ordering;

use crate::{AncestorChain, AnswerValue, FailureKind, ModelError, NodeKind, Position};

/// Operations the navigation engine needs from an evaluated form document.
///
/// `next` and `previous` are raw document-order steps: they visit every
/// node, relevant or not. Skipping irrelevant nodes is left to the caller.
pub trait FormModel {
    /// The kind of node at `position`.
    fn event_at(&self, position: &Position) -> NodeKind;

    /// The next position in document order.
    ///
    /// With `into_groups` false, the subtree of a group or repeat instance at
    /// `from` is skipped. Stepping from the last node yields the end sentinel.
    fn next(&self, from: &Position, into_groups: bool) -> Position;

    /// The previous position in document order (the deepest last descendant
    /// of the previous sibling, or the parent).
    fn previous(&self, from: &Position) -> Position;

    fn compare(&self, a: &Position, b: &Position) -> Ordering {
        a.cmp(b)
    }

    fn is_sub_position(&self, ancestor: &Position, descendant: &Position) -> bool {
        descendant.is_sub_position_of(ancestor)
    }

    /// Whether the node and all of its ancestors are currently relevant.
    fn is_relevant(&self, position: &Position) -> bool;

    /// The display hint of a group or repeat (for example `"field-list"`).
    fn appearance(&self, position: &Position) -> Option<&str>;

    fn label(&self, position: &Position) -> Option<String>;

    fn ancestor_chain(&self, position: &Position) -> AncestorChain {
        AncestorChain::new(position.ancestors())
    }

    /// Stores an answer. With `validate`, required and constraint checks run
    /// first and a failing answer is not stored.
    fn answer(
        &mut self,
        position: &Position,
        value: Option<AnswerValue>,
        validate: bool,
    ) -> Result<(), FailureKind>;

    fn answer_at(&self, position: &Position) -> Option<AnswerValue>;

    fn constraint_message(&self, _position: &Position) -> Option<String> {
        None
    }

    /// Number of existing instances of the repeat addressed by `position`
    /// (an instance or its prompt).
    fn repeat_instance_count(&self, position: &Position) -> usize;

    /// Materializes a new instance at a repeat prompt.
    fn create_repeat_instance(&mut self, at: &Position) -> Result<(), ModelError>;

    /// Removes the innermost repeat instance enclosing `at` and returns a
    /// position the engine can keep stepping from.
    fn delete_repeat_instance(&mut self, at: &Position) -> Result<Position, ModelError>;

    /// Checks the whole document and returns the first failure in document order.
    fn validate_document(&mut self, mark_completed: bool) -> Option<(Position, FailureKind)>;
}
