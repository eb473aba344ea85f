//! Field-list classification.
//!
//! A group or repeat whose display hint carries the `field-list` token is
//! shown as one screen holding all of its questions instead of being
//! traversed question by question.

use form_model::{FormModel, NodeKind, Position};

/// Display-hint token that marks a field-list group.
pub const FIELD_LIST_MARKER: &str = "field-list";

/// Whether an appearance attribute contains the field-list token.
pub fn has_field_list_marker(appearance: &str) -> bool {
    appearance
        .split_whitespace()
        .any(|token| token.eq_ignore_ascii_case(FIELD_LIST_MARKER))
}

/// True for a group or repeat flagged as a field-list.
///
/// Questions, prompts and sentinels are never field-lists. Emptiness does
/// not matter here.
pub fn is_field_list<M: FormModel + ?Sized>(model: &M, position: &Position) -> bool {
    match model.event_at(position) {
        NodeKind::Group | NodeKind::Repeat => model
            .appearance(position)
            .is_some_and(has_field_list_marker),
        NodeKind::BeginningOfForm
        | NodeKind::EndOfForm
        | NodeKind::Question
        | NodeKind::RepeatInstancePrompt
        | NodeKind::RepeatJuncture => false,
    }
}

/// True for a question with any field-list ancestor, or a field-list
/// group itself.
pub fn is_in_field_list<M: FormModel + ?Sized>(model: &M, position: &Position) -> bool {
    match model.event_at(position) {
        NodeKind::Question => model
            .ancestor_chain(position)
            .enclosing()
            .iter()
            .any(|ancestor| is_field_list(model, ancestor)),
        NodeKind::Group | NodeKind::Repeat => is_field_list(model, position),
        NodeKind::BeginningOfForm
        | NodeKind::EndOfForm
        | NodeKind::RepeatInstancePrompt
        | NodeKind::RepeatJuncture => false,
    }
}

/// The outermost field-list among the position's ancestors, the position
/// itself included. This is the anchor of the screen the position belongs to.
pub fn outermost_field_list_ancestor<M: FormModel + ?Sized>(
    model: &M,
    position: &Position,
) -> Option<Position> {
    model
        .ancestor_chain(position)
        .outermost_matching(|ancestor| is_field_list(model, ancestor))
        .cloned()
}

/// The anchor of the screen containing `position`.
pub fn screen_anchor<M: FormModel + ?Sized>(model: &M, position: &Position) -> Position {
    if is_in_field_list(model, position) {
        outermost_field_list_ancestor(model, position).unwrap_or_else(|| position.clone())
    } else {
        position.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_a_case_insensitive_token() {
        assert!(has_field_list_marker("field-list"));
        assert!(has_field_list_marker("compact FIELD-LIST"));
        assert!(!has_field_list_marker("field-listing"));
        assert!(!has_field_list_marker(""));
    }
}
