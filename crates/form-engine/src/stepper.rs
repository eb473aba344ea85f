//! Screen-to-screen traversal.
//!
//! The pure functions compute a target position; the `step_to_*` wrappers
//! assign it to a [`Session`] once computed.

use form_model::{FormModel, NodeKind, Position};
use tracing::debug;

use crate::classifier::{
    is_field_list, is_in_field_list, outermost_field_list_ancestor, screen_anchor,
};
use crate::error::Result;
use crate::screen::field_list_questions;
use crate::session::Session;

/// One primitive step forward that skips irrelevant nodes.
pub fn next_relevant<M: FormModel + ?Sized>(model: &M, from: &Position, into_groups: bool) -> Position {
    let mut position = model.next(from, into_groups);
    while position.is_in_form() && !model.is_relevant(&position) {
        position = model.next(&position, false);
    }
    position
}

/// One primitive step backward that skips irrelevant nodes.
pub fn previous_relevant<M: FormModel + ?Sized>(model: &M, from: &Position) -> Position {
    let mut position = model.previous(from);
    while position.is_in_form() && !model.is_relevant(&position) {
        position = model.previous(&position);
    }
    position
}

/// The anchor of the next screen after `from`.
///
/// Plain groups are entered and walked node by node; a field-list is
/// stepped over once it has been shown. A field-list without relevant
/// questions is passed through.
pub fn next_screen<M: FormModel + ?Sized>(model: &M, from: &Position) -> Result<Position> {
    if model.event_at(from) == NodeKind::EndOfForm {
        return Ok(from.clone());
    }
    let mut position = screen_anchor(model, from);
    loop {
        let into_groups = !is_field_list(model, &position);
        position = next_relevant(model, &position, into_groups);
        match model.event_at(&position) {
            NodeKind::Question
            | NodeKind::RepeatInstancePrompt
            | NodeKind::EndOfForm
            | NodeKind::BeginningOfForm => return Ok(position),
            NodeKind::Group | NodeKind::Repeat => {
                if is_field_list(model, &position) {
                    if !field_list_questions(model, &position)?.is_empty() {
                        return Ok(position);
                    }
                    debug!(%position, "passing through field-list without relevant questions");
                }
            }
            NodeKind::RepeatJuncture => debug!(%position, "skipping repeat juncture"),
        }
    }
}

/// The anchor of the previous screen before `from`.
///
/// Prompts and junctures are never stopped on going backward. Landing
/// anywhere inside a field-list resolves to its outermost field-list
/// ancestor, which is skipped when nothing under it is relevant. A host
/// that could not be shown is a form design error, raised before moving.
pub fn previous_screen<M: FormModel + ?Sized>(model: &M, from: &Position) -> Result<Position> {
    if model.event_at(from) == NodeKind::BeginningOfForm {
        return Ok(from.clone());
    }
    let mut position = screen_anchor(model, from);
    loop {
        position = previous_relevant(model, &position);
        match model.event_at(&position) {
            NodeKind::BeginningOfForm | NodeKind::EndOfForm => return Ok(position),
            NodeKind::RepeatJuncture | NodeKind::RepeatInstancePrompt => {
                debug!(%position, "skipping backward");
            }
            NodeKind::Question if !is_in_field_list(model, &position) => return Ok(position),
            NodeKind::Group | NodeKind::Repeat if !is_field_list(model, &position) => {}
            NodeKind::Question | NodeKind::Group | NodeKind::Repeat => {
                let host = outermost_field_list_ancestor(model, &position)
                    .unwrap_or_else(|| position.clone());
                field_list_questions(model, &host)?;
                if has_relevant_descendant(model, &host) {
                    return Ok(host);
                }
                debug!(%host, "skipping field-list without relevant content");
                position = host;
            }
        }
    }
}

/// Whether any node strictly under `anchor` is relevant.
pub fn has_relevant_descendant<M: FormModel + ?Sized>(model: &M, anchor: &Position) -> bool {
    let mut position = model.next(anchor, true);
    while model.is_sub_position(anchor, &position) {
        if model.is_relevant(&position) {
            return true;
        }
        position = model.next(&position, true);
    }
    false
}

/// Advances the session to the next screen and returns its kind.
pub fn step_to_next_screen<M: FormModel + ?Sized>(model: &M, session: &mut Session) -> Result<NodeKind> {
    let target = next_screen(model, session.current())?;
    debug!(from = %session.current(), to = %target, "stepped forward");
    session.move_to(target);
    Ok(model.event_at(session.current()))
}

/// Moves the session back one screen and returns its kind.
pub fn step_to_previous_screen<M: FormModel + ?Sized>(
    model: &M,
    session: &mut Session,
) -> Result<NodeKind> {
    let target = previous_screen(model, session.current())?;
    debug!(from = %session.current(), to = %target, "stepped backward");
    session.move_to(target);
    Ok(model.event_at(session.current()))
}

#[cfg(test)]
mod tests {
    use form_model::{AnswerValue, FailureKind, ModelError, PathStep};

    use super::*;

    /// A flat form whose node kinds are given up front.
    struct Linear {
        kinds: Vec<NodeKind>,
    }

    impl Linear {
        fn at(index: usize) -> Position {
            Position::node(vec![PathStep::child(index)])
        }

        fn index(position: &Position) -> Option<usize> {
            position.last_step().map(|step| step.index)
        }
    }

    impl FormModel for Linear {
        fn event_at(&self, position: &Position) -> NodeKind {
            match position {
                Position::BeginningOfForm => NodeKind::BeginningOfForm,
                Position::EndOfForm => NodeKind::EndOfForm,
                Position::Node(_) => Self::index(position)
                    .and_then(|i| self.kinds.get(i).copied())
                    .unwrap_or(NodeKind::EndOfForm),
            }
        }

        fn next(&self, from: &Position, _into_groups: bool) -> Position {
            let next = match from {
                Position::BeginningOfForm => 0,
                Position::EndOfForm => return Position::EndOfForm,
                Position::Node(_) => Self::index(from).map_or(usize::MAX, |i| i + 1),
            };
            if next < self.kinds.len() {
                Self::at(next)
            } else {
                Position::EndOfForm
            }
        }

        fn previous(&self, from: &Position) -> Position {
            let index = match from {
                Position::BeginningOfForm => return Position::BeginningOfForm,
                Position::EndOfForm => self.kinds.len(),
                Position::Node(_) => Self::index(from).unwrap_or(0),
            };
            match index.checked_sub(1) {
                Some(i) => Self::at(i),
                None => Position::BeginningOfForm,
            }
        }

        fn is_relevant(&self, _position: &Position) -> bool {
            true
        }

        fn appearance(&self, _position: &Position) -> Option<&str> {
            None
        }

        fn label(&self, _position: &Position) -> Option<String> {
            None
        }

        fn answer(
            &mut self,
            _: &Position,
            _: Option<AnswerValue>,
            _: bool,
        ) -> std::result::Result<(), FailureKind> {
            Ok(())
        }

        fn answer_at(&self, _position: &Position) -> Option<AnswerValue> {
            None
        }

        fn repeat_instance_count(&self, _position: &Position) -> usize {
            0
        }

        fn create_repeat_instance(&mut self, at: &Position) -> std::result::Result<(), ModelError> {
            Err(ModelError::NotARepeatPrompt { position: at.clone() })
        }

        fn delete_repeat_instance(
            &mut self,
            at: &Position,
        ) -> std::result::Result<Position, ModelError> {
            Err(ModelError::NotInRepeat { position: at.clone() })
        }

        fn validate_document(&mut self, _mark_completed: bool) -> Option<(Position, FailureKind)> {
            None
        }
    }

    #[test]
    fn junctures_are_skipped_in_both_directions() {
        let model = Linear {
            kinds: vec![NodeKind::Question, NodeKind::RepeatJuncture, NodeKind::Question],
        };
        assert_eq!(next_screen(&model, &Linear::at(0)), Ok(Linear::at(2)));
        assert_eq!(previous_screen(&model, &Linear::at(2)), Ok(Linear::at(0)));
    }

    #[test]
    fn sentinels_are_fixed_points() {
        let model = Linear {
            kinds: vec![NodeKind::Question],
        };
        assert_eq!(
            next_screen(&model, &Position::EndOfForm),
            Ok(Position::EndOfForm)
        );
        assert_eq!(
            previous_screen(&model, &Position::BeginningOfForm),
            Ok(Position::BeginningOfForm)
        );
        assert_eq!(next_screen(&model, &Linear::at(0)), Ok(Position::EndOfForm));
    }

    #[test]
    fn session_wrappers_assign_the_target() {
        let model = Linear {
            kinds: vec![NodeKind::Question, NodeKind::Question],
        };
        let mut session = Session::new();
        assert_eq!(step_to_next_screen(&model, &mut session), Ok(NodeKind::Question));
        assert_eq!(session.current(), &Linear::at(0));
        assert_eq!(step_to_previous_screen(&model, &mut session), Ok(NodeKind::BeginningOfForm));
        assert!(session.current().is_beginning());
    }
}
