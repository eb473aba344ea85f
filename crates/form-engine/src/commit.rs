//! Committing screen answers and validating the whole document.

use std::collections::HashMap;

use form_model::{AnswerValue, FormModel, NodeKind, Position, ValidationOutcome};
use tracing::{debug, info, warn};

use crate::classifier::{is_in_field_list, screen_anchor};
use crate::session::Session;

/// Answers collected from the widgets of one screen, not yet written to
/// the model. `None` clears an answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingAnswers {
    answers: HashMap<Position, Option<AnswerValue>>,
}

impl PendingAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, position: Position, value: AnswerValue) {
        self.answers.insert(position, Some(value));
    }

    pub fn clear(&mut self, position: Position) {
        self.answers.insert(position, None);
    }

    pub fn get(&self, position: &Position) -> Option<&Option<AnswerValue>> {
        self.answers.get(position)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Entries in document order according to `model`.
    pub fn ordered<M: FormModel + ?Sized>(&self, model: &M) -> Vec<(&Position, &Option<AnswerValue>)> {
        let mut entries: Vec<_> = self.answers.iter().collect();
        entries.sort_by(|(a, _), (b, _)| model.compare(a, b));
        entries
    }
}

impl FromIterator<(Position, AnswerValue)> for PendingAnswers {
    fn from_iter<I: IntoIterator<Item = (Position, AnswerValue)>>(iter: I) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(position, value)| (position, Some(value)))
                .collect(),
        }
    }
}

/// A question, or a relevant field-list group: the places answers can be
/// committed from.
pub fn is_answerable_screen<M: FormModel + ?Sized>(model: &M, position: &Position) -> bool {
    match model.event_at(position) {
        NodeKind::Question => true,
        NodeKind::Group | NodeKind::Repeat => {
            is_in_field_list(model, position) && model.is_relevant(position)
        }
        NodeKind::BeginningOfForm
        | NodeKind::EndOfForm
        | NodeKind::RepeatInstancePrompt
        | NodeKind::RepeatJuncture => false,
    }
}

/// Writes pending answers to the model in document order.
///
/// With `evaluate_constraints`, each answer is validated and the first
/// failure stops the commit; answers before it stay saved. Without it,
/// everything is saved as-is.
pub fn save_screen_answers<M: FormModel + ?Sized>(
    model: &mut M,
    session: &Session,
    pending: &PendingAnswers,
    evaluate_constraints: bool,
) -> ValidationOutcome {
    if pending.is_empty() {
        return ValidationOutcome::Valid;
    }
    let current = session.current();
    if !is_answerable_screen(model, current) {
        warn!(position = %current, "answers can only be saved from a question screen");
        return ValidationOutcome::Valid;
    }
    let ordered: Vec<(Position, Option<AnswerValue>)> = pending
        .ordered(model)
        .into_iter()
        .map(|(position, value)| (position.clone(), value.clone()))
        .collect();
    for (position, value) in ordered {
        let kind = model.event_at(&position);
        if kind != NodeKind::Question {
            warn!(%position, %kind, "ignoring answer for a non-question");
            continue;
        }
        match model.answer(&position, value, evaluate_constraints) {
            Ok(()) => {}
            Err(failure) if evaluate_constraints => {
                debug!(%position, %failure, "answer rejected");
                return ValidationOutcome::failed(position, failure);
            }
            Err(failure) => debug!(%position, %failure, "unvalidated save reported a failure"),
        }
    }
    ValidationOutcome::Valid
}

/// Validates the whole document.
///
/// On failure the session moves to the screen showing the failing question
/// (its outermost field-list when it has one); the returned outcome names
/// the question itself. On success the position is unchanged.
pub fn validate_entire_form<M: FormModel + ?Sized>(
    model: &mut M,
    session: &mut Session,
    mark_completed: bool,
) -> ValidationOutcome {
    match model.validate_document(mark_completed) {
        None => {
            info!(mark_completed, "form is valid");
            ValidationOutcome::Valid
        }
        Some((failing, kind)) => {
            let target = screen_anchor(model, &failing);
            info!(position = %failing, screen = %target, %kind, "form validation failed");
            session.move_to(target);
            ValidationOutcome::failed(failing, kind)
        }
    }
}
