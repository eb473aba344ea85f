//! Session façade used by front ends.

use form_model::{FormModel, NodeKind, Position, ValidationOutcome};
use tracing::{debug, info_span};

use crate::commit::{PendingAnswers, save_screen_answers, validate_entire_form};
use crate::error::{EngineError, Result};
use crate::repeat::{
    cancel_new_repeat_prompt, confirm_new_repeat, delete_repeat, enclosing_repeat,
    prompt_for_new_repeat,
};
use crate::screen::{Screen, resolve_screen};
use crate::session::{Session, Transition};
use crate::stepper::{next_screen, previous_screen, step_to_next_screen, step_to_previous_screen};

/// Drives one form-filling session over a model.
///
/// Every mutating call either completes or leaves the position where it
/// was. The outcome and error of the last call are kept for display.
#[derive(Debug)]
pub struct Navigator<M> {
    model: M,
    session: Session,
    last_outcome: Option<ValidationOutcome>,
    last_error: Option<EngineError>,
}

impl<M: FormModel> Navigator<M> {
    /// Starts at the beginning of the form.
    pub fn new(model: M) -> Self {
        Self::resume(model, Position::BeginningOfForm)
    }

    /// Reopens a session at a saved position.
    pub fn resume(model: M, position: Position) -> Self {
        Self {
            model,
            session: Session::at(position),
            last_outcome: None,
            last_error: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_position(&self) -> &Position {
        self.session.current()
    }

    pub fn current_event(&self) -> NodeKind {
        self.model.event_at(self.session.current())
    }

    pub fn current_screen(&self) -> Result<Screen> {
        resolve_screen(&self.model, self.session.current())
    }

    /// Commits the screen's answers and, if they pass, shows the next screen.
    ///
    /// A failed commit keeps the current screen and returns the failure.
    /// Leaving the screen forgets any pending return from a repeat prompt.
    pub fn move_forward(
        &mut self,
        pending: &PendingAnswers,
        evaluate_constraints: bool,
    ) -> Result<ValidationOutcome> {
        let _span = info_span!("move_forward", position = %self.session.current()).entered();
        self.last_error = None;
        let outcome =
            save_screen_answers(&mut self.model, &self.session, pending, evaluate_constraints);
        self.last_outcome = Some(outcome.clone());
        if !outcome.is_valid() {
            return Ok(outcome);
        }
        let stepped = step_to_next_screen(&self.model, &mut self.session);
        self.record(stepped)?;
        self.session.clear_jump_back();
        Ok(outcome)
    }

    /// Saves the screen's answers without validation and shows the previous
    /// screen.
    pub fn move_backward(&mut self, pending: &PendingAnswers) -> Result<ValidationOutcome> {
        let _span = info_span!("move_backward", position = %self.session.current()).entered();
        self.last_error = None;
        let outcome = save_screen_answers(&mut self.model, &self.session, pending, false);
        self.last_outcome = Some(outcome.clone());
        let stepped = step_to_previous_screen(&self.model, &mut self.session);
        self.record(stepped)?;
        self.session.clear_jump_back();
        Ok(outcome)
    }

    /// Jumps to the prompt of the enclosing repeat.
    pub fn prompt_for_new_repeat(&mut self) -> Result<NodeKind> {
        let _span =
            info_span!("prompt_for_new_repeat", position = %self.session.current()).entered();
        self.last_error = None;
        let result = prompt_for_new_repeat(&self.model, &mut self.session);
        self.record(result)
    }

    /// Adds a repeat instance at the current prompt.
    pub fn add_repeat(&mut self) -> Result<NodeKind> {
        let _span = info_span!("add_repeat", position = %self.session.current()).entered();
        self.last_error = None;
        let result = confirm_new_repeat(&mut self.model, &mut self.session);
        self.record(result)
    }

    /// Declines the current prompt.
    pub fn cancel_repeat_prompt(&mut self) -> Result<NodeKind> {
        let _span = info_span!("cancel_repeat_prompt", position = %self.session.current()).entered();
        self.last_error = None;
        let result = cancel_new_repeat_prompt(&self.model, &mut self.session);
        self.record(result)
    }

    pub fn delete_repeat(&mut self) -> Result<NodeKind> {
        let _span = info_span!("delete_repeat", position = %self.session.current()).entered();
        self.last_error = None;
        let result = delete_repeat(&mut self.model, &mut self.session);
        self.record(result)
    }

    /// Moves straight to `position`, for example from a hierarchy view.
    pub fn jump_to(&mut self, position: Position) {
        debug!(from = %self.session.current(), to = %position, "jump");
        self.session.move_to(position);
    }

    /// Validates the whole form, relocating to the first failure.
    pub fn validate(&mut self, mark_completed: bool) -> ValidationOutcome {
        let _span = info_span!("validate", mark_completed).entered();
        self.last_error = None;
        let outcome = validate_entire_form(&mut self.model, &mut self.session, mark_completed);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    pub fn last_outcome(&self) -> Option<&ValidationOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Every screen a forward walk from the beginning would show, ending
    /// with the end-of-form screen. Does not move the session.
    pub fn outline(&self) -> Result<Vec<Screen>> {
        let mut screens = Vec::new();
        let mut position = Position::BeginningOfForm;
        loop {
            position = next_screen(&self.model, &position)?;
            screens.push(resolve_screen(&self.model, &position)?);
            if self.model.event_at(&position) == NodeKind::EndOfForm {
                return Ok(screens);
            }
        }
    }

    /// Labels of the groups and repeats around the current position,
    /// outermost first.
    pub fn breadcrumb(&self) -> Vec<String> {
        let chain = self.model.ancestor_chain(self.session.current());
        chain
            .enclosing()
            .iter()
            .filter(|position| self.model.event_at(position).is_group_like())
            .filter_map(|position| self.model.label(position))
            .collect()
    }

    /// Whether stepping back would reach the beginning of the form.
    pub fn is_first_screen(&self) -> Result<bool> {
        Ok(previous_screen(&self.model, self.session.current())?.is_beginning())
    }

    pub fn can_delete_repeat(&self) -> bool {
        enclosing_repeat(&self.model, self.session.current()).is_some()
    }

    pub fn transition(&self) -> Transition {
        self.session.transition(&self.model)
    }

    pub fn set_waiting_for_data(&mut self, position: Position) {
        self.session.set_waiting_for_data(position);
    }

    pub fn waiting_for_data(&self) -> Option<&Position> {
        self.session.waiting_for_data()
    }

    pub fn take_waiting_for_data(&mut self) -> Option<Position> {
        self.session.take_waiting_for_data()
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.last_error = Some(error.clone());
        }
        result
    }
}
