use std::cmp::Ordering;

use form_model::{FormModel, Position};

/// Direction of the most recent screen change, used to pick an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Forward,
    Backward,
    None,
}

/// Mutable navigation state owned by one form-filling session.
///
/// Positions are only assigned after an operation has computed its result,
/// so a failed operation leaves the session as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current: Position,
    jump_back: Option<Position>,
    last_screen: Option<Position>,
    waiting_for_data: Option<Position>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::at(Position::BeginningOfForm)
    }

    pub fn at(position: Position) -> Self {
        Self {
            current: position,
            jump_back: None,
            last_screen: None,
            waiting_for_data: None,
        }
    }

    pub fn current(&self) -> &Position {
        &self.current
    }

    /// Moves to `position`, remembering where we came from.
    pub fn move_to(&mut self, position: Position) {
        let previous = std::mem::replace(&mut self.current, position);
        self.last_screen = Some(previous);
    }

    /// Where to return if the user declines a repeat prompt they were
    /// explicitly sent to.
    pub fn jump_back(&self) -> Option<&Position> {
        self.jump_back.as_ref()
    }

    pub fn set_jump_back(&mut self, position: Position) {
        self.jump_back = Some(position);
    }

    pub fn take_jump_back(&mut self) -> Option<Position> {
        self.jump_back.take()
    }

    pub fn clear_jump_back(&mut self) {
        self.jump_back = None;
    }

    pub fn last_screen(&self) -> Option<&Position> {
        self.last_screen.as_ref()
    }

    /// Marks a question as waiting for a value from an external source
    /// (a barcode scanner or companion app).
    pub fn set_waiting_for_data(&mut self, position: Position) {
        self.waiting_for_data = Some(position);
    }

    pub fn waiting_for_data(&self) -> Option<&Position> {
        self.waiting_for_data.as_ref()
    }

    pub fn take_waiting_for_data(&mut self) -> Option<Position> {
        self.waiting_for_data.take()
    }

    /// Direction of the last move, in document order.
    pub fn transition<M: FormModel + ?Sized>(&self, model: &M) -> Transition {
        let Some(last) = &self.last_screen else {
            return Transition::None;
        };
        match model.compare(last, &self.current) {
            Ordering::Less => Transition::Forward,
            Ordering::Greater => Transition::Backward,
            Ordering::Equal => Transition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use form_model::PathStep;

    use super::*;

    #[test]
    fn move_to_records_the_previous_position() {
        let mut session = Session::new();
        let first = Position::node(vec![PathStep::child(0)]);
        session.move_to(first.clone());
        assert_eq!(session.current(), &first);
        assert_eq!(session.last_screen(), Some(&Position::BeginningOfForm));
    }

    #[test]
    fn jump_back_and_waiting_slots_are_single_use() {
        let mut session = Session::new();
        let question = Position::node(vec![PathStep::child(3)]);
        session.set_jump_back(question.clone());
        session.set_waiting_for_data(question.clone());
        assert_eq!(session.take_jump_back(), Some(question.clone()));
        assert_eq!(session.take_jump_back(), None);
        assert_eq!(session.take_waiting_for_data(), Some(question));
        assert!(session.waiting_for_data().is_none());
    }
}
