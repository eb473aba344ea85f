//! Screens: what the user sees at one position.

use form_model::{FormModel, NodeKind, Position};
use tracing::debug;

use crate::classifier::{is_field_list, outermost_field_list_ancestor};
use crate::error::{EngineError, Result};

/// One rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    BeginningOfForm,
    /// A single question, or every relevant question of a field-list.
    Questions {
        anchor: Position,
        questions: Vec<Position>,
    },
    /// "Add another?" for a repeat.
    RepeatPrompt {
        position: Position,
        label: Option<String>,
        existing: usize,
    },
    EndOfForm,
}

impl Screen {
    /// The position the session sits on while this screen is shown.
    pub fn anchor(&self) -> Position {
        match self {
            Self::BeginningOfForm => Position::BeginningOfForm,
            Self::Questions { anchor, .. } => anchor.clone(),
            Self::RepeatPrompt { position, .. } => position.clone(),
            Self::EndOfForm => Position::EndOfForm,
        }
    }

    pub fn questions(&self) -> &[Position] {
        match self {
            Self::Questions { questions, .. } => questions,
            Self::BeginningOfForm | Self::RepeatPrompt { .. } | Self::EndOfForm => &[],
        }
    }
}

/// Relevant questions of a field-list in document order, nested
/// non-repeating groups flattened.
///
/// A field-list may only hold questions and plain groups; anything else
/// is a [`EngineError::FormDesign`] error.
pub fn field_list_questions<M: FormModel + ?Sized>(
    model: &M,
    anchor: &Position,
) -> Result<Vec<Position>> {
    let mut questions = Vec::new();
    let mut position = model.next(anchor, true);
    while model.is_sub_position(anchor, &position) {
        match model.event_at(&position) {
            NodeKind::Question => {
                if model.is_relevant(&position) {
                    questions.push(position.clone());
                }
                position = model.next(&position, false);
            }
            NodeKind::Group => position = model.next(&position, true),
            kind @ (NodeKind::Repeat
            | NodeKind::RepeatInstancePrompt
            | NodeKind::RepeatJuncture) => {
                return Err(EngineError::FormDesign {
                    position,
                    reason: format!(
                        "field-list {anchor} contains a {kind}; only questions and non-repeating groups are allowed"
                    ),
                });
            }
            NodeKind::BeginningOfForm | NodeKind::EndOfForm => break,
        }
    }
    debug!(%anchor, count = questions.len(), "enumerated field-list questions");
    Ok(questions)
}

/// Builds the screen shown at `position`.
pub fn resolve_screen<M: FormModel + ?Sized>(model: &M, position: &Position) -> Result<Screen> {
    match model.event_at(position) {
        NodeKind::BeginningOfForm => Ok(Screen::BeginningOfForm),
        NodeKind::EndOfForm => Ok(Screen::EndOfForm),
        NodeKind::RepeatInstancePrompt => Ok(Screen::RepeatPrompt {
            position: position.clone(),
            label: model.label(position),
            existing: model.repeat_instance_count(position),
        }),
        NodeKind::Question => match outermost_field_list_ancestor(model, position) {
            Some(anchor) => field_list_screen(model, anchor),
            None => Ok(Screen::Questions {
                anchor: position.clone(),
                questions: vec![position.clone()],
            }),
        },
        NodeKind::Group | NodeKind::Repeat if is_field_list(model, position) => {
            let anchor =
                outermost_field_list_ancestor(model, position).unwrap_or_else(|| position.clone());
            field_list_screen(model, anchor)
        }
        kind @ (NodeKind::Group | NodeKind::Repeat | NodeKind::RepeatJuncture) => {
            Err(EngineError::NotRenderable {
                position: position.clone(),
                kind,
            })
        }
    }
}

fn field_list_screen<M: FormModel + ?Sized>(model: &M, anchor: Position) -> Result<Screen> {
    let questions = field_list_questions(model, &anchor)?;
    Ok(Screen::Questions { anchor, questions })
}
