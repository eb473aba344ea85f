//! Screen-by-screen navigation over a [`FormModel`](form_model::FormModel).
//!
//! The engine decides what the user sees next. Plain groups are walked one
//! question at a time, while groups marked `field-list` are shown as a single
//! screen. Repeats end in an "add another?" prompt. Answers are committed and
//! validated before moving forward.
//!
//! [`Navigator`] bundles a model and a [`Session`] for front ends; the free
//! functions in [`stepper`], [`repeat`] and [`commit`] work on any model and
//! session directly.

pub mod classifier;
pub mod commit;
pub mod error;
pub mod navigator;
pub mod repeat;
pub mod screen;
pub mod session;
pub mod stepper;

pub use classifier::{is_field_list, is_in_field_list};
pub use commit::{PendingAnswers, save_screen_answers, validate_entire_form};
pub use error::{EngineError, Result};
pub use navigator::Navigator;
pub use repeat::{
    cancel_new_repeat_prompt, confirm_new_repeat, delete_repeat, prompt_for_new_repeat,
};
pub use screen::{Screen, resolve_screen};
pub use session::{Session, Transition};
pub use stepper::{step_to_next_screen, step_to_previous_screen};
