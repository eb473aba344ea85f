//! Repeat instance management: prompting, adding, declining and deleting.

use form_model::{FormModel, NodeKind, Position};
use tracing::{debug, info, warn};

use crate::classifier::is_field_list;
use crate::error::{EngineError, Result};
use crate::session::Session;
use crate::stepper::{next_relevant, step_to_next_screen};

/// The innermost repeat instance enclosing `position`, the position itself
/// included.
pub fn enclosing_repeat<M: FormModel + ?Sized>(model: &M, position: &Position) -> Option<Position> {
    model
        .ancestor_chain(position)
        .iter()
        .rev()
        .find(|ancestor| model.event_at(ancestor) == NodeKind::Repeat)
        .cloned()
}

/// The "add another?" prompt that ends the repeat containing `instance`.
fn prompt_after<M: FormModel + ?Sized>(model: &M, instance: &Position) -> Option<Position> {
    let depth = instance.depth();
    let parent = model.ancestor_chain(instance).immediate_parent().cloned();
    let mut position = instance.clone();
    loop {
        position = next_relevant(model, &position, true);
        if !position.is_in_form() {
            return None;
        }
        if let Some(parent) = &parent {
            if !model.is_sub_position(parent, &position) {
                return None;
            }
        }
        if model.event_at(&position) == NodeKind::RepeatInstancePrompt && position.depth() == depth {
            return Some(position);
        }
    }
}

/// Sends the user to the prompt of the repeat they are in, remembering the
/// current position so a declined prompt can return to it.
///
/// Outside any repeat this does nothing.
pub fn prompt_for_new_repeat<M: FormModel + ?Sized>(
    model: &M,
    session: &mut Session,
) -> Result<NodeKind> {
    let origin = session.current().clone();
    let Some(instance) = enclosing_repeat(model, &origin) else {
        warn!(position = %origin, "not inside a repeat, nothing to prompt for");
        return Ok(model.event_at(&origin));
    };
    let Some(prompt) = prompt_after(model, &instance) else {
        warn!(repeat = %instance, "repeat has no prompt to jump to");
        return Ok(model.event_at(&origin));
    };
    debug!(from = %origin, to = %prompt, "jumping to repeat prompt");
    session.set_jump_back(origin);
    session.move_to(prompt);
    Ok(model.event_at(session.current()))
}

/// Accepts the prompt at the current position by creating a new instance.
///
/// A rejected creation leaves the session untouched. A new instance that
/// is not itself a field-list is entered immediately.
pub fn confirm_new_repeat<M: FormModel + ?Sized>(
    model: &mut M,
    session: &mut Session,
) -> Result<NodeKind> {
    let at = session.current().clone();
    let kind = model.event_at(&at);
    if kind != NodeKind::RepeatInstancePrompt {
        warn!(position = %at, %kind, "not at a repeat prompt, nothing to add");
        return Ok(kind);
    }
    model.create_repeat_instance(&at).map_err(|error| {
        warn!(position = %at, %error, "repeat instance was not created");
        EngineError::from(error)
    })?;
    info!(
        position = %at,
        instances = model.repeat_instance_count(&at),
        "added repeat instance"
    );
    session.clear_jump_back();
    if is_field_list(model, &at) {
        return Ok(model.event_at(&at));
    }
    step_to_next_screen(model, session)
}

/// Declines the prompt: returns to the remembered position if there is one,
/// otherwise moves on past the prompt.
pub fn cancel_new_repeat_prompt<M: FormModel + ?Sized>(
    model: &M,
    session: &mut Session,
) -> Result<NodeKind> {
    match session.take_jump_back() {
        Some(back) => {
            debug!(to = %back, "returning from repeat prompt");
            session.move_to(back);
            Ok(model.event_at(session.current()))
        }
        None => step_to_next_screen(model, session),
    }
}

/// Deletes the innermost repeat instance around the current position and
/// moves to the position the model hands back.
pub fn delete_repeat<M: FormModel + ?Sized>(model: &mut M, session: &mut Session) -> Result<NodeKind> {
    let at = session.current().clone();
    let returned = model.delete_repeat_instance(&at).map_err(|error| {
        warn!(position = %at, %error, "repeat instance was not deleted");
        EngineError::from(error)
    })?;
    info!(from = %at, to = %returned, "deleted repeat instance");
    session.clear_jump_back();
    session.move_to(returned);
    Ok(model.event_at(session.current()))
}
