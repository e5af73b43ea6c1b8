//! Action dispatch.
//!
//! Decides what pressing a component means, without changing any state. The
//! [`crate::Session`] applies the resulting [`Effect`].
//!
//! | component / action | form screen            | other screen       |
//! |--------------------|------------------------|--------------------|
//! | `goto_screen`      | validate, `Navigate`   | `Navigate`         |
//! | `enqueue`          | validate, `BeginAsync` | `BeginAsync`       |
//! | `restart`          | `ResetFlow`            | `ResetFlow`        |
//! | non-button         | `NoOp`                 | `NoOp`             |
//!
//! While an effect is pending or the session is faulted, everything except
//! `restart` resolves to `NoOp`.

use kioskflow_proto::{ButtonAction, Component, Screen, ScreenId};

use crate::{FieldErrors, NavigationState, validate};

/// Outcome of interpreting one component press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move to `target` (existence is checked when applied).
    Navigate(ScreenId),
    /// Return to the start screen and clear everything.
    ResetFlow,
    /// Start the simulated side effect that completes on `target`.
    BeginAsyncEffect(ScreenId),
    /// Nothing happens.
    NoOp,
}

/// An [`Effect`] plus the validation failures observed while computing it.
///
/// `field_errors` is non-empty only when validation blocked the press, in
/// which case `effect` is [`Effect::NoOp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// What to do.
    pub effect: Effect,
    /// Per-field failures that blocked a forward transition.
    pub field_errors: FieldErrors,
}

impl Dispatch {
    fn of(effect: Effect) -> Self {
        Self { effect, field_errors: FieldErrors::new() }
    }

    fn blocked(field_errors: FieldErrors) -> Self {
        Self { effect: Effect::NoOp, field_errors }
    }
}

/// Interpret a press of `component` on `screen`.
pub fn dispatch(component: &Component, screen: &Screen, state: &NavigationState) -> Dispatch {
    let Some(button) = component.as_button() else {
        return Dispatch::of(Effect::NoOp);
    };

    if matches!(button.action, ButtonAction::Restart) {
        return Dispatch::of(Effect::ResetFlow);
    }

    if state.is_busy() || state.fault().is_some() {
        return Dispatch::of(Effect::NoOp);
    }

    let errors = validate(screen, state.inputs());
    if !errors.is_empty() {
        return Dispatch::blocked(errors);
    }

    match &button.action {
        ButtonAction::GotoScreen { target } => Dispatch::of(Effect::Navigate(target.clone())),
        ButtonAction::Enqueue { target } => Dispatch::of(Effect::BeginAsyncEffect(target.clone())),
        ButtonAction::Restart => Dispatch::of(Effect::ResetFlow),
    }
}
