//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use kioskflow_core::ScreenView;

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// A session that is not faulted is on a screen of its flow.
pub struct CurrentScreenExists;

impl Invariant for CurrentScreenExists {
    fn name(&self) -> &'static str {
        "current_screen_exists"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let current = state.state.current_screen_id();
        if state.state.fault().is_none() && !state.flow.contains_screen(current.as_str()) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("healthy session on missing screen '{current}'"),
            });
        }
        Ok(())
    }
}

/// Validation errors name components of the current screen.
///
/// Errors are screen-scoped: every transition clears them.
pub struct ErrorsBelongToCurrentScreen;

impl Invariant for ErrorsBelongToCurrentScreen {
    fn name(&self) -> &'static str {
        "errors_belong_to_current_screen"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let Some(screen) = state.flow.screen(state.state.current_screen_id().as_str()) else {
            return Ok(());
        };

        for component in state.state.validation_errors().keys() {
            if screen.component(component.as_str()).is_none() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("error for '{component}' shown on screen '{}'", screen.id),
                });
            }
        }
        Ok(())
    }
}

/// Only form screens ever carry validation errors.
pub struct ErrorsOnlyOnForms;

impl Invariant for ErrorsOnlyOnForms {
    fn name(&self) -> &'static str {
        "errors_only_on_forms"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let errors = state.state.validation_errors();
        if errors.is_empty() {
            return Ok(());
        }

        let is_form = state
            .flow
            .screen(state.state.current_screen_id().as_str())
            .is_some_and(kioskflow_proto::Screen::is_form);
        if !is_form {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} validation error(s) on non-form screen '{}'",
                    errors.len(),
                    state.state.current_screen_id()
                ),
            });
        }
        Ok(())
    }
}

/// A faulted session is not waiting on an effect.
///
/// Whatever faults the session also cancels its pending effect, so a late
/// completion can never move a faulted session.
pub struct FaultedSessionIsIdle;

impl Invariant for FaultedSessionIsIdle {
    fn name(&self) -> &'static str {
        "faulted_session_is_idle"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let (Some(fault), Some(effect)) = (state.state.fault(), state.state.pending_effect()) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("effect {} pending while faulted: {fault}", effect.generation),
            });
        }
        Ok(())
    }
}

/// The render projection agrees with the state: a fault is always shown,
/// and a pending effect hides the screen.
pub struct ViewMatchesState;

impl Invariant for ViewMatchesState {
    fn name(&self) -> &'static str {
        "view_matches_state"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let expected = if state.state.fault().is_some() {
            "fault"
        } else if state.state.is_busy() {
            "busy"
        } else {
            "page"
        };
        let actual = match &state.view {
            ScreenView::Fault(_) => "fault",
            ScreenView::Busy(_) => "busy",
            ScreenView::Page(_) => "page",
        };

        if expected != actual {
            return Err(Violation {
                invariant: self.name(),
                message: format!("state is {expected} but view is {actual}"),
            });
        }
        Ok(())
    }
}
