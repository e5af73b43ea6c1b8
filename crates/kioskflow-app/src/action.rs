//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use kioskflow_core::{EffectGeneration, PendingEffect, SessionAction};

use crate::DraftGeneration;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Send the enqueue payload and report completion after the effect
    /// latency.
    BeginEffect(PendingEffect),

    /// Drop the completion timer of a cancelled effect.
    CancelEffect {
        /// Cancelled effect.
        generation: EffectGeneration,
    },

    /// Report [`crate::AppEvent::ReparseDue`] after the debounce window.
    ScheduleReparse {
        /// Edit to re-parse.
        generation: DraftGeneration,
    },
}

impl From<SessionAction> for AppAction {
    fn from(action: SessionAction) -> Self {
        match action {
            SessionAction::Render => Self::Render,
            SessionAction::BeginEffect(effect) => Self::BeginEffect(effect),
            SessionAction::CancelEffect { generation } => Self::CancelEffect { generation },
        }
    }
}
