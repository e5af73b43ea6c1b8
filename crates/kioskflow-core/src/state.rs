//! Observable navigation state.
//!
//! [`NavigationState`] is the serializable half of a session: everything that
//! changes while a user walks a flow. The flow document itself is immutable
//! and held separately by [`crate::Session`].

use kioskflow_proto::{Flow, ScreenId};
use serde::{Deserialize, Serialize};

use crate::{EffectTracker, FieldErrors, Inputs, PendingEffect, SessionFault};

/// Position, history, and collected data of one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Screen being shown.
    pub(crate) current: ScreenId,
    /// Previously visited screens, most recent last.
    pub(crate) history: Vec<ScreenId>,
    /// Entered values. Persist across screens until restart.
    pub(crate) inputs: Inputs,
    /// Validation failures of the current screen.
    pub(crate) errors: FieldErrors,
    /// In-flight effect and generation counter.
    pub(crate) effects: EffectTracker,
    /// Degraded state. `None` while healthy.
    pub(crate) fault: Option<SessionFault>,
}

impl NavigationState {
    /// Fresh state on the flow's entry point.
    pub fn initial(flow: &Flow) -> Self {
        Self {
            current: flow.start_screen_id.clone(),
            history: Vec::new(),
            inputs: Inputs::new(),
            errors: FieldErrors::new(),
            effects: EffectTracker::new(),
            fault: None,
        }
    }

    /// Reset to the entry point, keeping only the effect generation counter.
    pub(crate) fn reset(&mut self, flow: &Flow) {
        let effects = std::mem::take(&mut self.effects);
        *self = Self { effects, ..Self::initial(flow) };
    }

    /// Screen being shown.
    pub fn current_screen_id(&self) -> &ScreenId {
        &self.current
    }

    /// Previously visited screens, most recent last.
    pub fn history(&self) -> &[ScreenId] {
        &self.history
    }

    /// Entered values by component id.
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Validation failures of the current screen.
    pub fn validation_errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The in-flight effect, if any.
    pub fn pending_effect(&self) -> Option<&PendingEffect> {
        self.effects.pending()
    }

    /// Degraded state, if any.
    pub fn fault(&self) -> Option<&SessionFault> {
        self.fault.as_ref()
    }

    /// Whether an effect suppresses transitions.
    pub fn is_busy(&self) -> bool {
        self.effects.is_pending()
    }

    /// Whether `back` would do anything.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty() && !self.is_busy() && self.fault.is_none()
    }
}
