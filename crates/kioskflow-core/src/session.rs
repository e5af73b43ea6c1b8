//! Navigation state machine.
//!
//! A [`Session`] walks one immutable [`Flow`]. It is a pure reducer: it
//! consumes [`SessionEvent`]s and returns [`SessionAction`]s for the runtime
//! to execute. No I/O, no clocks; effect latency is waited out by the runtime,
//! which reports back with [`SessionEvent::EffectCompleted`].
//!
//! # State Machine
//!
//! ```text
//!            goto_screen / back                    dangling target
//!          ┌────────────────────┐  ┌──────────────────────────────────┐
//!          │                    ↓  │                                  ↓
//!     ┌────────────┐  enqueue  ┌──────┐  completion (same gen)  ┌─────────┐
//!     │ on screen  │──────────>│ busy │────────────────────────>│ faulted │
//!     └────────────┘           └──────┘                         └─────────┘
//!       ↑     ↑ completion          │ restart                        │ restart
//!       │     └─────────────────────┘                                │
//!       └────────────────────────── restart ─────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! - Position: `current` is a key of the flow's screens unless the session is
//!   faulted.
//! - History: every entry was a valid screen when it was pushed.
//! - Scope: validation errors belong to the current screen and are cleared on
//!   every screen change; inputs persist until restart.
//! - Exclusivity: while an effect is pending, only `restart` changes state.

use std::sync::Arc;

use kioskflow_proto::{ComponentId, Flow, ParseError, Screen, ScreenId};

use crate::{
    Effect, EffectGeneration, EnqueuePayload, NavigationState, PendingEffect, ScreenView,
    SessionFault, dispatch, project, validate,
};

/// Inputs to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A component on the current screen was pressed.
    Press {
        /// Pressed component.
        component: ComponentId,
    },

    /// An input component's value changed.
    Input {
        /// Edited input.
        component: ComponentId,
        /// New value.
        value: String,
    },

    /// Go to the previous screen.
    Back,

    /// Start over from the entry point.
    Restart,

    /// The runtime's timer for an effect fired.
    EffectCompleted {
        /// Effect that completed.
        generation: EffectGeneration,
    },
}

/// Instructions produced by the session for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// State changed; redraw.
    Render,

    /// Start waiting out an effect's latency, then report
    /// [`SessionEvent::EffectCompleted`].
    BeginEffect(PendingEffect),

    /// Drop the timer of a cancelled effect.
    CancelEffect {
        /// Cancelled effect.
        generation: EffectGeneration,
    },
}

/// One user's traversal of a flow.
#[derive(Debug, Clone)]
pub struct Session {
    /// Immutable document.
    flow: Arc<Flow>,
    /// Everything that changes.
    state: NavigationState,
}

impl Session {
    /// Enter `flow` on its start screen.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownStartScreen`] if the flow cannot be
    /// entered.
    pub fn new(flow: Arc<Flow>) -> Result<Self, ParseError> {
        flow.check()?;
        let state = NavigationState::initial(&flow);
        tracing::debug!(flow = %flow.flow_id, start = %state.current, "session started");
        Ok(Self { flow, state })
    }

    /// Continue a saved traversal over `flow`.
    ///
    /// If the saved screen no longer exists the session resumes faulted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownStartScreen`] if the flow cannot be
    /// entered.
    pub fn resume(flow: Arc<Flow>, mut state: NavigationState) -> Result<Self, ParseError> {
        flow.check()?;
        // A restored effect has no timer behind it; dropping it is enough.
        let _ = rebind(&mut state, &flow);
        Ok(Self { flow, state })
    }

    /// Replace the document.
    ///
    /// A different `flow_id` forces a restart on the new flow, cancelling any
    /// pending effect. The same `flow_id` keeps the traversal and re-checks
    /// the current screen against the new document; if that faults, the
    /// pending effect is cancelled as well.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownStartScreen`] if the new flow cannot be
    /// entered. The session is left untouched.
    pub fn load(&mut self, flow: Arc<Flow>) -> Result<Vec<SessionAction>, ParseError> {
        flow.check()?;

        if flow.flow_id == self.flow.flow_id {
            tracing::info!(flow = %flow.flow_id, "flow document updated in place");
            let mut actions: Vec<_> = rebind(&mut self.state, &flow)
                .map(|generation| SessionAction::CancelEffect { generation })
                .into_iter()
                .collect();
            self.flow = flow;
            actions.push(SessionAction::Render);
            return Ok(actions);
        }

        tracing::info!(from = %self.flow.flow_id, to = %flow.flow_id, "flow identity changed");
        let mut actions = self.cancel_effect();
        self.flow = flow;
        self.state.reset(&self.flow);
        actions.push(SessionAction::Render);
        Ok(actions)
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Press { component } => self.press(&component),
            SessionEvent::Input { component, value } => self.set_input(component, value),
            SessionEvent::Back => self.back(),
            SessionEvent::Restart => self.restart(),
            SessionEvent::EffectCompleted { generation } => self.complete_effect(generation),
        }
    }

    /// Press a component on the current screen.
    pub fn press(&mut self, component: &ComponentId) -> Vec<SessionAction> {
        let Some(screen) = self.current_screen() else {
            return vec![];
        };
        let Some(pressed) = screen.component(component.as_str()) else {
            tracing::debug!(screen = %screen.id, %component, "press on unknown component ignored");
            return vec![];
        };

        let outcome = dispatch(pressed, screen, &self.state);
        if !outcome.field_errors.is_empty() {
            tracing::debug!(
                screen = %screen.id,
                failed = outcome.field_errors.len(),
                "transition blocked by validation"
            );
            self.state.errors = outcome.field_errors;
            return vec![SessionAction::Render];
        }

        match outcome.effect {
            Effect::Navigate(target) => self.navigate(target),
            Effect::ResetFlow => self.restart(),
            Effect::BeginAsyncEffect(target) => self.begin_effect(target),
            Effect::NoOp => vec![],
        }
    }

    /// Move forward to `target`, validating the current form first.
    pub fn goto_screen(&mut self, target: ScreenId) -> Vec<SessionAction> {
        if self.state.is_busy() || self.state.fault.is_some() {
            return vec![];
        }

        if let Some(screen) = self.current_screen() {
            let errors = validate(screen, &self.state.inputs);
            if !errors.is_empty() {
                self.state.errors = errors;
                return vec![SessionAction::Render];
            }
        }

        self.navigate(target)
    }

    /// Return to the previous screen. No-op with empty history.
    pub fn back(&mut self) -> Vec<SessionAction> {
        if !self.state.can_go_back() {
            return vec![];
        }

        let Some(previous) = self.state.history.pop() else {
            return vec![];
        };
        tracing::debug!(from = %self.state.current, to = %previous, "back");
        self.state.current = previous;
        self.state.errors.clear();
        // Not busy here, so nothing can be cancelled.
        let _ = rebind(&mut self.state, &self.flow);
        vec![SessionAction::Render]
    }

    /// Reset to the entry point, clearing history, inputs, errors, and any
    /// fault, and cancelling a pending effect.
    pub fn restart(&mut self) -> Vec<SessionAction> {
        let mut actions = self.cancel_effect();
        self.state.reset(&self.flow);
        tracing::debug!(start = %self.state.current, "restart");
        actions.push(SessionAction::Render);
        actions
    }

    /// Store an entered value and clear that field's error.
    ///
    /// Only inputs on the current screen are accepted, and only while the
    /// session is neither busy nor faulted.
    pub fn set_input(&mut self, component: ComponentId, value: String) -> Vec<SessionAction> {
        if self.state.is_busy() || self.state.fault.is_some() {
            return vec![];
        }

        let is_input = self
            .current_screen()
            .and_then(|screen| screen.component(component.as_str()))
            .is_some_and(|c| c.as_input().is_some());
        if !is_input {
            tracing::debug!(%component, "input for unknown field ignored");
            return vec![];
        }

        self.state.errors.remove(&component);
        self.state.inputs.insert(component, value);
        vec![SessionAction::Render]
    }

    /// Apply a completion reported by the runtime.
    ///
    /// Stale completions (cancelled or superseded) are discarded.
    pub fn complete_effect(&mut self, generation: EffectGeneration) -> Vec<SessionAction> {
        match self.state.effects.complete(generation) {
            Ok(effect) => {
                tracing::debug!(%generation, target = %effect.target, "effect completed");
                self.navigate(effect.target)
            },
            Err(stale) => {
                tracing::warn!("{stale}");
                vec![]
            },
        }
    }

    /// Push the current screen and move to `target`, or fault if it is
    /// missing.
    fn navigate(&mut self, target: ScreenId) -> Vec<SessionAction> {
        self.state.errors.clear();

        if !self.flow.contains_screen(target.as_str()) {
            tracing::warn!(from = %self.state.current, %target, "navigation to missing screen");
            self.state.fault =
                Some(SessionFault::DanglingTarget { target, from: self.state.current.clone() });
            return vec![SessionAction::Render];
        }

        tracing::debug!(from = %self.state.current, to = %target, "goto_screen");
        let previous = std::mem::replace(&mut self.state.current, target);
        self.state.history.push(previous);
        vec![SessionAction::Render]
    }

    fn begin_effect(&mut self, target: ScreenId) -> Vec<SessionAction> {
        let payload = EnqueuePayload(self.state.inputs.clone());
        match self.state.effects.begin(target, payload) {
            Some(effect) => {
                tracing::debug!(generation = %effect.generation, target = %effect.target, "effect started");
                vec![SessionAction::BeginEffect(effect), SessionAction::Render]
            },
            None => vec![],
        }
    }

    fn cancel_effect(&mut self) -> Vec<SessionAction> {
        self.state
            .effects
            .cancel()
            .map(|generation| {
                tracing::debug!(%generation, "effect cancelled");
                vec![SessionAction::CancelEffect { generation }]
            })
            .unwrap_or_default()
    }

    /// The flow being walked.
    pub fn flow(&self) -> &Arc<Flow> {
        &self.flow
    }

    /// Navigation state.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The current screen. `None` only while faulted on a vanished screen.
    pub fn current_screen(&self) -> Option<&Screen> {
        self.flow.screen(self.state.current.as_str())
    }

    /// Renderable description of the current state.
    pub fn view(&self) -> ScreenView {
        project(&self.flow, &self.state)
    }
}

/// Re-check `state` against `flow`: fault if the current screen is gone, and
/// drop errors for components the screen no longer validates.
///
/// Faulting cancels any pending effect; its generation is returned.
fn rebind(state: &mut NavigationState, flow: &Flow) -> Option<EffectGeneration> {
    if state.fault.is_some() {
        return None;
    }

    match flow.screen(state.current.as_str()) {
        Some(screen) => {
            let validated = |id: &ComponentId| screen.is_form() && screen.component(id.as_str()).is_some();
            state.errors.retain(|id, _| validated(id));
            None
        },
        None => {
            tracing::warn!(screen = %state.current, flow = %flow.flow_id, "current screen no longer in flow");
            state.errors.clear();
            state.fault = Some(SessionFault::DanglingTarget {
                target: state.current.clone(),
                from: state.current.clone(),
            });
            let cancelled = state.effects.cancel();
            if let Some(generation) = cancelled {
                tracing::debug!(%generation, "effect cancelled by fault");
            }
            cancelled
        },
    }
}

#[cfg(test)]
mod tests {
    use kioskflow_proto::{ButtonAction, Component, ScreenKind, ValidationRule};

    use super::*;

    fn flow() -> Arc<Flow> {
        Arc::new(
            Flow::new("f", "welcome")
                .with_screen(
                    Screen::new("welcome", "Welcome", ScreenKind::Menu)
                        .with_component(Component::button(
                            "go",
                            "Go",
                            ButtonAction::GotoScreen { target: "form".into() },
                        ))
                        .with_component(Component::button(
                            "broken",
                            "Broken",
                            ButtonAction::GotoScreen { target: "missing_screen".into() },
                        )),
                )
                .with_screen(
                    Screen::new("form", "Form", ScreenKind::Form)
                        .with_component(Component::text_input(
                            "cpf",
                            Some(ValidationRule {
                                regex: r"^\d{11}$".into(),
                                message: "11 digits".into(),
                            }),
                        ))
                        .with_component(Component::button(
                            "print",
                            "Print",
                            ButtonAction::Enqueue { target: "done".into() },
                        )),
                )
                .with_screen(
                    Screen::new("done", "Done", ScreenKind::Success)
                        .with_component(Component::button("again", "Again", ButtonAction::Restart)),
                ),
        )
    }

    fn press(session: &mut Session, id: &str) -> Vec<SessionAction> {
        session.handle(SessionEvent::Press { component: id.into() })
    }

    fn type_in(session: &mut Session, id: &str, value: &str) -> Vec<SessionAction> {
        session.handle(SessionEvent::Input { component: id.into(), value: value.into() })
    }

    #[test]
    fn starts_on_entry_point() {
        let session = Session::new(flow()).unwrap();

        assert_eq!(session.state().current_screen_id().as_str(), "welcome");
        assert!(session.state().history().is_empty());
    }

    #[test]
    fn unenterable_flow_is_rejected() {
        let flow = Arc::new(Flow::new("f", "nowhere"));
        assert!(Session::new(flow).is_err());
    }

    #[test]
    fn goto_pushes_history() {
        let mut session = Session::new(flow()).unwrap();
        let actions = press(&mut session, "go");

        assert_eq!(actions, vec![SessionAction::Render]);
        assert_eq!(session.state().current_screen_id().as_str(), "form");
        assert_eq!(session.state().history(), &[ScreenId::new("welcome")]);
    }

    #[test]
    fn validation_blocks_then_clears_on_edit() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "123");

        press(&mut session, "print");
        assert_eq!(session.state().current_screen_id().as_str(), "form");
        assert!(session.state().validation_errors().contains_key("cpf"));
        assert!(!session.state().is_busy());

        type_in(&mut session, "cpf", "1234");
        assert!(session.state().validation_errors().is_empty());
    }

    #[test]
    fn enqueue_then_completion_navigates() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "12345678901");

        let actions = press(&mut session, "print");
        let Some(SessionAction::BeginEffect(effect)) = actions.first().cloned() else {
            panic!("expected BeginEffect, got {actions:?}");
        };
        assert_eq!(effect.payload.0.get("cpf").map(String::as_str), Some("12345678901"));
        assert!(session.state().is_busy());

        session.handle(SessionEvent::EffectCompleted { generation: effect.generation });
        assert_eq!(session.state().current_screen_id().as_str(), "done");
        assert!(!session.state().is_busy());
    }

    #[test]
    fn busy_session_ignores_everything_but_restart() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "12345678901");
        press(&mut session, "print");

        assert!(press(&mut session, "print").is_empty());
        assert!(type_in(&mut session, "cpf", "0").is_empty());
        assert!(session.handle(SessionEvent::Back).is_empty());

        let actions = session.handle(SessionEvent::Restart);
        assert!(matches!(actions.as_slice(), [
            SessionAction::CancelEffect { .. },
            SessionAction::Render
        ]));
    }

    #[test]
    fn late_completion_after_restart_is_discarded() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "12345678901");
        let Some(SessionAction::BeginEffect(effect)) = press(&mut session, "print").first().cloned()
        else {
            panic!("expected BeginEffect");
        };

        session.restart();
        let actions = session.complete_effect(effect.generation);

        assert!(actions.is_empty());
        assert_eq!(session.state().current_screen_id().as_str(), "welcome");
        assert!(session.state().history().is_empty());
        assert!(session.state().inputs().is_empty());
        assert!(!session.state().is_busy());
    }

    #[test]
    fn dangling_target_faults_until_restart() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "broken");

        let fault = session.state().fault().cloned().unwrap();
        assert_eq!(fault.missing_screen().as_str(), "missing_screen");
        assert!(session.state().history().is_empty());
        assert!(press(&mut session, "go").is_empty());

        session.restart();
        assert!(session.state().fault().is_none());
        assert_eq!(session.state().current_screen_id().as_str(), "welcome");
    }

    #[test]
    fn same_flow_id_reload_keeps_position() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");

        let mut edited = (*flow()).clone();
        if let Some(screen) = edited.screens.get_mut("form") {
            screen.title = "Renamed".into();
        }
        session.load(Arc::new(edited)).unwrap();

        assert_eq!(session.state().current_screen_id().as_str(), "form");
        assert_eq!(session.current_screen().map(|s| s.title.as_str()), Some("Renamed"));
    }

    #[test]
    fn same_flow_id_reload_without_current_screen_faults() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");

        let mut edited = (*flow()).clone();
        edited.screens.shift_remove("form");
        session.load(Arc::new(edited)).unwrap();

        assert_eq!(
            session.state().fault().map(|f| f.missing_screen().as_str()),
            Some("form")
        );
    }

    #[test]
    fn new_flow_id_forces_restart() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "12345678901");
        press(&mut session, "print");

        let mut other = (*flow()).clone();
        other.flow_id = "g".into();
        let actions = session.load(Arc::new(other)).unwrap();

        assert!(matches!(actions.as_slice(), [
            SessionAction::CancelEffect { .. },
            SessionAction::Render
        ]));
        assert_eq!(session.state().current_screen_id().as_str(), "welcome");
        assert!(session.state().inputs().is_empty());
        assert!(!session.state().is_busy());
    }

    #[test]
    fn reload_removing_current_screen_cancels_pending_effect() {
        let mut session = Session::new(flow()).unwrap();
        press(&mut session, "go");
        type_in(&mut session, "cpf", "12345678901");
        let Some(SessionAction::BeginEffect(effect)) = press(&mut session, "print").first().cloned()
        else {
            panic!("expected BeginEffect");
        };

        let mut edited = (*flow()).clone();
        edited.screens.shift_remove("form");
        let actions = session.load(Arc::new(edited)).unwrap();

        assert_eq!(actions, vec![
            SessionAction::CancelEffect { generation: effect.generation },
            SessionAction::Render
        ]);
        assert!(!session.state().is_busy());

        assert!(session.complete_effect(effect.generation).is_empty());
        assert_eq!(session.state().current_screen_id().as_str(), "form");
        assert_eq!(session.state().history().iter().map(|s| s.as_str()).collect::<Vec<_>>(), [
            "welcome"
        ]);
        assert!(session.state().fault().is_some());
    }
}
