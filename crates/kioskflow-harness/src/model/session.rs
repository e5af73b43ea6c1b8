//! Naive reference implementation of the navigation rules.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use kioskflow_core::{Session, SessionEvent};
use kioskflow_proto::{ButtonAction, Flow, Screen, ScreenId};

/// State both implementations expose, in comparable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Screen being shown.
    pub current: ScreenId,
    /// Back stack.
    pub history: Vec<ScreenId>,
    /// Entered values by component id.
    pub inputs: BTreeMap<String, String>,
    /// Components with a validation error.
    pub error_fields: BTreeSet<String>,
    /// Completion target of the pending effect.
    pub pending: Option<ScreenId>,
    /// Whether the session is degraded.
    pub faulted: bool,
}

impl ObservableState {
    /// Observe a real session.
    pub fn from_session(session: &Session) -> Self {
        let state = session.state();
        Self {
            current: state.current_screen_id().clone(),
            history: state.history().to_vec(),
            inputs: state
                .inputs()
                .iter()
                .map(|(id, value)| (id.as_str().to_owned(), value.clone()))
                .collect(),
            error_fields: state.validation_errors().keys().map(|id| id.as_str().to_owned()).collect(),
            pending: state.pending_effect().map(|effect| effect.target.clone()),
            faulted: state.fault().is_some(),
        }
    }
}

/// Reference session.
#[derive(Debug, Clone)]
pub struct ModelSession {
    flow: Arc<Flow>,
    state: ObservableState,
}

impl ModelSession {
    /// Start on the flow's entry point.
    pub fn new(flow: Arc<Flow>) -> Self {
        let state = Self::initial(&flow);
        Self { flow, state }
    }

    fn initial(flow: &Flow) -> ObservableState {
        ObservableState {
            current: flow.start_screen_id.clone(),
            history: Vec::new(),
            inputs: BTreeMap::new(),
            error_fields: BTreeSet::new(),
            pending: None,
            faulted: false,
        }
    }

    /// Current observable state.
    pub fn observe(&self) -> &ObservableState {
        &self.state
    }

    /// The screen being shown, if it exists.
    pub fn screen(&self) -> Option<&Screen> {
        self.flow.screen(self.state.current.as_str())
    }

    /// Apply a resolved session event.
    pub fn apply(&mut self, event: &SessionEvent) {
        let stuck = self.state.pending.is_some() || self.state.faulted;

        match event {
            SessionEvent::Restart => self.state = Self::initial(&self.flow),
            SessionEvent::Press { component } => {
                let Some(button) = self
                    .screen()
                    .and_then(|s| s.component(component.as_str()))
                    .and_then(|c| c.as_button())
                    .cloned()
                else {
                    return;
                };

                if matches!(button.action, ButtonAction::Restart) {
                    self.state = Self::initial(&self.flow);
                    return;
                }
                if stuck {
                    return;
                }

                let failing = self.failing_fields();
                if !failing.is_empty() {
                    self.state.error_fields = failing;
                    return;
                }

                match button.action {
                    ButtonAction::GotoScreen { target } => self.go(target),
                    ButtonAction::Enqueue { target } => self.state.pending = Some(target),
                    ButtonAction::Restart => {},
                }
            },
            SessionEvent::Input { component, value } => {
                let is_input = self
                    .screen()
                    .and_then(|s| s.component(component.as_str()))
                    .is_some_and(|c| c.as_input().is_some());
                if stuck || !is_input {
                    return;
                }
                self.state.error_fields.remove(component.as_str());
                self.state.inputs.insert(component.as_str().to_owned(), value.clone());
            },
            SessionEvent::Back => {
                if stuck {
                    return;
                }
                if let Some(previous) = self.state.history.pop() {
                    self.state.current = previous;
                    self.state.error_fields.clear();
                }
            },
            SessionEvent::EffectCompleted { .. } => {
                if let Some(target) = self.state.pending.take() {
                    self.go(target);
                }
            },
        }
    }

    fn go(&mut self, target: ScreenId) {
        self.state.error_fields.clear();
        if self.flow.contains_screen(target.as_str()) {
            let previous = std::mem::replace(&mut self.state.current, target);
            self.state.history.push(previous);
        } else {
            self.state.faulted = true;
        }
    }

    fn failing_fields(&self) -> BTreeSet<String> {
        let Some(screen) = self.screen().filter(|s| s.is_form()) else {
            return BTreeSet::new();
        };

        screen
            .components
            .iter()
            .filter_map(|c| Some((c, c.as_input()?.validation.as_ref()?)))
            .filter(|(c, rule)| {
                let value = self.state.inputs.get(c.id.as_str()).map_or("", String::as_str);
                !rule.compile().is_ok_and(|pattern| pattern.is_match(value))
            })
            .map(|(c, _)| c.id.as_str().to_owned())
            .collect()
    }
}
