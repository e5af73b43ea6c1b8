//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`kioskflow_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! A run is a script of [`Step`]s: events to inject and virtual-time waits
//! between them. When the script runs out the driver injects Ctrl-C, so
//! every simulated run terminates.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use kioskflow_app::{App, AppEvent, Driver, KeyInput};
use kioskflow_core::ScreenView;
use kioskflow_proto::{ComponentId, ScreenId};
use tokio::time::Instant;

use crate::invariants::{InvariantRegistry, SessionSnapshot};

/// One scripted step.
#[derive(Debug, Clone)]
pub enum Step {
    /// Deliver an event.
    Event(AppEvent),
    /// Let virtual time pass.
    Wait(Duration),
}

impl Step {
    /// Shorthand for a key press.
    pub fn key(key: KeyInput) -> Self {
        Self::Event(AppEvent::Key(key))
    }

    /// Shorthand for typing a string, one key per character.
    pub fn type_text(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.chars().map(|c| Self::key(KeyInput::Char(c)))
    }
}

/// What one render showed.
#[derive(Debug, Clone)]
pub struct RenderRecord {
    /// Virtual time since the driver was created.
    pub at: Duration,
    /// Rendered view.
    pub view: ScreenView,
    /// Focused component.
    pub focused: Option<ComponentId>,
    /// Document error shown in the status bar.
    pub document_error: Option<String>,
    /// Status message shown in the status bar.
    pub status: Option<String>,
}

impl RenderRecord {
    /// Screen shown, if the view is a regular page.
    pub fn page_screen(&self) -> Option<&ScreenId> {
        match &self.view {
            ScreenView::Page(page) => Some(&page.screen_id),
            ScreenView::Busy(_) | ScreenView::Fault(_) => None,
        }
    }
}

/// Shared state for script injection and render capture.
///
/// This allows inspection after the runtime has consumed the driver.
#[derive(Default)]
struct SharedState {
    script: VecDeque<Step>,
    renders: Vec<RenderRecord>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`kioskflow_app::Runtime`]
/// orchestration code runs in both the terminal and simulation tests.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<InvariantRegistry>,
    started: Instant,
    wait_until: Option<Instant>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver with an empty script.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            invariants: None,
            started: Instant::now(),
            wait_until: None,
        }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Append steps to the script.
    #[must_use]
    pub fn with_script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.lock().script.extend(steps);
        self
    }

    /// Handle for inspecting the run after the runtime took the driver.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state) }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = Infallible;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if let Some(deadline) = self.wait_until {
            tokio::time::sleep_until(deadline).await;
            self.wait_until = None;
            return Ok(None);
        }

        let step = self.lock().script.pop_front();
        match step {
            None => Ok(Some(AppEvent::Key(KeyInput::Interrupt))),
            Some(Step::Event(event)) => {
                tracing::trace!(?event, "sim inject");
                Ok(Some(event))
            },
            Some(Step::Wait(duration)) => {
                tracing::trace!(?duration, "sim wait");
                let deadline = Instant::now() + duration;
                self.wait_until = Some(deadline);
                tokio::time::sleep_until(deadline).await;
                self.wait_until = None;
                Ok(None)
            },
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let record = RenderRecord {
            at: self.started.elapsed(),
            view: app.view(),
            focused: app.focused_id(),
            document_error: app.document_error().map(str::to_owned),
            status: app.status_message().map(str::to_owned),
        };

        if let Some(ref registry) = self.invariants {
            let context = format!("after render #{} at {:?}", self.lock().renders.len(), record.at);
            registry.assert_all(&SessionSnapshot::from_app(app), &context);
        }

        self.lock().renders.push(record);
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

/// Read access to a simulated run.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

impl SimHandle {
    /// Every render so far, in order.
    pub fn renders(&self) -> Vec<RenderRecord> {
        self.lock().renders.clone()
    }

    /// The most recent render.
    pub fn last_render(&self) -> Option<RenderRecord> {
        self.lock().renders.last().cloned()
    }

    /// Whether the runtime shut the driver down.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Steps not yet consumed.
    pub fn remaining_steps(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
