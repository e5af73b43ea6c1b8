//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::sync::Arc;

use kioskflow_app::App;
use kioskflow_core::{NavigationState, ScreenView, Session};
use kioskflow_proto::Flow;

/// Snapshot of one session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Flow the session walks.
    pub flow: Arc<Flow>,
    /// Navigation state.
    pub state: NavigationState,
    /// What the render projection produced for `state`.
    pub view: ScreenView,
}

impl SessionSnapshot {
    /// Capture a session.
    pub fn from_session(session: &Session) -> Self {
        Self {
            flow: Arc::clone(session.flow()),
            state: session.state().clone(),
            view: session.view(),
        }
    }

    /// Capture the session hosted by an App.
    pub fn from_app(app: &App) -> Self {
        Self::from_session(app.session())
    }
}
