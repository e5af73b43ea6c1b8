//! Degraded session states.
//!
//! Navigation never fails with an error return. A transition to a screen that
//! does not exist puts the session into a [`SessionFault`] instead, which the
//! render layer shows together with a single recovery affordance: restart.

use kioskflow_proto::ScreenId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a session is stuck.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionFault {
    /// A button or effect completion referenced a screen absent from the flow.
    #[error("screen '{target}' not found in flow")]
    DanglingTarget {
        /// The missing screen.
        target: ScreenId,
        /// Screen the transition started from.
        from: ScreenId,
    },
}

impl SessionFault {
    /// The screen id that could not be resolved.
    pub fn missing_screen(&self) -> &ScreenId {
        match self {
            Self::DanglingTarget { target, .. } => target,
        }
    }
}
