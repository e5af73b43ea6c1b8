//! Application input events.
//!
//! This module defines [`AppEvent`], the full set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interactions (keys, resize) and periodic ticks from the driver.
//! - The authoring surface (draft edits, generated flows).
//! - Timers owned by the runtime (effect completion, draft debounce).

use kioskflow_core::EffectGeneration;

use crate::{DraftGeneration, GeneratedFlow, KeyInput};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The document text changed in the authoring surface.
    DraftEdited {
        /// Full new text.
        text: String,
    },

    /// The debounce window of a draft edit elapsed.
    ReparseDue {
        /// Edit the timer was started for.
        generation: DraftGeneration,
    },

    /// The latency window of a simulated effect elapsed.
    EffectCompleted {
        /// Effect the timer was started for.
        generation: EffectGeneration,
    },

    /// The flow generator answered.
    FlowGenerated(GeneratedFlow),
}
