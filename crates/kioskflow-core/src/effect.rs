//! Simulated asynchronous side effects.
//!
//! Models an operation with a fixed latency window, such as printing a ticket
//! or calling a remote queue. The tracker itself is pure: it hands out a
//! [`PendingEffect`] and later accepts or rejects a completion. Waiting out the
//! latency is the runtime's job.
//!
//! # Invariants
//!
//! - Exclusivity: at most one effect is pending per session.
//! - Generation Monotonicity: every effect gets a generation strictly greater
//!   than all earlier ones, and cancellation does NOT rewind the counter. A
//!   completion is applied only if its generation is the pending one, so a
//!   timer that fires after a logical cancel can never navigate a session
//!   that has since been reset.

use std::fmt;

use kioskflow_proto::ScreenId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Inputs;

/// Tag distinguishing one effect from every other effect of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectGeneration(u64);

impl EffectGeneration {
    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Body of the simulated `POST /queue` call: the collected inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnqueuePayload(pub Inputs);

impl EnqueuePayload {
    /// JSON object mapping component id to value.
    ///
    /// # Errors
    ///
    /// Never fails for string maps; the `Result` mirrors `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// An in-flight effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffect {
    /// Identity of this effect.
    pub generation: EffectGeneration,
    /// Screen to navigate to on completion.
    pub target: ScreenId,
    /// Inputs snapshot taken when the effect began.
    pub payload: EnqueuePayload,
}

/// Why a completion was not applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleCompletion {
    /// Nothing is pending (cancelled by restart, or already completed).
    #[error("no effect pending, completion {0} discarded")]
    NothingPending(EffectGeneration),

    /// A newer effect replaced the one that completed.
    #[error("completion {completed} does not match pending {pending}")]
    Superseded {
        /// Generation that fired.
        completed: EffectGeneration,
        /// Generation currently pending.
        pending: EffectGeneration,
    },
}

/// One-at-a-time effect bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTracker {
    /// Last generation handed out. Never decreases.
    last_generation: u64,
    /// The in-flight effect, if any.
    pending: Option<PendingEffect>,
}

impl EffectTracker {
    /// Create a tracker with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect. `None` if one is already pending.
    pub fn begin(&mut self, target: ScreenId, payload: EnqueuePayload) -> Option<PendingEffect> {
        if self.pending.is_some() {
            return None;
        }

        self.last_generation = self.last_generation.saturating_add(1);
        let effect =
            PendingEffect { generation: EffectGeneration(self.last_generation), target, payload };
        self.pending = Some(effect.clone());
        Some(effect)
    }

    /// Drop the pending effect without completing it.
    ///
    /// Returns the cancelled generation so the runtime can drop its timer.
    pub fn cancel(&mut self) -> Option<EffectGeneration> {
        self.pending.take().map(|effect| effect.generation)
    }

    /// Accept a completion for `generation`.
    ///
    /// # Errors
    ///
    /// Returns [`StaleCompletion`] if `generation` is not the pending effect.
    /// The pending effect, if any, is left untouched.
    pub fn complete(&mut self, generation: EffectGeneration) -> Result<PendingEffect, StaleCompletion> {
        match &self.pending {
            None => Err(StaleCompletion::NothingPending(generation)),
            Some(effect) if effect.generation != generation => Err(StaleCompletion::Superseded {
                completed: generation,
                pending: effect.generation,
            }),
            Some(_) => self.pending.take().ok_or(StaleCompletion::NothingPending(generation)),
        }
    }

    /// The in-flight effect, if any.
    pub fn pending(&self) -> Option<&PendingEffect> {
        self.pending.as_ref()
    }

    /// Whether an effect is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ScreenId {
        ScreenId::new("done")
    }

    #[test]
    fn second_begin_is_refused() {
        let mut tracker = EffectTracker::new();

        assert!(tracker.begin(target(), EnqueuePayload::default()).is_some());
        assert!(tracker.begin(target(), EnqueuePayload::default()).is_none());
    }

    #[test]
    fn completion_after_cancel_is_stale() {
        let mut tracker = EffectTracker::new();
        let effect = tracker.begin(target(), EnqueuePayload::default()).unwrap();

        assert_eq!(tracker.cancel(), Some(effect.generation));
        assert_eq!(
            tracker.complete(effect.generation),
            Err(StaleCompletion::NothingPending(effect.generation))
        );
    }

    #[test]
    fn cancel_does_not_rewind_generations() {
        let mut tracker = EffectTracker::new();
        let first = tracker.begin(target(), EnqueuePayload::default()).unwrap();
        tracker.cancel();
        let second = tracker.begin(target(), EnqueuePayload::default()).unwrap();

        assert!(second.generation > first.generation);
        assert!(matches!(
            tracker.complete(first.generation),
            Err(StaleCompletion::Superseded { .. })
        ));
        assert!(tracker.is_pending());
        assert_eq!(tracker.complete(second.generation).map(|e| e.target), Ok(target()));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn payload_serializes_as_flat_object() {
        let mut inputs = Inputs::new();
        inputs.insert("inp_cpf".into(), "12345678901".into());

        assert_eq!(EnqueuePayload(inputs).to_json().unwrap(), r#"{"inp_cpf":"12345678901"}"#);
    }
}
