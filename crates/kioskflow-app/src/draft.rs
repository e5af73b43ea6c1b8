//! Debounced document drafts.
//!
//! The authoring surface emits raw text on every keystroke. Re-parsing on each
//! one would flash transient errors and restart sessions half-way through an
//! edit, so drafts are committed only after a quiet period.
//!
//! [`DraftBuffer`] does the bookkeeping without a clock: each edit returns a
//! new [`DraftGeneration`], the runtime waits out the debounce window, and
//! only the newest generation is committed.

use std::fmt;

/// Tag of one draft edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftGeneration(u64);

impl fmt::Display for DraftGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draft#{}", self.0)
    }
}

/// Latest uncommitted document text.
#[derive(Debug, Clone, Default)]
pub struct DraftBuffer {
    /// Newest text. `None` once committed.
    pending: Option<String>,
    /// Generation of the newest edit.
    generation: DraftGeneration,
}

impl DraftBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit, superseding any earlier uncommitted text.
    pub fn edit(&mut self, text: String) -> DraftGeneration {
        self.generation = DraftGeneration(self.generation.0.saturating_add(1));
        self.pending = Some(text);
        self.generation
    }

    /// Take the text if `generation` is still the newest edit.
    ///
    /// Returns `None` for superseded generations and for drafts already
    /// committed.
    pub fn commit(&mut self, generation: DraftGeneration) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Whether an edit is waiting for its debounce window.
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }
}
