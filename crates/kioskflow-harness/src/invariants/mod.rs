//! Session invariants.
//!
//! Every kiosk session, whatever keys were pressed and whatever documents
//! were loaded, must stay on a real screen or be faulted, keep validation
//! errors on the form that produced them, never wait on an effect while
//! faulted, and render what its state says.
//!
//! A [`SessionSnapshot`] freezes a session (or the session inside an
//! `App`); each [`Invariant`] inspects the snapshot and reports a
//! [`Violation`]. The simulation driver checks the standard set after every
//! render, and the property tests after every event:
//!
//! ```ignore
//! InvariantRegistry::standard().assert_all(&SessionSnapshot::from_app(&app), "after reload");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    CurrentScreenExists, ErrorsBelongToCurrentScreen, ErrorsOnlyOnForms, FaultedSessionIsIdle,
    ViewMatchesState,
};
pub use snapshot::SessionSnapshot;

/// Outcome of a single check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant and what the snapshot showed.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant.
    pub invariant: &'static str,
    /// Offending state, e.g. the screen or component involved.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of [`SessionSnapshot`]s.
pub trait Invariant: Send + Sync {
    /// Snake-case name used in [`Violation::invariant`].
    fn name(&self) -> &'static str;

    /// Inspect `state`.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// A set of [`Invariant`]s run together.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// No checks.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Every check in [`checks`]:
    ///
    /// | check                           | holds when                               |
    /// |---------------------------------|------------------------------------------|
    /// | [`CurrentScreenExists`]         | healthy sessions sit on a real screen    |
    /// | [`ErrorsBelongToCurrentScreen`] | errors name current-screen components    |
    /// | [`ErrorsOnlyOnForms`]           | only forms carry errors                  |
    /// | [`FaultedSessionIsIdle`]        | no effect is pending while faulted       |
    /// | [`ViewMatchesState`]            | fault and busy are what gets rendered    |
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(CurrentScreenExists);
        registry.add(ErrorsBelongToCurrentScreen);
        registry.add(ErrorsOnlyOnForms);
        registry.add(FaultedSessionIsIdle);
        registry.add(ViewMatchesState);
        registry
    }

    /// Register one more check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check, collecting all violations.
    ///
    /// # Errors
    ///
    /// Returns the violations if any check failed.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        for invariant in &self.invariants {
            if let Err(violation) = invariant.check(state) {
                violations.push(violation);
            }
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Panic listing every violation, with `context` naming the step.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let lines = violations.iter().map(|v| format!("  {v}")).collect::<Vec<_>>().join("\n");
        panic!("session invariant broken {context}:\n{lines}");
    }

    /// Registered checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
