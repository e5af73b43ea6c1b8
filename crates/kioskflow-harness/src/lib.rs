//! Deterministic simulation harness for the kiosk flow interpreter.
//!
//! Virtual-time implementations of the Environment and Driver traits, so the
//! production [`kioskflow_app::Runtime`] can be run against scripted input on
//! tokio's paused clock.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and real implementation,
//! and their observable states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Use [`InvariantRegistry::standard()`] for the navigation
//! invariants every session must keep.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    CurrentScreenExists, ErrorsBelongToCurrentScreen, ErrorsOnlyOnForms, FaultedSessionIsIdle,
    Invariant, InvariantRegistry, InvariantResult, SessionSnapshot, ViewMatchesState, Violation,
};
pub use model::{ModelSession, ObservableState, Operation, SmallValue};
pub use sim_driver::{RenderRecord, SimDriver, SimHandle, Step};
pub use sim_env::SimEnv;
