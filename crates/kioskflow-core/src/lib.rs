//! Sans-IO flow interpreter.
//!
//! Walks a [`Flow`](kioskflow_proto::Flow) one event at a time. Nothing in
//! this crate performs I/O or reads a clock: effect latency and document
//! reloads are driven from the outside, so the same code runs under a
//! terminal, a test harness, or a fuzzer.
//!
//! # Components
//!
//! - [`validate`]: Field Validator, gates forward progress out of forms
//! - [`dispatch`]: Action Dispatcher, maps a press to an [`Effect`]
//! - [`Session`]: Navigation State Machine over [`NavigationState`]
//! - [`EffectTracker`]: Async Effect Simulator bookkeeping (generations)
//! - [`project`]: Render Projection to a [`ScreenView`]
//! - [`Environment`]: time abstraction for the runtime that hosts a session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatch;
mod effect;
mod env;
mod error;
mod session;
mod state;
mod validator;
mod view;

pub use dispatch::{Dispatch, Effect, dispatch};
pub use effect::{EffectGeneration, EffectTracker, EnqueuePayload, PendingEffect, StaleCompletion};
pub use env::Environment;
pub use error::SessionFault;
pub use session::{Session, SessionAction, SessionEvent};
pub use state::NavigationState;
pub use validator::{FieldErrors, Inputs, validate};
pub use view::{BusyView, ComponentView, FaultView, PageView, ScreenView, project};
