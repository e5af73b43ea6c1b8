//! Application layer for the kiosk flow interpreter.
//!
//! Pure state machine and generic runtime around a kiosk session, enabling
//! deterministic simulation testing with the same code that runs in the
//! terminal.
//!
//! # Components
//!
//! - [`App`]: host state machine (focus, document adoption, status)
//! - [`DraftBuffer`]: debounced re-parsing of authoring-surface edits
//! - [`FlowGenerator`]: natural-language flow generation with fallback
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver and timers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod draft;
mod driver;
mod event;
mod generator;
mod input;
mod runtime;
mod system_env;

pub use action::AppAction;
pub use app::App;
pub use config::{AppConfig, DEFAULT_EFFECT_LATENCY, DEFAULT_GENERATOR_TIMEOUT, DEFAULT_REPARSE_DEBOUNCE};
pub use draft::{DraftBuffer, DraftGeneration};
pub use driver::Driver;
pub use event::AppEvent;
pub use generator::{
    CommandGenerator, FlowGenerator, GENERATOR_INSTRUCTIONS, GeneratedFlow, GeneratorError,
    generate_flow, strip_code_fence,
};
pub use input::KeyInput;
pub use runtime::Runtime;
pub use system_env::SystemEnv;
