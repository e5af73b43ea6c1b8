//! Terminal kiosk simulator.
//!
//! A thin shell over [`kioskflow_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`kioskflow_app::Runtime`].
//!
//! This crate only handles terminal input, file watching, and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use kioskflow_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError, convert_key};
