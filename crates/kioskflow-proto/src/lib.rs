//! Flow document model.
//!
//! The JSON wire format shared by the authoring surface, the flow generator,
//! and the interpreter. A document is decoded into a [`Flow`]: a map of
//! [`Screen`]s, each holding an ordered list of [`Component`]s.
//!
//! # Loading
//!
//! [`Flow::parse`] is the only gate. It rejects text that is not JSON, JSON
//! that does not match the schema, and documents whose entry point is not a
//! screen. Everything it accepts can be entered by a session. Softer problems
//! are listed by [`Flow::lint`].
//!
//! # Invariants
//!
//! Round-trip encoding must produce identical values:
//! `Flow::parse(&flow.to_json_pretty()?) == flow` for every flow that passes
//! [`Flow::check`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod component;
mod errors;
mod fallback;
mod flow;
mod ids;
mod lint;

pub use component::{
    Button, ButtonAction, Component, ComponentKind, Image, Input, PATTERN_SIZE_LIMIT, TextBlock,
    ValidationRule,
};
pub use errors::ParseError;
pub use fallback::FALLBACK_FLOW_ID;
pub use flow::{Flow, Screen, ScreenKind};
pub use ids::{ComponentId, FlowId, ScreenId};
pub use lint::FlowWarning;
