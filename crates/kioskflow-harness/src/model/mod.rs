//! Reference model for model-based testing.
//!
//! [`ModelSession`] is a deliberately naive re-statement of the navigation
//! rules. Operations are applied to both the model and a real
//! [`kioskflow_core::Session`], and their [`ObservableState`]s are compared.

mod operation;
mod session;

pub use operation::{Operation, SmallValue};
pub use session::{ModelSession, ObservableState};
