//! Fuzz target for the navigation state machine
//!
//! # Strategy
//!
//! - Arbitrary operation sequences on the built-in clinic flow
//! - Operations address components by slot, so most presses land
//!
//! # Invariants
//!
//! - Standard session invariants hold after every event
//! - The session agrees with the reference model at every step

#![no_main]

use std::sync::Arc;

use kioskflow_core::Session;
use kioskflow_harness::{InvariantRegistry, ModelSession, ObservableState, Operation, SessionSnapshot};
use kioskflow_proto::Flow;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|ops: Vec<Operation>| {
    let flow = Arc::new(Flow::fallback());
    let mut session = Session::new(Arc::clone(&flow)).expect("fallback flow is enterable");
    let mut model = ModelSession::new(flow);
    let invariants = InvariantRegistry::standard();

    for (i, op) in ops.iter().enumerate() {
        let Some(event) = op.resolve(session.current_screen(), &session) else {
            continue;
        };

        model.apply(&event);
        session.handle(event);

        invariants.assert_all(&SessionSnapshot::from_session(&session), &format!("after op #{i} {op:?}"));
        assert_eq!(model.observe(), &ObservableState::from_session(&session), "divergence at op #{i} {op:?}");
    }
});
