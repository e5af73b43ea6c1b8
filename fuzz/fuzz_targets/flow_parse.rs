//! Fuzz target for the flow document parser
//!
//! # Strategy
//!
//! - Arbitrary bytes, lossily decoded, fed to `Flow::parse`
//!
//! # Invariants
//!
//! - Parsing never panics, whatever the input
//! - An accepted document can be entered and linted
//! - An accepted document's screens survive serialize + parse unchanged

#![no_main]

use std::sync::Arc;

use kioskflow_core::Session;
use kioskflow_proto::Flow;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let Ok(flow) = Flow::parse(&raw) else {
        return;
    };

    assert!(flow.contains_screen(flow.entry_point().as_str()), "accepted flow without entry point");
    let _ = flow.lint();

    let text = flow.to_json_pretty().expect("accepted flow must serialize");
    let reparsed = Flow::parse(&text).expect("serialized flow must parse");
    // `theme` is opaque and may hold floats that do not round trip exactly.
    assert_eq!(flow.flow_id, reparsed.flow_id);
    assert_eq!(flow.start_screen_id, reparsed.start_screen_id);
    assert_eq!(flow.screens, reparsed.screens, "round trip changed the screens");

    let session = Session::new(Arc::new(flow)).expect("accepted flow must be enterable");
    assert!(session.state().fault().is_none());
});
