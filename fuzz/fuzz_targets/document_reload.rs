//! Fuzz target for document adoption mid-session
//!
//! # Strategy
//!
//! - Interleave key presses with reloads of mutated documents
//! - Mutations rename, drop, and retarget screens of the clinic flow
//!
//! # Invariants
//!
//! - A rejected document leaves the session untouched
//! - Standard session invariants hold after every event

#![no_main]

use arbitrary::Arbitrary;
use kioskflow_app::{App, AppAction, AppEvent, KeyInput};
use kioskflow_harness::{InvariantRegistry, SessionSnapshot};
use kioskflow_proto::Flow;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Key(Key),
    Load(Mutation),
    Raw(String),
    CompleteEffect,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Key {
    Digit(u8),
    Enter,
    Tab,
    Esc,
    Restart,
}

#[derive(Debug, Clone, Arbitrary)]
enum Mutation {
    Unchanged,
    RenameFlow,
    DropScreen(u8),
    Retitle(String),
}

fn document(mutation: &Mutation) -> String {
    let mut flow = Flow::fallback();
    match mutation {
        Mutation::Unchanged => {},
        Mutation::RenameFlow => flow.flow_id = "renamed".into(),
        Mutation::DropScreen(index) => {
            // Never the entry point, which would make the document invalid.
            let index = 1 + usize::from(*index) % (flow.screens.len() - 1);
            flow.screens.shift_remove_index(index);
        },
        Mutation::Retitle(title) => {
            if let Some((_, screen)) = flow.screens.first_mut() {
                screen.title = title.clone();
            }
        },
    }
    flow.to_json_pretty().expect("fallback flow serializes")
}

fn key(key: Key) -> KeyInput {
    match key {
        Key::Digit(d) => KeyInput::Char(char::from(b'0' + d % 10)),
        Key::Enter => KeyInput::Enter,
        Key::Tab => KeyInput::Tab,
        Key::Esc => KeyInput::Esc,
        Key::Restart => KeyInput::Restart,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut app = App::new(Flow::fallback()).expect("fallback flow is enterable");
    let invariants = InvariantRegistry::standard();
    let mut pending = None;

    for (i, op) in ops.iter().enumerate() {
        let actions = match op {
            Op::Key(k) => app.handle(AppEvent::Key(key(*k))),
            Op::Load(mutation) => app.load_document(&document(mutation)),
            Op::Raw(raw) => {
                let before = app.session().state().clone();
                let actions = app.load_document(raw);
                if app.document_error().is_some() {
                    assert_eq!(app.session().state(), &before, "rejected document changed state");
                }
                actions
            },
            Op::CompleteEffect => match pending.take() {
                Some(generation) => app.handle(AppEvent::EffectCompleted { generation }),
                None => continue,
            },
        };

        for action in actions {
            if let AppAction::BeginEffect(effect) = action {
                pending = Some(effect.generation);
            }
        }

        invariants.assert_all(&SessionSnapshot::from_app(&app), &format!("after op #{i} {op:?}"));
    }
});
