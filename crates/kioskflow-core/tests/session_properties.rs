//! Property-based tests for the navigation state machine.
//!
//! Drives sessions with arbitrary event sequences and checks the properties
//! that must hold for every flow, not just hand-picked ones.

use std::sync::Arc;

use kioskflow_core::{NavigationState, Session, SessionAction, SessionEvent};
use kioskflow_proto::{ButtonAction, Component, Flow, Screen, ScreenId, ScreenKind, ValidationRule};
use proptest::prelude::*;

/// One step of a scripted run.
///
/// Completions are expressed relative to the session because generations are
/// only handed out by the session itself.
#[derive(Debug, Clone)]
enum Step {
    Event(SessionEvent),
    CompletePending,
}

fn screen_id(index: usize) -> ScreenId {
    ScreenId::new(format!("s{index}"))
}

/// Flow with `n` screens where every button target exists.
fn closed_flow() -> impl Strategy<Value = Flow> {
    (1usize..6).prop_flat_map(|n| {
        let screen = (
            prop_oneof![Just(ScreenKind::Menu), Just(ScreenKind::Form), Just(ScreenKind::Success)],
            any::<bool>(),
            prop::collection::vec((0u8..3, 0..n), 0..4),
        );
        prop::collection::vec(screen, n).prop_map(|screens| {
            screens.into_iter().enumerate().fold(
                Flow::new("closed", screen_id(0)),
                |flow, (index, (kind, has_input, buttons))| {
                    let mut screen = Screen::new(screen_id(index), format!("Screen {index}"), kind);
                    if has_input {
                        screen = screen.with_component(Component::text_input(
                            "in",
                            Some(ValidationRule { regex: "^[0-9]+$".into(), message: "digits".into() }),
                        ));
                    }
                    for (slot, (action, target)) in buttons.into_iter().enumerate() {
                        let action = match action {
                            0 => ButtonAction::GotoScreen { target: screen_id(target) },
                            1 => ButtonAction::Enqueue { target: screen_id(target) },
                            _ => ButtonAction::Restart,
                        };
                        screen = screen.with_component(Component::button(
                            format!("b{slot}"),
                            "Button",
                            action,
                        ));
                    }
                    flow.with_screen(screen)
                },
            )
        })
    })
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0u8..4).prop_map(|slot| Step::Event(SessionEvent::Press {
            component: format!("b{slot}").into()
        })),
        2 => "[0-9a]{0,3}".prop_map(|value| Step::Event(SessionEvent::Input {
            component: "in".into(),
            value
        })),
        2 => Just(Step::Event(SessionEvent::Back)),
        1 => Just(Step::Event(SessionEvent::Restart)),
        3 => Just(Step::CompletePending),
    ]
}

fn run(session: &mut Session, step: Step) -> Vec<SessionAction> {
    match step {
        Step::Event(event) => session.handle(event),
        Step::CompletePending => match session.state().pending_effect() {
            Some(effect) => {
                let generation = effect.generation;
                session.handle(SessionEvent::EffectCompleted { generation })
            },
            None => vec![],
        },
    }
}

fn assert_initial(session: &Session) {
    let state = session.state();
    assert_eq!(state.current_screen_id(), session.flow().entry_point());
    assert!(state.history().is_empty());
    assert!(state.inputs().is_empty());
    assert!(state.validation_errors().is_empty());
    assert!(state.pending_effect().is_none());
    assert!(state.fault().is_none());
}

/// s0 -> s1 -> ... -> s{n}, each with a single forward button.
fn chain(n: usize) -> Arc<Flow> {
    let flow = (0..=n).fold(Flow::new("chain", screen_id(0)), |flow, index| {
        let screen = Screen::new(screen_id(index), "Step", ScreenKind::Menu).with_component(
            Component::button("next", "Next", ButtonAction::GotoScreen {
                target: screen_id(index + 1),
            }),
        );
        flow.with_screen(screen)
    });
    Arc::new(flow)
}

proptest! {
    #[test]
    fn prop_closed_flow_never_faults(
        flow in closed_flow(),
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let mut session = Session::new(Arc::new(flow)).unwrap();

        for step in steps {
            run(&mut session, step);
            prop_assert!(session.state().fault().is_none());
            prop_assert!(session.current_screen().is_some());
        }
    }

    #[test]
    fn prop_restart_resets_everything(
        flow in closed_flow(),
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let mut session = Session::new(Arc::new(flow)).unwrap();
        for step in steps {
            run(&mut session, step);
        }

        let was_busy = session.state().is_busy();
        let actions = session.restart();

        assert_initial(&session);
        prop_assert_eq!(
            actions.iter().any(|a| matches!(a, SessionAction::CancelEffect { .. })),
            was_busy
        );
    }

    #[test]
    fn prop_back_returns_to_preceding_screen(n in 1usize..8) {
        let mut session = Session::new(chain(n)).unwrap();
        for _ in 0..n {
            session.handle(SessionEvent::Press { component: "next".into() });
        }
        prop_assert_eq!(session.state().current_screen_id(), &screen_id(n));

        for expected in (0..n).rev() {
            session.handle(SessionEvent::Back);
            prop_assert_eq!(session.state().current_screen_id(), &screen_id(expected));
        }

        let before = session.state().clone();
        prop_assert!(session.handle(SessionEvent::Back).is_empty());
        prop_assert_eq!(session.state(), &before);
    }

    #[test]
    fn prop_busy_session_only_accepts_restart(
        steps in prop::collection::vec(step_strategy(), 0..20),
    ) {
        let mut session = Session::new(Arc::new(Flow::fallback())).unwrap();
        session.handle(SessionEvent::Press { component: "btn_walkin".into() });
        session.handle(SessionEvent::Press { component: "btn_exams".into() });
        let Some(effect) = session.state().pending_effect().cloned() else {
            panic!("expected pending effect");
        };

        let before = session.state().clone();
        for step in steps {
            if let Step::Event(event @ (SessionEvent::Press { .. }
                | SessionEvent::Input { .. }
                | SessionEvent::Back)) = step
            {
                prop_assert!(session.handle(event).is_empty());
            }
        }
        prop_assert_eq!(session.state(), &before);

        session.restart();
        prop_assert!(session.complete_effect(effect.generation).is_empty());
        assert_initial(&session);
    }
}

#[test]
fn validation_gate_blocks_until_cpf_is_complete() {
    let mut session = Session::new(Arc::new(Flow::fallback())).unwrap();
    session.handle(SessionEvent::Press { component: "btn_checkin".into() });

    session.handle(SessionEvent::Input { component: "inp_cpf".into(), value: "123".into() });
    session.handle(SessionEvent::Press { component: "btn_confirm_cpf".into() });
    assert!(session.state().validation_errors().contains_key("inp_cpf"));
    assert_eq!(session.state().current_screen_id().as_str(), "checkin_cpf");

    session.handle(SessionEvent::Input {
        component: "inp_cpf".into(),
        value: "12345678901".into(),
    });
    session.handle(SessionEvent::Press { component: "btn_confirm_cpf".into() });
    assert!(session.state().validation_errors().is_empty());
    assert_eq!(session.state().current_screen_id().as_str(), "success_checkin");
}

#[test]
fn back_button_on_form_is_also_gated() {
    let mut session = Session::new(Arc::new(Flow::fallback())).unwrap();
    session.handle(SessionEvent::Press { component: "btn_checkin".into() });
    session.handle(SessionEvent::Press { component: "btn_back".into() });

    assert_eq!(session.state().current_screen_id().as_str(), "checkin_cpf");

    session.handle(SessionEvent::Back);
    assert_eq!(session.state().current_screen_id().as_str(), "welcome");
}

#[test]
fn dangling_target_is_a_recoverable_fault() {
    let mut flow = Flow::fallback();
    if let Some(screen) = flow.screens.get_mut("welcome") {
        screen.components.push(Component::button(
            "btn_broken",
            "Broken",
            ButtonAction::GotoScreen { target: "missing_screen".into() },
        ));
    }
    let mut session = Session::new(Arc::new(flow)).unwrap();

    session.handle(SessionEvent::Press { component: "btn_broken".into() });
    let fault = session.state().fault().cloned();
    assert_eq!(fault.as_ref().map(|f| f.missing_screen().as_str()), Some("missing_screen"));

    session.handle(SessionEvent::Restart);
    assert_initial(&session);
}

#[test]
fn snapshot_survives_serialization() {
    let mut session = Session::new(Arc::new(Flow::fallback())).unwrap();
    session.handle(SessionEvent::Press { component: "btn_checkin".into() });
    session.handle(SessionEvent::Input { component: "inp_cpf".into(), value: "42".into() });

    let text = serde_json::to_string(session.state()).unwrap();
    let state: NavigationState = serde_json::from_str(&text).unwrap();
    let resumed = Session::resume(session.flow().clone(), state).unwrap();

    assert_eq!(resumed.state(), session.state());
}
