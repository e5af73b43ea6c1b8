//! End-to-end runtime tests on virtual time.
//!
//! The production [`Runtime`] runs against a scripted [`SimDriver`] and the
//! paused tokio clock, so effect latency and draft debounce are observed at
//! exact virtual instants.

use std::time::Duration;

use kioskflow_app::{App, AppConfig, AppEvent, KeyInput, Runtime};
use kioskflow_core::ScreenView;
use kioskflow_harness::{InvariantRegistry, SimDriver, SimEnv, SimHandle, Step};
use kioskflow_proto::Flow;

/// Welcome → walk-in → "Exams" (enqueue, completes on `queue_lab`).
fn enqueue_lab() -> Vec<Step> {
    vec![Step::key(KeyInput::Tab), Step::key(KeyInput::Enter), Step::key(KeyInput::Enter)]
}

async fn run(script: Vec<Step>) -> (App, SimHandle) {
    let driver = SimDriver::new().with_invariants(InvariantRegistry::standard()).with_script(script);
    let handle = driver.handle();
    let app = App::new(Flow::fallback()).unwrap();

    let runtime = Runtime::new(driver, SimEnv::new(), app, AppConfig::default());
    let Ok(app) = runtime.run().await;
    (app, handle)
}

fn fallback_text() -> String {
    Flow::fallback().to_json_pretty().unwrap()
}

#[tokio::test(start_paused = true)]
async fn enqueue_completes_after_latency() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_secs(3)));

    let (app, handle) = run(script).await;

    let renders = handle.renders();
    let busy_at = renders
        .iter()
        .find(|r| matches!(r.view, ScreenView::Busy(_)))
        .map(|r| r.at)
        .expect("busy view rendered");
    let landed = renders
        .iter()
        .find(|r| r.page_screen().is_some_and(|s| s.as_str() == "queue_lab"))
        .expect("queue_lab rendered");

    assert_eq!(landed.at - busy_at, Duration::from_secs(2));
    assert_eq!(app.session().state().current_screen_id().as_str(), "queue_lab");
    assert!(handle.is_stopped());
    assert_eq!(handle.remaining_steps(), 0);
}

#[tokio::test(start_paused = true)]
async fn completion_reports_measured_latency() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_secs(3)));

    let (app, handle) = run(script).await;

    let landed = handle
        .renders()
        .into_iter()
        .find(|r| r.page_screen().is_some_and(|s| s.as_str() == "queue_lab"))
        .expect("queue_lab rendered");
    assert_eq!(landed.status.as_deref(), Some("Queue acknowledged in 2000 ms"));
    assert_eq!(app.status_message(), Some("Queue acknowledged in 2000 ms"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_effect_reports_no_latency() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_secs(1)));
    script.push(Step::key(KeyInput::Restart));
    script.push(Step::Wait(Duration::from_secs(5)));

    let (app, _) = run(script).await;

    assert!(app.status_message().is_none_or(|m| !m.starts_with("Queue acknowledged")));
}

#[tokio::test(start_paused = true)]
async fn keys_are_ignored_while_busy() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_millis(500)));
    script.push(Step::key(KeyInput::Esc));
    script.push(Step::key(KeyInput::Enter));
    script.push(Step::Wait(Duration::from_secs(2)));

    let (app, _) = run(script).await;

    let history: Vec<&str> = app.session().state().history().iter().map(|s| s.as_str()).collect();
    assert_eq!(history, ["welcome", "service_selection"]);
    assert_eq!(app.session().state().current_screen_id().as_str(), "queue_lab");
}

#[tokio::test(start_paused = true)]
async fn restart_during_effect_discards_completion() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_secs(1)));
    script.push(Step::key(KeyInput::Restart));
    script.push(Step::Wait(Duration::from_secs(5)));

    let (app, handle) = run(script).await;

    assert!(
        handle.renders().iter().all(|r| r.page_screen().is_none_or(|s| s.as_str() != "queue_lab")),
        "cancelled effect must never land"
    );
    assert_eq!(app.session().state().current_screen_id().as_str(), "welcome");
    assert!(!app.session().state().is_busy());
}

#[tokio::test(start_paused = true)]
async fn second_enqueue_after_restart_uses_fresh_timer() {
    let mut script = enqueue_lab();
    script.push(Step::Wait(Duration::from_millis(1500)));
    script.push(Step::key(KeyInput::Restart));
    script.extend(enqueue_lab());
    script.push(Step::Wait(Duration::from_millis(1000)));

    let (app, _) = run(script).await;

    // The first timer would have fired at 2.0s; the second fires at 3.5s.
    assert!(app.session().state().is_busy());
    assert_eq!(app.session().state().current_screen_id().as_str(), "service_selection");
}

#[tokio::test(start_paused = true)]
async fn draft_edits_are_debounced() {
    let first = fallback_text().replace("Identification", "First");
    let second = fallback_text().replace("Identification", "Second");
    let script = vec![
        Step::Event(AppEvent::DraftEdited { text: first }),
        Step::Wait(Duration::from_millis(100)),
        Step::Event(AppEvent::DraftEdited { text: second }),
        Step::Wait(Duration::from_secs(2)),
    ];

    let (app, handle) = run(script).await;

    let renders = handle.renders();
    assert_eq!(renders.len(), 2, "initial render plus one reload");
    assert_eq!(renders[1].at, Duration::from_millis(900));
    assert_eq!(
        app.session().flow().screen("checkin_cpf").map(|s| s.title.as_str()),
        Some("Second")
    );
    assert!(!app.has_pending_draft());
}

#[tokio::test(start_paused = true)]
async fn broken_draft_keeps_running_flow() {
    let script = vec![
        Step::key(KeyInput::Enter),
        Step::Event(AppEvent::DraftEdited { text: "{ \"screens\": ".into() }),
        Step::Wait(Duration::from_secs(1)),
    ];

    let (app, handle) = run(script).await;

    let last = handle.last_render().unwrap();
    assert!(last.document_error.is_some());
    assert_eq!(last.page_screen().map(|s| s.as_str()), Some("checkin_cpf"));
    assert_eq!(app.session().state().current_screen_id().as_str(), "checkin_cpf");
}

#[tokio::test(start_paused = true)]
async fn cpf_form_round_trip() {
    let mut script = vec![Step::key(KeyInput::Enter), Step::key(KeyInput::Tab), Step::key(KeyInput::Enter)];
    // Invalid: focus sits on the confirm button, nothing typed.
    script.push(Step::key(KeyInput::BackTab));
    script.extend(Step::type_text("12345678901"));
    script.push(Step::key(KeyInput::Tab));
    script.push(Step::key(KeyInput::Enter));

    let (app, handle) = run(script).await;

    let blocked = handle
        .renders()
        .into_iter()
        .find_map(|r| match r.view {
            ScreenView::Page(page) => page.components.into_iter().find_map(|c| match c {
                kioskflow_core::ComponentView::Input { error: Some(error), .. } => Some(error),
                _ => None,
            }),
            _ => None,
        })
        .expect("validation error rendered");
    assert_eq!(blocked, "Enter the 11 digits of your CPF");
    assert_eq!(app.session().state().current_screen_id().as_str(), "success_checkin");
}
