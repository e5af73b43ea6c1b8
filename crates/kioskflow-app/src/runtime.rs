//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: kiosk state machine
//! - [`Driver`]: platform-specific I/O
//! - [`Environment`]: clock and timers for effect latency and draft debounce
//!
//! Timers live here, not in the state machines. A timer is tagged with the
//! generation it was started for, so a cancelled effect's timer is simply
//! dropped and a superseded draft's timer is ignored by the [`App`].

use std::{future::Future, pin::Pin};

use kioskflow_core::{EffectGeneration, Environment, PendingEffect};

use crate::{App, AppAction, AppConfig, AppEvent, DraftGeneration, Driver};

type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A running timer and the generation it reports.
type Timer<G> = (G, Sleep);

/// What woke the loop.
enum Wake {
    Polled(Option<AppEvent>),
    EffectDue(EffectGeneration),
    ReparseDue(DraftGeneration),
}

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the clock and sleeps
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    app: App,
    config: AppConfig,
    effect_timer: Option<Timer<EffectGeneration>>,
    effect_started: Option<E::Instant>,
    reparse_timer: Option<Timer<DraftGeneration>>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime hosting `app`.
    pub fn new(driver: D, env: E, app: App, config: AppConfig) -> Self {
        Self {
            driver,
            env,
            app,
            config,
            effect_timer: None,
            effect_started: None,
            reparse_timer: None,
        }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// Returns the final App state.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let wake = tokio::select! {
                polled = self.driver.poll_event() => Wake::Polled(polled?),
                generation = expire(&mut self.effect_timer) => Wake::EffectDue(generation),
                generation = expire(&mut self.reparse_timer) => Wake::ReparseDue(generation),
            };

            let event = match wake {
                Wake::Polled(None) => continue,
                Wake::Polled(Some(event)) => event,
                Wake::EffectDue(generation) => {
                    self.effect_timer = None;
                    self.acknowledge_effect(generation);
                    AppEvent::EffectCompleted { generation }
                },
                Wake::ReparseDue(generation) => {
                    self.reparse_timer = None;
                    AppEvent::ReparseDue { generation }
                },
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                break;
            }
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if the application should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::BeginEffect(effect) => self.begin_effect(&effect),
                AppAction::CancelEffect { generation } => {
                    if self.effect_timer.as_ref().is_some_and(|(pending, _)| *pending == generation)
                    {
                        tracing::debug!(%generation, "effect timer dropped");
                        self.effect_timer = None;
                        self.effect_started = None;
                    }
                },
                AppAction::ScheduleReparse { generation } => {
                    let sleep = self.sleep(self.config.reparse_debounce);
                    self.reparse_timer = Some((generation, sleep));
                },
            }
        }
        Ok(false)
    }

    /// Hand the payload to the (simulated) transport and start the latency
    /// timer.
    fn begin_effect(&mut self, effect: &PendingEffect) {
        match effect.payload.to_json() {
            Ok(body) => tracing::info!(
                generation = %effect.generation,
                target = %effect.target,
                %body,
                "POST /queue"
            ),
            Err(err) => tracing::warn!(generation = %effect.generation, "unencodable payload: {err}"),
        }

        let sleep = self.sleep(self.config.effect_latency);
        self.effect_timer = Some((effect.generation, sleep));
        self.effect_started = Some(self.env.now());
    }

    /// Report how long the transport took to acknowledge the effect.
    fn acknowledge_effect(&mut self, generation: EffectGeneration) {
        let Some(started) = self.effect_started.take() else {
            return;
        };
        let elapsed = self.env.now() - started;
        tracing::info!(%generation, ?elapsed, "queue acknowledged");
        self.app.set_status(format!("Queue acknowledged in {} ms", elapsed.as_millis()));
    }

    fn sleep(&self, duration: std::time::Duration) -> Sleep {
        let env = self.env.clone();
        Box::pin(async move { env.sleep(duration).await })
    }
}

/// Resolve when `timer` fires. Never resolves without a timer.
async fn expire<G: Copy>(timer: &mut Option<Timer<G>>) -> G {
    match timer {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        },
        None => std::future::pending().await,
    }
}
