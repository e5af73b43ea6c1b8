//! Virtual-time environment.
//!
//! Backed by tokio's clock, so under `#[tokio::test(start_paused = true)]`
//! every sleep completes as soon as the runtime is otherwise idle, in
//! deadline order. Latency windows of seconds run in microseconds and always
//! in the same order.

use std::time::Duration;

use kioskflow_core::Environment;
use tokio::time::Instant;

/// Environment on tokio's (pausable) clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimEnv;

impl SimEnv {
    /// Create a simulated environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SimEnv {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
