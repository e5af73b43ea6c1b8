//! Runtime configuration.

use std::time::Duration;

/// How long the simulated enqueue call takes.
pub const DEFAULT_EFFECT_LATENCY: Duration = Duration::from_secs(2);

/// Quiet period after the last draft edit before it is re-parsed.
pub const DEFAULT_REPARSE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Upper bound on one flow generator invocation.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing knobs of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Latency of the simulated side effect.
    pub effect_latency: Duration,
    /// Debounce window for draft re-parsing.
    pub reparse_debounce: Duration,
    /// Flow generator deadline.
    pub generator_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            effect_latency: DEFAULT_EFFECT_LATENCY,
            reparse_debounce: DEFAULT_REPARSE_DEBOUNCE,
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }
}
