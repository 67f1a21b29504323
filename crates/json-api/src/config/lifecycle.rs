//! Lifecycle Config

use std::time::Duration;

use clap::Args;

/// Bounds on how long a challenged event waits for the merchant.
#[derive(Debug, Clone, Args)]
pub struct LifecycleConfig {
    /// Seconds a challenged event waits before it fails and its token is revoked.
    #[arg(long, env = "VERIFICATION_TIMEOUT_SECONDS", default_value_t = 600_u64)]
    pub verification_timeout_seconds: u64,

    /// Milliseconds between checks of a waiting event.
    #[arg(
        long,
        env = "VERIFICATION_POLL_INTERVAL_MS",
        default_value_t = 10_000_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub verification_poll_interval_ms: u64,
}

impl LifecycleConfig {
    #[must_use]
    pub fn verification_timeout(&self) -> Duration {
        Duration::from_secs(self.verification_timeout_seconds)
    }

    #[must_use]
    pub fn verification_poll_interval(&self) -> Duration {
        Duration::from_millis(self.verification_poll_interval_ms)
    }
}
