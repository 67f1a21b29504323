//! Server configuration module

use clap::Parser;

use crate::config::{
    lifecycle::LifecycleConfig,
    logging::LoggingConfig,
    observability::ObservabilityConfig,
    scoring::ScoringConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod lifecycle;
pub(crate) mod logging;
pub(crate) mod observability;
pub(crate) mod scoring;
pub(crate) mod server;

/// Token Gate JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "tokengate-json", about = "Token Gate JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Verification wait settings.
    #[command(flatten)]
    pub lifecycle: LifecycleConfig,

    /// Remote risk scorer settings.
    #[command(flatten)]
    pub scoring: ScoringConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
