//! Logging Config

use clap::{Args, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output.
    Compact,

    /// One JSON object per line, with span context.
    Json,
}

/// Crates whose chatter is capped at `dependency_log_level`.
const DEPENDENCIES: [&str; 6] = ["h2", "hyper", "reqwest", "tonic", "opentelemetry", "salvo_core"];

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default log level, or a full filter directive
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Level applied to HTTP and telemetry dependencies
    #[arg(long, env = "LOG_DEPENDENCY_LEVEL", default_value = "warn")]
    pub dependency_log_level: String,
}

impl LoggingConfig {
    /// `EnvFilter` directives for this configuration.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        DEPENDENCIES
            .iter()
            .fold(self.log_level.clone(), |mut directives, dependency| {
                directives.push(',');
                directives.push_str(dependency);
                directives.push('=');
                directives.push_str(&self.dependency_log_level);
                directives
            })
    }
}
