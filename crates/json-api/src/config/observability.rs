//! Telemetry Config

use std::time::Duration;

use clap::Args;

/// Tracing export and request timing settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export spans over OTLP
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// Continue traces from incoming `traceparent` headers
    #[arg(long, env = "OTEL_PARENT_PROPAGATION_ENABLED", default_value_t = false)]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC collector endpoint
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", default_value = "http://localhost:4317")]
    pub otel_endpoint: String,

    /// Seconds before an OTLP export is abandoned
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3)]
    pub otel_export_timeout_seconds: u64,

    /// Service name reported on every span
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "tokengate-json")]
    pub otel_service_name: String,

    /// Deployment environment reported on every span
    #[arg(long, env = "OTEL_DEPLOYMENT_ENVIRONMENT", default_value = "development")]
    pub otel_environment: String,

    /// Share of root traces kept, from 0.0 to 1.0
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub otel_sample_ratio: f64,

    /// Requests slower than this are logged at warn
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000)]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    /// OTLP export timeout.
    #[must_use]
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.otel_export_timeout_seconds)
    }

    /// Sample ratio clamped to `0.0..=1.0`; NaN keeps every trace.
    #[must_use]
    pub fn sample_ratio(&self) -> f64 {
        if self.otel_sample_ratio.is_nan() {
            return 1.0;
        }

        self.otel_sample_ratio.clamp(0.0, 1.0)
    }

    /// Parent contexts are only honoured while spans are exported.
    #[must_use]
    pub fn propagates_parent(&self) -> bool {
        self.otel_enabled && self.otel_parent_propagation_enabled
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use crate::config::ServerConfig;

    fn observability(args: &[&str]) -> Result<super::ObservabilityConfig, clap::Error> {
        let argv = std::iter::once("tokengate-json").chain(args.iter().copied());

        Ok(ServerConfig::try_parse_from(argv)?.observability)
    }

    #[test]
    fn sample_ratio_is_clamped_to_unit_range() -> TestResult {
        let high = observability(&["--otel-sample-ratio", "2.5"])?;
        let low = observability(&["--otel-sample-ratio=-0.5"])?;
        let nan = observability(&["--otel-sample-ratio", "NaN"])?;

        assert!((high.sample_ratio() - 1.0).abs() < f64::EPSILON, "upper bound");
        assert!(low.sample_ratio().abs() < f64::EPSILON, "lower bound");
        assert!((nan.sample_ratio() - 1.0).abs() < f64::EPSILON, "nan keeps everything");

        Ok(())
    }

    #[test]
    fn parent_propagation_requires_export() -> TestResult {
        let disabled = observability(&["--otel-parent-propagation-enabled"])?;
        let enabled = observability(&["--otel-enabled", "--otel-parent-propagation-enabled"])?;

        assert!(!disabled.propagates_parent(), "no export, no propagation");
        assert!(enabled.propagates_parent(), "export with propagation");

        Ok(())
    }
}
