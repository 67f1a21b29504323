//! Scoring Config

use std::time::Duration;

use clap::Args;

use tokengate_app::domain::scoring::data::ScorerConfig;

/// Remote risk scorer settings.
#[derive(Debug, Args)]
pub struct ScoringConfig {
    /// Endpoint of the remote risk scorer; `/assess` is disabled when unset.
    #[arg(long, env = "RISK_SCORER_URL")]
    pub risk_scorer_url: Option<String>,

    /// Remote risk scorer request timeout in seconds.
    #[arg(long, env = "RISK_SCORER_TIMEOUT_SECONDS", default_value_t = 5_u64)]
    pub risk_scorer_timeout_seconds: u64,
}

impl ScoringConfig {
    #[must_use]
    pub fn scorer_config(&self) -> Option<ScorerConfig> {
        self.risk_scorer_url.as_ref().map(|url| ScorerConfig {
            url: url.clone(),
            timeout: Duration::from_secs(self.risk_scorer_timeout_seconds),
        })
    }
}
