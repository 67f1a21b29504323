//! Risk scorer client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{
    risk::models::RiskScore,
    scoring::{
        data::{ScorerConfig, TransactionContext},
        errors::ScoringError,
    },
};

#[automock]
#[async_trait]
/// Produces a risk score for a transaction.
pub trait RiskScorer: Send + Sync {
    async fn score(&self, transaction: &TransactionContext) -> Result<RiskScore, ScoringError>;
}

/// Scores transactions by posting them to a remote classifier.
#[derive(Debug, Clone)]
pub struct HttpRiskScorer {
    config: ScorerConfig,
    http: Client,
}

impl HttpRiskScorer {
    /// Create a scorer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: ScorerConfig) -> Result<Self, ScoringError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl RiskScorer for HttpRiskScorer {
    async fn score(&self, transaction: &TransactionContext) -> Result<RiskScore, ScoringError> {
        let response = self
            .http
            .post(&self.config.url)
            .json(transaction)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ScoringError::UnexpectedResponse(format!(
                "score request failed with status {status}: {text}"
            )));
        }

        let parsed: ScoreResponse = response.json().await?;

        debug!(
            token_id = %transaction.token_id,
            risk_score = parsed.risk_score,
            "scorer responded"
        );

        Ok(RiskScore::new(parsed.risk_score)?)
    }
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    risk_score: i64,
}
