//! Scoring errors.

use thiserror::Error;

use crate::domain::risk::RiskError;

/// Errors that can occur when asking a scorer for a risk score.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The scorer returned a non-2xx response.
    #[error("unexpected response from risk scorer: {0}")]
    UnexpectedResponse(String),

    /// The scorer returned a score outside `0..=100`.
    #[error("risk scorer returned an invalid score")]
    InvalidScore(#[from] RiskError),
}
