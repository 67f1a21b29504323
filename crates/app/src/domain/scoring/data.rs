//! Scoring Data

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::domain::tokens::records::TokenId;

/// What the scorer sees about a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionContext {
    pub token_id: TokenId,
    pub merchant_id: String,
    pub amount: f64,

    /// Free-form signals forwarded to the scorer untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Configuration for reaching a remote scorer.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Endpoint receiving `POST` requests, e.g. `"http://localhost:9000/score"`.
    pub url: String,

    pub timeout: Duration,
}
