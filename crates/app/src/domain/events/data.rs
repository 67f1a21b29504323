//! Event Data

use crate::domain::{risk::models::RiskScore, tokens::records::TokenId};

/// New Event Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub token_id: TokenId,
    pub merchant_id: String,
    pub amount: f64,
    pub risk_score: RiskScore,
}
