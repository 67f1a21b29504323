//! Transaction Handlers

pub(crate) mod analyze;
pub(crate) mod assess;
pub(crate) mod get;
pub(crate) mod merchant_response;
pub(crate) mod triage;

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokengate_app::domain::lifecycle::data::{AnalyzeResult, AnalyzeTransaction};

use crate::{
    observability::observe_lifecycle,
    state::State,
    transactions::{followup::follow_up_challenge, into_status_error},
};

/// Analysis Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AnalyzeResponse {
    pub event_id: Uuid,
    /// `approve`, `challenge` or `challenge_high`
    pub decision: String,
    pub status: String,
    pub token_status: String,
    /// `LOW`, `MEDIUM` or `HIGH`
    pub risk_level: String,
    pub auto_revoke_candidate: bool,
    pub message: String,
}

impl From<AnalyzeResult> for AnalyzeResponse {
    fn from(result: AnalyzeResult) -> Self {
        Self {
            event_id: result.event_id.into_uuid(),
            decision: result.decision.as_str().to_owned(),
            status: result.status.as_str().to_owned(),
            token_status: result.token_status.as_str().to_owned(),
            risk_level: result.risk_level.as_str().to_owned(),
            auto_revoke_candidate: result.auto_revoke_candidate,
            message: result.message,
        }
    }
}

/// Reject blank identifiers and non-positive amounts.
pub(crate) fn validate_transaction(
    token_id: &str,
    merchant_id: &str,
    amount: f64,
) -> Result<(), StatusError> {
    if token_id.trim().is_empty() {
        return Err(StatusError::unprocessable_entity().brief("token_id must not be empty"));
    }

    if merchant_id.trim().is_empty() {
        return Err(StatusError::unprocessable_entity().brief("merchant_id must not be empty"));
    }

    if !amount.is_finite() || amount <= 0.0 {
        return Err(StatusError::unprocessable_entity().brief("amount must be greater than 0"));
    }

    Ok(())
}

/// Run an analysis and, when it was challenged, notify the merchant and
/// start the verification wait.
pub(crate) async fn analyze_transaction(
    state: &State,
    transaction: AnalyzeTransaction,
) -> Result<AnalyzeResult, StatusError> {
    let token_id = transaction.token_id.clone();
    let merchant_id = transaction.merchant_id.clone();

    let result = state
        .app
        .lifecycle
        .analyze(transaction)
        .await
        .map_err(|error| into_status_error(error, "analyze", token_id.as_str()))?;

    observe_lifecycle("analyze", result.decision.as_str());

    if result.status.is_waiting() {
        follow_up_challenge(state, &result, token_id, merchant_id).await;
    }

    Ok(result)
}
