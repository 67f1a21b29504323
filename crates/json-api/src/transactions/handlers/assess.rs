//! Assess Transaction Handler
//!
//! Scores the transaction with the configured remote scorer before running
//! the same analysis as `/analyze`.

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use tokengate_app::domain::{
    lifecycle::data::AnalyzeTransaction, scoring::data::TransactionContext,
    tokens::records::TokenId,
};

use crate::{
    extensions::*,
    state::State,
    transactions::handlers::{AnalyzeResponse, analyze_transaction, validate_transaction},
};

/// Assess Transaction Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssessRequest {
    pub token_id: String,
    pub merchant_id: String,
    pub amount: f64,
    /// Signals forwarded to the scorer
    #[serde(default)]
    pub context: Option<Value>,
}

/// Assessment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssessResponse {
    /// Score returned by the remote scorer
    pub risk_score: u8,
    pub analysis: AnalyzeResponse,
}

/// Assess Transaction Handler
#[endpoint(
    tags("transactions"),
    summary = "Score And Analyze Transaction",
    responses(
        (status_code = StatusCode::OK, description = "Transaction scored and analyzed"),
        (status_code = StatusCode::FORBIDDEN, description = "Token is revoked"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid transaction"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Risk scorer failed"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "No risk scorer configured"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AssessRequest>,
    depot: &mut Depot,
) -> Result<Json<AssessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    validate_transaction(&request.token_id, &request.merchant_id, request.amount)?;

    let Some(scorer) = state.app.scorer.as_ref() else {
        return Err(StatusError::service_unavailable().brief("Risk scorer is not configured"));
    };

    let context = TransactionContext {
        token_id: TokenId::new(request.token_id),
        merchant_id: request.merchant_id,
        amount: request.amount,
        context: request.context,
    };

    let risk_score = scorer.score(&context).await.map_err(|source| {
        error!(token_id = %context.token_id, "risk scorer failed: {source}");

        StatusError::bad_gateway().brief("Risk scorer failed")
    })?;

    let result = analyze_transaction(
        state,
        AnalyzeTransaction {
            token_id: context.token_id,
            merchant_id: context.merchant_id,
            amount: context.amount,
            risk_score,
            metadata: context.context,
        },
    )
    .await?;

    Ok(Json(AssessResponse {
        risk_score: risk_score.value(),
        analysis: result.into(),
    }))
}
