//! Merchant Response Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tokengate_app::domain::lifecycle::data::{MerchantResponse, VerificationResult};

use crate::{
    extensions::*, observability::observe_lifecycle, state::State,
    transactions::into_status_error,
};

/// Merchant Response Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MerchantResponseRequest {
    pub event_id: Uuid,
    /// Free-text answer given by the cardholder
    pub user_response: String,
    /// How the cardholder was reached, e.g. `sms`
    pub verification_method: String,
    #[serde(default)]
    pub evidence: Option<Value>,
}

impl MerchantResponseRequest {
    fn into_response(self) -> Result<MerchantResponse, StatusError> {
        if self.verification_method.trim().is_empty() {
            return Err(
                StatusError::unprocessable_entity().brief("verification_method must not be empty")
            );
        }

        Ok(MerchantResponse {
            event_id: self.event_id.into(),
            user_response: self.user_response,
            verification_method: self.verification_method,
            evidence: self.evidence,
        })
    }
}

/// Verification Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerificationResponse {
    pub event_id: Uuid,
    pub final_status: String,
    pub token_status: String,
    pub verification_successful: bool,
    pub message: String,
}

impl From<VerificationResult> for VerificationResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            event_id: result.event_id.into_uuid(),
            final_status: result.final_status.as_str().to_owned(),
            token_status: result.token_status.as_str().to_owned(),
            verification_successful: result.verification_successful,
            message: result.message,
        }
    }
}

/// Merchant Response Handler
#[endpoint(
    tags("transactions"),
    summary = "Submit Merchant Verification",
    responses(
        (status_code = StatusCode::OK, description = "Verification processed"),
        (status_code = StatusCode::NOT_FOUND, description = "Event not found"),
        (status_code = StatusCode::CONFLICT, description = "Event is not waiting for verification"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid response"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<MerchantResponseRequest>,
    depot: &mut Depot,
) -> Result<Json<VerificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let response = json.into_inner().into_response()?;
    let event_id = response.event_id.to_string();

    let result = state
        .app
        .lifecycle
        .handle_merchant_response(response)
        .await
        .map_err(|error| into_status_error(error, "merchant_response", &event_id))?;

    observe_lifecycle(
        "merchant_response",
        if result.verification_successful { "verified" } else { "failed" },
    );

    Ok(Json(result.into()))
}
