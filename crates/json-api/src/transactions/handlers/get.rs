//! Get Event Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tokengate_app::domain::events::records::EventRecord;

use crate::{extensions::*, state::State, transactions::into_status_error};

/// Event Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EventResponse {
    pub event_id: Uuid,
    pub token_id: String,
    pub merchant_id: String,
    pub amount: f64,
    pub risk_score: u8,
    pub risk_level: String,
    pub status: String,
    pub decision: String,
    pub auto_revoke_candidate: bool,
    pub verified_by: Option<String>,
    pub verification_evidence: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EventRecord> for EventResponse {
    fn from(event: EventRecord) -> Self {
        Self {
            event_id: event.uuid.into_uuid(),
            risk_level: event.tier().as_str().to_owned(),
            token_id: event.token_id.as_str().to_owned(),
            merchant_id: event.merchant_id,
            amount: event.amount,
            risk_score: event.risk_score.value(),
            status: event.status.as_str().to_owned(),
            decision: event.decision.as_str().to_owned(),
            auto_revoke_candidate: event.auto_revoke_candidate,
            verified_by: event.verified_by,
            verification_evidence: event.verification_evidence,
            created_at: event.created_at.to_string(),
            updated_at: event.updated_at.to_string(),
        }
    }
}

/// Get Event Handler
#[endpoint(
    tags("transactions"),
    summary = "Get Event",
    responses(
        (status_code = StatusCode::OK, description = "Event found"),
        (status_code = StatusCode::NOT_FOUND, description = "Event not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid event id"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    event_id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<EventResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let event_id = event_id.into_inner();

    let event = state
        .app
        .lifecycle
        .event(event_id.into())
        .await
        .map_err(|error| into_status_error(error, "get_event", &event_id.to_string()))?;

    Ok(Json(event.into()))
}
