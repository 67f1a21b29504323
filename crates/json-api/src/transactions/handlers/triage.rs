//! Agent Triage Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokengate_app::domain::lifecycle::data::{TriageDecision, TriageRequest, TriageResult};

use crate::{
    extensions::*,
    observability::observe_lifecycle,
    state::State,
    transactions::{followup::spawn_verification_wait, into_status_error},
};

/// Triage Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TriageRequestBody {
    pub event_id: Uuid,
    /// One of `approve`, `challenge`, `challenge_high` or `revoke`
    pub agent_decision: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl TriageRequestBody {
    fn into_request(self) -> Result<TriageRequest, StatusError> {
        let decision = self
            .agent_decision
            .parse::<TriageDecision>()
            .or_422("agent_decision must be one of approve, challenge, challenge_high, revoke")?;

        Ok(TriageRequest {
            event_id: self.event_id.into(),
            decision,
            reasoning: self.reasoning,
        })
    }
}

/// Triage Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TriageResponse {
    pub event_id: Uuid,
    pub action_taken: String,
    pub event_status: String,
    pub token_status: String,
    pub message: String,
}

impl From<TriageResult> for TriageResponse {
    fn from(result: TriageResult) -> Self {
        Self {
            event_id: result.event_id.into_uuid(),
            action_taken: result.action_taken.as_str().to_owned(),
            event_status: result.event_status.as_str().to_owned(),
            token_status: result.token_status.as_str().to_owned(),
            message: result.message,
        }
    }
}

/// Agent Triage Handler
#[endpoint(
    tags("transactions"),
    summary = "Apply Agent Triage Decision",
    responses(
        (status_code = StatusCode::OK, description = "Decision applied"),
        (status_code = StatusCode::FORBIDDEN, description = "Token is revoked"),
        (status_code = StatusCode::NOT_FOUND, description = "Event not found"),
        (status_code = StatusCode::CONFLICT, description = "Event already verified"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Unknown decision"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TriageRequestBody>,
    depot: &mut Depot,
) -> Result<Json<TriageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner().into_request()?;
    let event_id = request.event_id;

    let result = state
        .app
        .lifecycle
        .triage(request)
        .await
        .map_err(|error| into_status_error(error, "triage", &event_id.to_string()))?;

    observe_lifecycle("triage", result.action_taken.as_str());

    // A challenge reopens verification; the merchant was already asked.
    if result.event_status.is_waiting() {
        spawn_verification_wait(state, event_id);
    }

    Ok(Json(result.into()))
}
