//! Audit Trail Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tokengate_app::domain::audit::records::AuditRecord;

use crate::{extensions::*, state::State, transactions::into_status_error};

const DEFAULT_LIMIT: usize = 50;

/// Audit Entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuditEntryResponse {
    pub audit_id: Uuid,
    pub action: String,
    pub actor: String,
    pub target: String,
    pub reason: Option<String>,
    pub timestamp: String,
    pub details: Option<Value>,
}

impl From<AuditRecord> for AuditEntryResponse {
    fn from(record: AuditRecord) -> Self {
        Self {
            audit_id: record.uuid.into_uuid(),
            action: record.action.as_str().to_owned(),
            actor: record.actor.as_str().to_owned(),
            target: record.target,
            reason: record.reason,
            timestamp: record.timestamp.to_string(),
            details: record.details,
        }
    }
}

/// Audit Trail Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuditTrailResponse {
    pub target: String,
    /// Oldest first
    pub entries: Vec<AuditEntryResponse>,
    pub total_entries: usize,
}

/// Audit Trail Handler
#[endpoint(
    tags("audit"),
    summary = "Get Audit Trail",
    responses(
        (status_code = StatusCode::OK, description = "Audit entries for the target"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    target: PathParam<String>,
    limit: QueryParam<usize, false>,
    depot: &mut Depot,
) -> Result<Json<AuditTrailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let target = target.into_inner();
    let limit = limit.into_inner().unwrap_or(DEFAULT_LIMIT);

    let entries: Vec<AuditEntryResponse> = state
        .app
        .lifecycle
        .audit_trail(target.clone(), limit)
        .await
        .map_err(|error| into_status_error(error, "audit_trail", &target))?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(AuditTrailResponse {
        total_entries: entries.len(),
        target,
        entries,
    }))
}
