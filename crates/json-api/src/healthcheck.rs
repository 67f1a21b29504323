//! Token Gate JSON API Health Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use tokengate_app::domain::lifecycle::data::LifecycleStats;

use crate::{extensions::*, state::State, transactions::into_status_error};

/// Record counts across the in-memory stores
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StorageStats {
    pub tokens: usize,
    pub events: usize,
    pub audit_entries: usize,
}

impl From<LifecycleStats> for StorageStats {
    fn from(stats: LifecycleStats) -> Self {
        Self {
            tokens: stats.tokens,
            events: stats.events,
            audit_entries: stats.audit_entries,
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Service status
    pub status: String,
    pub timestamp: String,
    pub storage_stats: StorageStats,
}

/// Health handler
///
/// Reports liveness along with how many tokens, events and audit entries
/// are held.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .lifecycle
        .stats()
        .await
        .map_err(|error| into_status_error(error, "health", "stats"))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_owned(),
        timestamp: Timestamp::now().to_string(),
        storage_stats: stats.into(),
    }))
}
