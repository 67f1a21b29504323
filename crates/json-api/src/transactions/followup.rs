//! Work that follows a challenge, outside every lifecycle lock.

use std::sync::Arc;

use tracing::{debug, error, warn};

use tokengate_app::domain::{
    events::records::EventUuid,
    lifecycle::data::{AnalyzeResult, VerificationWait},
    notifications::VerificationRequest,
    tokens::records::TokenId,
};

use crate::{observability::observe_lifecycle, state::State};

/// Ask the merchant to verify a challenged analysis and start its wait.
pub(crate) async fn follow_up_challenge(
    state: &State,
    result: &AnalyzeResult,
    token_id: TokenId,
    merchant_id: String,
) {
    state
        .app
        .notifications
        .request_verification(VerificationRequest {
            event_id: result.event_id,
            token_id,
            merchant_id,
            risk_level: result.risk_level,
        })
        .await;

    spawn_verification_wait(state, result.event_id);
}

/// Run the bounded verification wait for `event_id` in the background.
pub(crate) fn spawn_verification_wait(state: &State, event_id: EventUuid) {
    let lifecycle = Arc::clone(&state.app.lifecycle);
    let window = state.verification;

    tokio::spawn(async move {
        match lifecycle
            .await_verification(event_id, window.timeout, window.poll_interval)
            .await
        {
            Ok(VerificationWait::Resolved(status)) => {
                debug!(event_id = %event_id, status = %status, "verification wait resolved");
            }
            Ok(VerificationWait::TimedOut) => {
                observe_lifecycle("verification", "timed_out");

                warn!(event_id = %event_id, "verification timed out, token revoked");
            }
            Err(source) => {
                error!(event_id = %event_id, "verification wait failed: {source}");
            }
        }
    });
}
