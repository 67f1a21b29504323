//! Token Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tokengate_app::domain::{lifecycle::data::TokenView, tokens::records::TokenId};

use crate::{extensions::*, state::State, transactions::into_status_error};

/// Token Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenStatusResponse {
    pub token_id: String,
    /// `active`, `frozen` or `revoked`
    pub status: String,
    /// Set only for tokens the service has never seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: Option<String>,
    pub frozen_at: Option<String>,
    pub revoked_at: Option<String>,
    pub reason: Option<String>,
    pub auto_revoke_candidate: bool,
}

impl From<TokenView> for TokenStatusResponse {
    fn from(view: TokenView) -> Self {
        let status = view.status().as_str().to_owned();

        match view {
            TokenView::Known(token) => Self {
                token_id: token.token_id.as_str().to_owned(),
                status,
                message: None,
                created_at: Some(token.created_at.to_string()),
                frozen_at: token.frozen_at.map(|at| at.to_string()),
                revoked_at: token.revoked_at.map(|at| at.to_string()),
                reason: token.reason,
                auto_revoke_candidate: token.auto_revoke_candidate,
            },
            TokenView::Unknown(token_id) => Self {
                status,
                token_id: token_id.as_str().to_owned(),
                message: Some("Token not found in system - default status".to_owned()),
                created_at: None,
                frozen_at: None,
                revoked_at: None,
                reason: None,
                auto_revoke_candidate: false,
            },
        }
    }
}

/// Token Status Handler
#[endpoint(
    tags("tokens"),
    summary = "Get Token Status",
    responses(
        (status_code = StatusCode::OK, description = "Token status"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    token_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<TokenStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let token_id = TokenId::new(token_id.into_inner());

    let view = state
        .app
        .lifecycle
        .token(token_id.clone())
        .await
        .map_err(|error| into_status_error(error, "token_status", token_id.as_str()))?;

    Ok(Json(view.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tokengate_app::domain::{
        lifecycle::MockLifecycleService,
        tokens::records::{TokenRecord, TokenStatus},
    };

    use crate::test_helpers::lifecycle_service;

    use super::*;

    fn make_service(lifecycle: MockLifecycleService) -> Service {
        lifecycle_service(
            lifecycle,
            Router::with_path("token/{token_id}/status").get(handler),
        )
    }

    #[tokio::test]
    async fn test_frozen_token_status() -> TestResult {
        let token = TokenRecord {
            token_id: TokenId::new("tok_1"),
            status: TokenStatus::Frozen,
            frozen_at: Some(Timestamp::UNIX_EPOCH),
            revoked_at: None,
            reason: Some("Risk level high detected".to_owned()),
            auto_revoke_candidate: true,
            created_at: Timestamp::UNIX_EPOCH,
        };

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_token()
            .once()
            .withf(|token_id| token_id.as_str() == "tok_1")
            .return_once(move |_| Ok(TokenView::Known(token)));

        let mut res = TestClient::get("http://example.com/token/tok_1/status")
            .send(&make_service(lifecycle))
            .await;

        let body: TokenStatusResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "frozen");
        assert_eq!(body.reason.as_deref(), Some("Risk level high detected"));
        assert_eq!(body.frozen_at.as_deref(), Some("1970-01-01T00:00:00Z"));
        assert!(body.auto_revoke_candidate, "high risk freeze marks the token");
        assert!(body.message.is_none(), "known tokens carry no default message");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_is_reported_active() -> TestResult {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_token()
            .once()
            .return_once(|token_id| Ok(TokenView::Unknown(token_id)));

        let mut res = TestClient::get("http://example.com/token/tok_new/status")
            .send(&make_service(lifecycle))
            .await;

        let body: TokenStatusResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.token_id, "tok_new");
        assert_eq!(body.status, "active");
        assert!(body.message.is_some(), "unknown tokens explain the default");

        Ok(())
    }
}
