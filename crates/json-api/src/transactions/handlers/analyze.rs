//! Analyze Transaction Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tokengate_app::domain::{
    lifecycle::data::AnalyzeTransaction, risk::models::RiskScore, tokens::records::TokenId,
};

use crate::{
    extensions::*,
    state::State,
    transactions::handlers::{AnalyzeResponse, analyze_transaction, validate_transaction},
};

/// Analyze Transaction Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AnalyzeRequest {
    pub token_id: String,
    pub merchant_id: String,
    pub amount: f64,
    /// Integer score from 0 to 100
    pub risk_score: i64,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl AnalyzeRequest {
    fn into_transaction(self) -> Result<AnalyzeTransaction, StatusError> {
        validate_transaction(&self.token_id, &self.merchant_id, self.amount)?;

        let risk_score =
            RiskScore::new(self.risk_score).or_422("risk_score must be between 0 and 100")?;

        Ok(AnalyzeTransaction {
            token_id: TokenId::new(self.token_id),
            merchant_id: self.merchant_id,
            amount: self.amount,
            risk_score,
            metadata: self.metadata,
        })
    }
}

/// Analyze Transaction Handler
#[endpoint(
    tags("transactions"),
    summary = "Analyze Transaction",
    responses(
        (status_code = StatusCode::OK, description = "Transaction analyzed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed request body"),
        (status_code = StatusCode::FORBIDDEN, description = "Token is revoked"),
        (status_code = StatusCode::CONFLICT, description = "Token could not be frozen"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid transaction"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AnalyzeRequest>,
    depot: &mut Depot,
) -> Result<Json<AnalyzeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let transaction = json.into_inner().into_transaction()?;

    let result = analyze_transaction(state, transaction).await?;

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use tokengate_app::domain::{
        events::records::{EventStatus, EventUuid},
        lifecycle::{
            LifecycleError, MockLifecycleService,
            data::{AnalyzeResult, VerificationWait, analyze_message},
        },
        notifications::MockNotificationSink,
        risk::models::{Decision, RiskTier},
        tokens::records::TokenStatus,
    };

    use crate::test_helpers::{lifecycle_service, service_with, state_with};

    use super::*;

    fn make_service(lifecycle: MockLifecycleService) -> Service {
        lifecycle_service(lifecycle, Router::with_path("analyze").post(handler))
    }

    fn approved(event_id: EventUuid) -> AnalyzeResult {
        AnalyzeResult {
            event_id,
            decision: Decision::Approve,
            status: EventStatus::Approved,
            token_status: TokenStatus::Active,
            risk_level: RiskTier::Low,
            auto_revoke_candidate: false,
            message: analyze_message(RiskTier::Low).to_owned(),
        }
    }

    #[tokio::test]
    async fn test_low_risk_transaction_is_approved() -> TestResult {
        let event_id = EventUuid::new();

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_analyze()
            .once()
            .withf(|request| {
                request.token_id.as_str() == "tok_1"
                    && request.merchant_id == "m_1"
                    && request.risk_score.value() == 20
            })
            .return_once(move |_| Ok(approved(event_id)));

        lifecycle.expect_await_verification().never();

        let mut res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 25.5,
                "risk_score": 20,
            }))
            .send(&make_service(lifecycle))
            .await;

        let body: AnalyzeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.event_id, event_id.into_uuid());
        assert_eq!(body.decision, "approve");
        assert_eq!(body.status, "approved");
        assert_eq!(body.token_status, "active");
        assert_eq!(body.risk_level, "LOW");
        assert!(!body.auto_revoke_candidate, "low risk is never a revoke candidate");

        Ok(())
    }

    #[tokio::test]
    async fn test_challenged_transaction_notifies_the_merchant() -> TestResult {
        let event_id = EventUuid::new();

        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_analyze().once().return_once(move |_| {
            Ok(AnalyzeResult {
                event_id,
                decision: Decision::ChallengeHigh,
                status: EventStatus::WaitingVerification,
                token_status: TokenStatus::Frozen,
                risk_level: RiskTier::High,
                auto_revoke_candidate: true,
                message: analyze_message(RiskTier::High).to_owned(),
            })
        });

        lifecycle
            .expect_await_verification()
            .returning(|_, _, _| Ok(VerificationWait::TimedOut));

        let mut notifications = MockNotificationSink::new();

        notifications
            .expect_request_verification()
            .once()
            .withf(move |request| {
                request.event_id == event_id
                    && request.merchant_id == "m_1"
                    && request.risk_level == RiskTier::High
            })
            .return_once(|_| ());

        let service = service_with(
            state_with(lifecycle, notifications, None),
            Router::with_path("analyze").post(handler),
        );

        let mut res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 900.0,
                "risk_score": 90,
            }))
            .send(&service)
            .await;

        let body: AnalyzeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.decision, "challenge_high");
        assert_eq!(body.status, "waiting_verification");
        assert_eq!(body.risk_level, "HIGH");
        assert_eq!(body.token_status, "frozen");
        assert!(body.auto_revoke_candidate, "high risk is a revoke candidate");

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_score_returns_422() {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_analyze().never();

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 10.0,
                "risk_score": 101,
            }))
            .send(&make_service(lifecycle))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_non_positive_amount_returns_422() {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_analyze().never();

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 0,
                "risk_score": 10,
            }))
            .send(&make_service(lifecycle))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_analyze().never();

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({ "token_id": "tok_1" }))
            .send(&make_service(lifecycle))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_revoked_token_returns_403() {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_analyze()
            .once()
            .return_once(|_| Err(LifecycleError::TokenRevoked));

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 10.0,
                "risk_score": 10,
            }))
            .send(&make_service(lifecycle))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_refused_freeze_returns_409() {
        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_analyze().once().return_once(|_| {
            Err(LifecycleError::Conflict(
                "cannot_freeze_revoked_token".into(),
            ))
        });

        lifecycle.expect_await_verification().never();

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_1",
                "merchant_id": "m_1",
                "amount": 60.0,
                "risk_score": 65,
            }))
            .send(&make_service(lifecycle))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
