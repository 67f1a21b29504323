//! App Router

use salvo::Router;

use crate::{audit, healthcheck, tokens, transactions};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("analyze").post(transactions::analyze::handler))
        .push(Router::with_path("assess").post(transactions::assess::handler))
        .push(Router::with_path("merchant-response").post(transactions::merchant_response::handler))
        .push(Router::with_path("triage").post(transactions::triage::handler))
        .push(Router::with_path("event/{event_id}").get(transactions::get::handler))
        .push(Router::with_path("token/{token_id}/status").get(tokens::status::handler))
        .push(Router::with_path("audit/{target}").get(audit::index::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use tokengate_app::context::AppContext;

    use crate::{state::State, test_helpers::TEST_WINDOW};

    use super::*;

    fn make_service() -> Service {
        let state = State::from_app_context(AppContext::in_memory(None), TEST_WINDOW);

        Service::new(Router::new().hoop(inject(state)).push(app_router()))
    }

    async fn audit_actions(service: &Service, target: &str) -> TestResult<Vec<String>> {
        let trail: Value = TestClient::get(format!("http://example.com/audit/{target}"))
            .send(service)
            .await
            .take_json()
            .await?;

        Ok(trail["entries"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry["action"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default())
    }

    #[tokio::test]
    async fn challenged_transaction_is_settled_by_the_merchant() -> TestResult {
        let service = make_service();

        let analysis: Value = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_flow",
                "merchant_id": "m_1",
                "amount": 250.0,
                "risk_score": 60,
            }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(analysis["status"], "waiting_verification");
        assert_eq!(analysis["token_status"], "frozen");

        let event_id = analysis["event_id"].clone();

        let verification: Value = TestClient::post("http://example.com/merchant-response")
            .json(&json!({
                "event_id": event_id.clone(),
                "user_response": "Yes, I authorized it",
                "verification_method": "sms",
            }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(verification["final_status"], "verified_success");
        assert_eq!(verification["token_status"], "active");

        let token: Value = TestClient::get("http://example.com/token/tok_flow/status")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(token["status"], "active");

        let token_trail = audit_actions(&service, "tok_flow").await?;

        assert_eq!(token_trail, vec!["freeze_token", "unfreeze_token"]);

        let event_trail = audit_actions(&service, event_id.as_str().unwrap_or_default()).await?;

        assert_eq!(event_trail, vec!["analyze_event", "verify_event"]);

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_refused_at_the_edge() -> TestResult {
        let service = make_service();

        let analysis: Value = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_bad",
                "merchant_id": "m_1",
                "amount": 999.0,
                "risk_score": 95,
            }))
            .send(&service)
            .await
            .take_json()
            .await?;

        let res = TestClient::post("http://example.com/triage")
            .json(&json!({
                "event_id": analysis["event_id"].clone(),
                "agent_decision": "revoke",
                "reasoning": "card testing pattern",
            }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let res = TestClient::post("http://example.com/analyze")
            .json(&json!({
                "token_id": "tok_bad",
                "merchant_id": "m_2",
                "amount": 5.0,
                "risk_score": 5,
            }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        let health: Value = TestClient::get("http://example.com/health")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(health["status"], "healthy");
        assert_eq!(health["storage_stats"]["events"], 1);
        assert_eq!(health["storage_stats"]["tokens"], 1);

        Ok(())
    }
}
