//! Test Helpers

use crate::{
    domain::{
        audit::{AuditService, AuditServiceError, records::AuditAction},
        events::records::EventUuid,
        lifecycle::data::{AnalyzeTransaction, MerchantResponse, TriageDecision, TriageRequest},
        risk::{RiskError, models::RiskScore},
        tokens::records::TokenId,
    },
    test::TestContext,
};

pub(crate) fn transaction(token: &str, score: i64) -> Result<AnalyzeTransaction, RiskError> {
    Ok(AnalyzeTransaction {
        token_id: TokenId::new(token),
        merchant_id: "merchant_1".to_string(),
        amount: 125.0,
        risk_score: RiskScore::new(score)?,
        metadata: None,
    })
}

pub(crate) fn merchant_response(event_id: EventUuid, user_response: &str) -> MerchantResponse {
    MerchantResponse {
        event_id,
        user_response: user_response.to_string(),
        verification_method: "sms".to_string(),
        evidence: None,
    }
}

pub(crate) fn triage_request(event_id: EventUuid, decision: TriageDecision) -> TriageRequest {
    TriageRequest {
        event_id,
        decision,
        reasoning: None,
    }
}

/// Audit actions recorded against `target`, oldest first.
pub(crate) async fn audit_actions(
    ctx: &TestContext,
    target: &str,
) -> Result<Vec<AuditAction>, AuditServiceError> {
    Ok(ctx
        .audit
        .list_for_target(target.to_string(), usize::MAX)
        .await?
        .into_iter()
        .map(|entry| entry.action)
        .collect())
}
