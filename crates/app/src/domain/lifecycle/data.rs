//! Lifecycle Data

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    events::records::{EventStatus, EventUuid},
    risk::models::{Decision, RiskScore, RiskTier},
    tokens::records::{TokenId, TokenRecord, TokenStatus},
};

/// A transaction submitted for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeTransaction {
    pub token_id: TokenId,
    pub merchant_id: String,
    pub amount: f64,
    pub risk_score: RiskScore,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeResult {
    pub event_id: EventUuid,
    pub decision: Decision,
    pub status: EventStatus,
    pub token_status: TokenStatus,
    pub risk_level: RiskTier,
    pub auto_revoke_candidate: bool,
    pub message: String,
}

/// Human-readable summary of an analysis outcome.
#[must_use]
pub const fn analyze_message(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "Transaction approved - low risk",
        RiskTier::Medium => "Transaction requires verification - medium risk, token frozen",
        RiskTier::High => {
            "Transaction requires verification - high risk, token frozen, auto-revoke candidate"
        }
    }
}

/// A merchant's verification response for a challenged event.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantResponse {
    pub event_id: EventUuid,
    pub user_response: String,
    pub verification_method: String,
    pub evidence: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub event_id: EventUuid,
    pub final_status: EventStatus,
    pub token_status: TokenStatus,
    pub verification_successful: bool,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("unknown triage decision `{0}`")]
pub struct UnknownTriageDecision(pub String);

/// An agent's override decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageDecision {
    Approve,
    Challenge,
    ChallengeHigh,
    Revoke,
}

impl TriageDecision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Challenge => "challenge",
            Self::ChallengeHigh => "challenge_high",
            Self::Revoke => "revoke",
        }
    }
}

impl FromStr for TriageDecision {
    type Err = UnknownTriageDecision;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "challenge" => Ok(Self::Challenge),
            "challenge_high" => Ok(Self::ChallengeHigh),
            "revoke" => Ok(Self::Revoke),
            _ => Err(UnknownTriageDecision(value.to_owned())),
        }
    }
}

impl Display for TriageDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriageRequest {
    pub event_id: EventUuid,
    pub decision: TriageDecision,
    pub reasoning: Option<String>,
}

/// What triage actually did to the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageAction {
    ApprovedUnfrozen,
    ApprovedNoAction,
    ChallengeFrozen,
    ChallengeAlreadyFrozen,
    HighRiskFrozen,
    Revoked,
}

impl TriageAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApprovedUnfrozen => "approved_unfrozen",
            Self::ApprovedNoAction => "approved_no_action",
            Self::ChallengeFrozen => "challenge_frozen",
            Self::ChallengeAlreadyFrozen => "challenge_already_frozen",
            Self::HighRiskFrozen => "high_risk_frozen",
            Self::Revoked => "revoked",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ApprovedUnfrozen => "Agent approved transaction - token unfrozen",
            Self::ApprovedNoAction => "Agent approved transaction - no token action needed",
            Self::ChallengeFrozen => "Agent requires additional verification - token frozen",
            Self::ChallengeAlreadyFrozen => {
                "Agent requires additional verification - token remains frozen"
            }
            Self::HighRiskFrozen => "Agent identified high risk - token frozen as revoke candidate",
            Self::Revoked => "Agent recommended revocation - token revoked",
        }
    }
}

impl Display for TriageAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageResult {
    pub event_id: EventUuid,
    pub action_taken: TriageAction,
    pub event_status: EventStatus,
    pub token_status: TokenStatus,
    pub message: String,
}

/// How a verification wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationWait {
    /// The event left `waiting_verification` on its own.
    Resolved(EventStatus),

    /// Nobody answered in time; the event failed and the token was revoked.
    TimedOut,
}

/// A token as seen by callers: either a stored record or the implicit
/// active default for an id the store has never seen.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenView {
    Known(TokenRecord),
    Unknown(TokenId),
}

impl TokenView {
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        match self {
            Self::Known(token) => token.status,
            Self::Unknown(_) => TokenStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LifecycleStats {
    pub tokens: usize,
    pub events: usize,
    pub audit_entries: usize,
}
