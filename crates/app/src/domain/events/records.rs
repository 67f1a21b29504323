//! Event Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{
        risk::{
            classify,
            models::{Decision, RiskScore, RiskTier},
        },
        tokens::records::TokenId,
    },
    uuids::TypedUuid,
};

/// Event UUID
pub type EventUuid = TypedUuid<EventRecord>;

/// Event verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Approved,
    WaitingVerification,
    VerifiedSuccess,
    VerifiedFailure,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::WaitingVerification => "waiting_verification",
            Self::VerifiedSuccess => "verified_success",
            Self::VerifiedFailure => "verified_failure",
        }
    }

    #[must_use]
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::WaitingVerification)
    }

    /// Verification has produced an outcome; nothing may change it.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::VerifiedSuccess | Self::VerifiedFailure)
    }

    #[must_use]
    pub const fn from_verification(verified: bool) -> Self {
        if verified {
            Self::VerifiedSuccess
        } else {
            Self::VerifiedFailure
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Event Record
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub uuid: EventUuid,

    /// Owning token.
    pub token_id: TokenId,

    pub merchant_id: String,
    pub amount: f64,
    pub risk_score: RiskScore,
    pub status: EventStatus,
    pub decision: Decision,
    pub auto_revoke_candidate: bool,
    pub verified_by: Option<String>,
    pub verification_evidence: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EventRecord {
    #[must_use]
    pub fn tier(&self) -> RiskTier {
        classify(self.risk_score)
    }
}
