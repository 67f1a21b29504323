//! Audit Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::uuids::TypedUuid;

/// Audit Entry UUID
pub type AuditUuid = TypedUuid<AuditRecord>;

/// What a recorded operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    FreezeToken,
    UnfreezeToken,
    RevokeToken,
    AnalyzeEvent,
    VerifyEvent,
    TriageEvent,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FreezeToken => "freeze_token",
            Self::UnfreezeToken => "unfreeze_token",
            Self::RevokeToken => "revoke_token",
            Self::AnalyzeEvent => "analyze_event",
            Self::VerifyEvent => "verify_event",
            Self::TriageEvent => "triage_event",
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Who performed a recorded operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Actor {
    System,
    AiAgent,
    MerchantUser,
    VerificationSystem,
    Caller(String),
}

impl Actor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::AiAgent => "ai_agent",
            Self::MerchantUser => "merchant_user",
            Self::VerificationSystem => "verification_system",
            Self::Caller(id) => id,
        }
    }
}

impl From<String> for Actor {
    fn from(value: String) -> Self {
        match value.as_str() {
            "system" => Self::System,
            "ai_agent" => Self::AiAgent,
            "merchant_user" => Self::MerchantUser,
            "verification_system" => Self::VerificationSystem,
            _ => Self::Caller(value),
        }
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Caller(id) => id,
            other => other.as_str().to_owned(),
        }
    }
}

impl Display for Actor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Audit Record
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub uuid: AuditUuid,

    /// Position in the global append order.
    pub sequence: u64,

    pub action: AuditAction,
    pub actor: Actor,

    /// Token id or event id the entry refers to.
    pub target: String,

    pub reason: Option<String>,
    pub timestamp: Timestamp,
    pub details: Option<Value>,
}
