//! Token Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Externally issued payment token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TokenId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TokenId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Token lifecycle status. `Revoked` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    #[default]
    Active,
    Frozen,
    Revoked,
}

impl TokenStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
            Self::Revoked => "revoked",
        }
    }
}

impl Display for TokenStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Token Record
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub token_id: TokenId,
    pub status: TokenStatus,

    /// Set iff `status` is `Frozen`.
    pub frozen_at: Option<Timestamp>,

    /// Set iff `status` is `Revoked`.
    pub revoked_at: Option<Timestamp>,

    pub reason: Option<String>,
    pub auto_revoke_candidate: bool,
    pub created_at: Timestamp,
}

impl TokenRecord {
    pub(crate) fn frozen(
        token_id: TokenId,
        reason: String,
        auto_revoke_candidate: bool,
        now: Timestamp,
    ) -> Self {
        Self {
            token_id,
            status: TokenStatus::Frozen,
            frozen_at: Some(now),
            revoked_at: None,
            reason: Some(reason),
            auto_revoke_candidate,
            created_at: now,
        }
    }

    pub(crate) fn revoked(token_id: TokenId, reason: String, now: Timestamp) -> Self {
        Self {
            token_id,
            status: TokenStatus::Revoked,
            frozen_at: None,
            revoked_at: Some(now),
            reason: Some(reason),
            auto_revoke_candidate: false,
            created_at: now,
        }
    }

    /// Whether the timestamp fields agree with `status`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.frozen_at.is_some() == (self.status == TokenStatus::Frozen)
            && self.revoked_at.is_some() == (self.status == TokenStatus::Revoked)
    }
}
