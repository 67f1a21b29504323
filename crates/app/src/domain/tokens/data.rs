//! Token Transition Data

use crate::domain::{audit::records::Actor, tokens::records::TokenStatus};

/// Freeze Request Data
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeToken {
    pub reason: String,
    pub actor: Actor,
    pub auto_revoke_candidate: bool,
}

/// Unfreeze Request Data
#[derive(Debug, Clone, PartialEq)]
pub struct UnfreezeToken {
    pub actor: Actor,
    pub reason: String,
}

/// Revoke Request Data
#[derive(Debug, Clone, PartialEq)]
pub struct RevokeToken {
    pub actor: Actor,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeOutcome {
    Frozen,
    AlreadyFrozen,
}

impl FreezeOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frozen => "frozen",
            Self::AlreadyFrozen => "already_frozen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfreezeOutcome {
    Unfrozen,
    AlreadyActive,
}

impl UnfreezeOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unfrozen => "unfrozen",
            Self::AlreadyActive => "already_active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// `previous_status` is `None` when the token was created revoked.
    Revoked { previous_status: Option<TokenStatus> },
    AlreadyRevoked,
}

impl RevokeOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revoked { .. } => "revoked",
            Self::AlreadyRevoked => "already_revoked",
        }
    }
}
