//! Token service errors.

use thiserror::Error;

use crate::domain::audit::AuditServiceError;

#[derive(Debug, Error)]
pub enum TokensServiceError {
    #[error("token not found")]
    NotFound,

    #[error("cannot freeze a revoked token")]
    CannotFreezeRevoked,

    #[error("cannot unfreeze a revoked token")]
    CannotUnfreezeRevoked,

    #[error("failed to write audit entry")]
    Audit(#[from] AuditServiceError),
}

impl TokensServiceError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "token_not_found",
            Self::CannotFreezeRevoked => "cannot_freeze_revoked_token",
            Self::CannotUnfreezeRevoked => "cannot_unfreeze_revoked_token",
            Self::Audit(_) => "audit_write_failed",
        }
    }
}
