//! Lifecycle errors.

use thiserror::Error;

use crate::domain::{
    audit::AuditServiceError, events::EventsServiceError, tokens::TokensServiceError,
};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("event not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("token is revoked")]
    TokenRevoked,

    #[error("token store failure")]
    Tokens(#[source] TokensServiceError),

    #[error("event store failure")]
    Events(#[source] EventsServiceError),

    #[error("audit log failure")]
    Audit(#[from] AuditServiceError),
}

impl LifecycleError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound => "event_not_found",
            Self::Conflict(_) => "conflict",
            Self::TokenRevoked => "token_revoked",
            Self::Tokens(_) | Self::Events(_) | Self::Audit(_) => "internal_error",
        }
    }

    /// A token or event store failed underneath the workflow.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Tokens(_) | Self::Events(_))
    }
}

impl From<EventsServiceError> for LifecycleError {
    fn from(error: EventsServiceError) -> Self {
        match error {
            EventsServiceError::NotFound => Self::NotFound,
            EventsServiceError::InvalidAmount => Self::Validation(error.to_string()),
        }
    }
}

impl From<TokensServiceError> for LifecycleError {
    fn from(error: TokensServiceError) -> Self {
        match error {
            TokensServiceError::CannotFreezeRevoked | TokensServiceError::CannotUnfreezeRevoked => {
                Self::Conflict(error.code().to_owned())
            }
            other => Self::Tokens(other),
        }
    }
}
