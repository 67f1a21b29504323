//! Audit service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditServiceError {
    #[error("audit entry has an empty target")]
    MissingTarget,

    #[error("audit storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
