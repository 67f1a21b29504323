//! Audit service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::audit::{
    data::NewAuditEntry, errors::AuditServiceError, records::AuditRecord,
    repository::InMemoryAuditRepository,
};

#[derive(Debug, Default)]
pub struct InMemoryAuditService {
    repository: Mutex<InMemoryAuditRepository>,
}

impl InMemoryAuditService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: Mutex::new(InMemoryAuditRepository::new()),
        }
    }
}

#[async_trait]
impl AuditService for InMemoryAuditService {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditRecord, AuditServiceError> {
        if entry.target.trim().is_empty() {
            return Err(AuditServiceError::MissingTarget);
        }

        let record = self.repository.lock().await.append(entry, Timestamp::now());

        info!(
            audit_id = %record.uuid,
            action = %record.action,
            actor = %record.actor,
            target = %record.target,
            reason = record.reason.as_deref().unwrap_or_default(),
            "audit.recorded"
        );

        Ok(record)
    }

    async fn list_for_target(
        &self,
        target: String,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, AuditServiceError> {
        Ok(self.repository.lock().await.list_for_target(&target, limit))
    }

    async fn count(&self) -> Result<usize, AuditServiceError> {
        Ok(self.repository.lock().await.len())
    }
}

#[automock]
#[async_trait]
/// Append-only audit trail.
pub trait AuditService: Send + Sync {
    /// Appends one immutable entry.
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditRecord, AuditServiceError>;

    /// Returns the most recent `limit` entries for `target`, oldest first.
    async fn list_for_target(
        &self,
        target: String,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, AuditServiceError>;

    /// Total number of entries.
    async fn count(&self) -> Result<usize, AuditServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::audit::records::{Actor, AuditAction};

    use super::*;

    #[tokio::test]
    async fn record_returns_stored_entry() -> TestResult {
        let audit = InMemoryAuditService::new();

        let record = audit
            .record(
                NewAuditEntry::new(AuditAction::RevokeToken, Actor::AiAgent, "tok_1")
                    .reason("fraud ring")
                    .details(json!({ "previous_status": "frozen" })),
            )
            .await?;

        assert_eq!(record.action, AuditAction::RevokeToken);
        assert_eq!(record.actor, Actor::AiAgent);
        assert_eq!(record.target, "tok_1");
        assert_eq!(record.reason.as_deref(), Some("fraud ring"));
        assert_eq!(record.details, Some(json!({ "previous_status": "frozen" })));

        Ok(())
    }

    #[tokio::test]
    async fn empty_target_is_rejected() {
        let audit = InMemoryAuditService::new();

        let result = audit
            .record(NewAuditEntry::new(
                AuditAction::FreezeToken,
                Actor::System,
                "  ",
            ))
            .await;

        assert!(
            matches!(result, Err(AuditServiceError::MissingTarget)),
            "expected MissingTarget, got {result:?}"
        );
    }

    #[tokio::test]
    async fn entries_for_a_target_are_strictly_ordered() -> TestResult {
        let audit = InMemoryAuditService::new();

        for action in [
            AuditAction::FreezeToken,
            AuditAction::UnfreezeToken,
            AuditAction::FreezeToken,
            AuditAction::RevokeToken,
        ] {
            audit
                .record(NewAuditEntry::new(action, Actor::System, "tok_1"))
                .await?;
        }

        let entries = audit.list_for_target("tok_1".to_owned(), 50).await?;

        assert_eq!(entries.len(), 4);
        assert!(
            entries
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.timestamp < b.timestamp)),
            "timestamps should be strictly increasing"
        );
        assert_eq!(audit.count().await?, 4);

        Ok(())
    }
}
