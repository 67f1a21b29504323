//! Tokens service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde_json::json;
use tracing::debug;

use crate::{
    domain::{
        audit::{AuditService, data::NewAuditEntry, records::AuditAction},
        tokens::{
            data::{
                FreezeOutcome, FreezeToken, RevokeOutcome, RevokeToken, UnfreezeOutcome,
                UnfreezeToken,
            },
            errors::TokensServiceError,
            records::{TokenId, TokenRecord, TokenStatus},
            repository::InMemoryTokensRepository,
        },
    },
    locks::KeyedLocks,
};

/// In-memory token store.
///
/// Each transition holds the token's lock across the read, the audit append
/// and the write, so a transition and its audit entry are never interleaved
/// with another transition on the same token.
pub struct InMemoryTokensService {
    repository: InMemoryTokensRepository,
    audit: Arc<dyn AuditService>,
    locks: KeyedLocks,
}

impl InMemoryTokensService {
    #[must_use]
    pub fn new(audit: Arc<dyn AuditService>) -> Self {
        Self {
            repository: InMemoryTokensRepository::new(),
            audit,
            locks: KeyedLocks::new(),
        }
    }
}

impl std::fmt::Debug for InMemoryTokensService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTokensService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokensService for InMemoryTokensService {
    async fn freeze(
        &self,
        token_id: TokenId,
        request: FreezeToken,
    ) -> Result<FreezeOutcome, TokensServiceError> {
        let _guard = self.locks.lock(token_id.as_str()).await;
        let now = Timestamp::now();

        let next = match self.repository.get(&token_id) {
            None => TokenRecord::frozen(
                token_id.clone(),
                request.reason.clone(),
                request.auto_revoke_candidate,
                now,
            ),
            Some(token) => match token.status {
                TokenStatus::Active => TokenRecord {
                    status: TokenStatus::Frozen,
                    frozen_at: Some(now),
                    reason: Some(request.reason.clone()),
                    auto_revoke_candidate: request.auto_revoke_candidate,
                    ..token
                },
                // The first freeze reason sticks.
                TokenStatus::Frozen => {
                    debug!(token_id = %token_id, "token already frozen");

                    return Ok(FreezeOutcome::AlreadyFrozen);
                }
                TokenStatus::Revoked => return Err(TokensServiceError::CannotFreezeRevoked),
            },
        };

        self.audit
            .record(
                NewAuditEntry::new(AuditAction::FreezeToken, request.actor, token_id.as_str())
                    .reason(request.reason)
                    .details(json!({ "auto_revoke_candidate": request.auto_revoke_candidate })),
            )
            .await?;

        self.repository.save(next);

        Ok(FreezeOutcome::Frozen)
    }

    async fn unfreeze(
        &self,
        token_id: TokenId,
        request: UnfreezeToken,
    ) -> Result<UnfreezeOutcome, TokensServiceError> {
        let _guard = self.locks.lock(token_id.as_str()).await;

        let token = self
            .repository
            .get(&token_id)
            .ok_or(TokensServiceError::NotFound)?;

        match token.status {
            TokenStatus::Active => return Ok(UnfreezeOutcome::AlreadyActive),
            TokenStatus::Revoked => return Err(TokensServiceError::CannotUnfreezeRevoked),
            TokenStatus::Frozen => {}
        }

        self.audit
            .record(
                NewAuditEntry::new(AuditAction::UnfreezeToken, request.actor, token_id.as_str())
                    .reason(request.reason),
            )
            .await?;

        self.repository.save(TokenRecord {
            status: TokenStatus::Active,
            frozen_at: None,
            reason: None,
            auto_revoke_candidate: false,
            ..token
        });

        Ok(UnfreezeOutcome::Unfrozen)
    }

    async fn revoke(
        &self,
        token_id: TokenId,
        request: RevokeToken,
    ) -> Result<RevokeOutcome, TokensServiceError> {
        let _guard = self.locks.lock(token_id.as_str()).await;
        let now = Timestamp::now();

        let (next, previous_status) = match self.repository.get(&token_id) {
            None => (
                TokenRecord::revoked(token_id.clone(), request.reason.clone(), now),
                None,
            ),
            Some(token) if token.status == TokenStatus::Revoked => {
                return Ok(RevokeOutcome::AlreadyRevoked);
            }
            Some(token) => {
                let previous = token.status;

                (
                    TokenRecord {
                        status: TokenStatus::Revoked,
                        frozen_at: None,
                        revoked_at: Some(now),
                        reason: Some(request.reason.clone()),
                        ..token
                    },
                    Some(previous),
                )
            }
        };

        let mut entry =
            NewAuditEntry::new(AuditAction::RevokeToken, request.actor, token_id.as_str())
                .reason(request.reason);

        if let Some(previous) = previous_status {
            entry = entry.details(json!({ "previous_status": previous.as_str() }));
        }

        self.audit.record(entry).await?;
        self.repository.save(next);

        Ok(RevokeOutcome::Revoked { previous_status })
    }

    async fn get_token(&self, token_id: TokenId) -> Result<TokenRecord, TokensServiceError> {
        self.repository
            .get(&token_id)
            .ok_or(TokensServiceError::NotFound)
    }

    async fn token_status(&self, token_id: TokenId) -> Result<TokenStatus, TokensServiceError> {
        Ok(self
            .repository
            .get(&token_id)
            .map(|token| token.status)
            .unwrap_or_default())
    }

    async fn count(&self) -> Result<usize, TokensServiceError> {
        Ok(self.repository.len())
    }
}

#[automock]
#[async_trait]
/// Keyed token state with idempotent, audited transitions.
pub trait TokensService: Send + Sync {
    /// Freezes a token, creating it frozen when unknown.
    async fn freeze(
        &self,
        token_id: TokenId,
        request: FreezeToken,
    ) -> Result<FreezeOutcome, TokensServiceError>;

    /// Returns a frozen token to active.
    async fn unfreeze(
        &self,
        token_id: TokenId,
        request: UnfreezeToken,
    ) -> Result<UnfreezeOutcome, TokensServiceError>;

    /// Revokes a token permanently, creating it revoked when unknown.
    async fn revoke(
        &self,
        token_id: TokenId,
        request: RevokeToken,
    ) -> Result<RevokeOutcome, TokensServiceError>;

    /// Retrieves a known token.
    async fn get_token(&self, token_id: TokenId) -> Result<TokenRecord, TokensServiceError>;

    /// Current status; unknown tokens are active.
    async fn token_status(&self, token_id: TokenId) -> Result<TokenStatus, TokensServiceError>;

    /// Number of tokens the store has seen.
    async fn count(&self) -> Result<usize, TokensServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::domain::audit::{
        AuditServiceError, InMemoryAuditService, MockAuditService, records::Actor,
    };

    use super::*;

    struct Fixture {
        audit: Arc<InMemoryAuditService>,
        tokens: InMemoryTokensService,
    }

    fn fixture() -> Fixture {
        let audit = Arc::new(InMemoryAuditService::new());

        Fixture {
            tokens: InMemoryTokensService::new(audit.clone()),
            audit,
        }
    }

    fn freeze_request(reason: &str, auto_revoke_candidate: bool) -> FreezeToken {
        FreezeToken {
            reason: reason.to_owned(),
            actor: Actor::System,
            auto_revoke_candidate,
        }
    }

    fn unfreeze_request() -> UnfreezeToken {
        UnfreezeToken {
            actor: Actor::MerchantUser,
            reason: "verified".to_owned(),
        }
    }

    fn revoke_request() -> RevokeToken {
        RevokeToken {
            actor: Actor::AiAgent,
            reason: "fraud".to_owned(),
        }
    }

    async fn audit_actions(
        audit: &InMemoryAuditService,
        target: &str,
    ) -> TestResult<Vec<AuditAction>> {
        Ok(audit
            .list_for_target(target.to_owned(), 100)
            .await?
            .into_iter()
            .map(|entry| entry.action)
            .collect())
    }

    #[tokio::test]
    async fn freeze_unknown_token_creates_it_frozen() -> TestResult {
        let fx = fixture();

        let outcome = fx
            .tokens
            .freeze("tok_1".into(), freeze_request("risk", true))
            .await?;

        let token = fx.tokens.get_token("tok_1".into()).await?;

        assert_eq!(outcome, FreezeOutcome::Frozen);
        assert_eq!(token.status, TokenStatus::Frozen);
        assert!(token.auto_revoke_candidate);
        assert!(token.is_consistent());
        assert_eq!(
            audit_actions(&fx.audit, "tok_1").await?,
            vec![AuditAction::FreezeToken]
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_freeze_is_a_no_op_and_keeps_first_reason() -> TestResult {
        let fx = fixture();

        let first = fx
            .tokens
            .freeze("tok_1".into(), freeze_request("first", false))
            .await?;
        let before = fx.tokens.get_token("tok_1".into()).await?;

        let second = fx
            .tokens
            .freeze("tok_1".into(), freeze_request("second", true))
            .await?;
        let after = fx.tokens.get_token("tok_1".into()).await?;

        assert_eq!(first, FreezeOutcome::Frozen);
        assert_eq!(second, FreezeOutcome::AlreadyFrozen);
        assert_eq!(after.reason.as_deref(), Some("first"));
        assert_eq!(after.frozen_at, before.frozen_at);
        assert!(!after.auto_revoke_candidate);
        assert_eq!(fx.audit.count().await?, 1, "no-op must not be audited");

        Ok(())
    }

    #[tokio::test]
    async fn unfreeze_clears_freeze_fields() -> TestResult {
        let fx = fixture();

        fx.tokens
            .freeze("tok_1".into(), freeze_request("risk", true))
            .await?;

        let outcome = fx
            .tokens
            .unfreeze("tok_1".into(), unfreeze_request())
            .await?;

        let token = fx.tokens.get_token("tok_1".into()).await?;

        assert_eq!(outcome, UnfreezeOutcome::Unfrozen);
        assert_eq!(token.status, TokenStatus::Active);
        assert_eq!(token.frozen_at, None);
        assert_eq!(token.reason, None);
        assert!(!token.auto_revoke_candidate);
        assert!(token.is_consistent());

        Ok(())
    }

    #[tokio::test]
    async fn unfreeze_active_token_is_a_no_op() -> TestResult {
        let fx = fixture();

        fx.tokens
            .freeze("tok_1".into(), freeze_request("risk", false))
            .await?;
        fx.tokens
            .unfreeze("tok_1".into(), unfreeze_request())
            .await?;

        let again = fx
            .tokens
            .unfreeze("tok_1".into(), unfreeze_request())
            .await?;

        assert_eq!(again, UnfreezeOutcome::AlreadyActive);
        assert_eq!(fx.audit.count().await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn unfreeze_unknown_token_is_not_found() {
        let fx = fixture();

        let result = fx
            .tokens
            .unfreeze("missing".into(), unfreeze_request())
            .await;

        assert!(
            matches!(result, Err(TokensServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoke_records_previous_status() -> TestResult {
        let fx = fixture();

        fx.tokens
            .freeze("tok_1".into(), freeze_request("risk", false))
            .await?;

        let outcome = fx.tokens.revoke("tok_1".into(), revoke_request()).await?;
        let token = fx.tokens.get_token("tok_1".into()).await?;

        assert_eq!(
            outcome,
            RevokeOutcome::Revoked {
                previous_status: Some(TokenStatus::Frozen)
            }
        );
        assert_eq!(token.status, TokenStatus::Revoked);
        assert_eq!(token.frozen_at, None);
        assert!(token.revoked_at.is_some());
        assert!(token.is_consistent());

        Ok(())
    }

    #[tokio::test]
    async fn revoke_unknown_token_creates_it_revoked() -> TestResult {
        let fx = fixture();

        let outcome = fx.tokens.revoke("tok_1".into(), revoke_request()).await?;

        assert_eq!(
            outcome,
            RevokeOutcome::Revoked {
                previous_status: None
            }
        );
        assert_eq!(
            fx.tokens.token_status("tok_1".into()).await?,
            TokenStatus::Revoked
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_is_absorbing() -> TestResult {
        let fx = fixture();

        fx.tokens.revoke("tok_1".into(), revoke_request()).await?;

        let freeze = fx
            .tokens
            .freeze("tok_1".into(), freeze_request("risk", false))
            .await;
        let unfreeze = fx
            .tokens
            .unfreeze("tok_1".into(), unfreeze_request())
            .await;
        let revoke = fx.tokens.revoke("tok_1".into(), revoke_request()).await?;

        assert!(
            matches!(freeze, Err(TokensServiceError::CannotFreezeRevoked)),
            "expected CannotFreezeRevoked, got {freeze:?}"
        );
        assert!(
            matches!(unfreeze, Err(TokensServiceError::CannotUnfreezeRevoked)),
            "expected CannotUnfreezeRevoked, got {unfreeze:?}"
        );
        assert_eq!(revoke, RevokeOutcome::AlreadyRevoked);
        assert_eq!(
            fx.tokens.token_status("tok_1".into()).await?,
            TokenStatus::Revoked
        );
        assert_eq!(fx.audit.count().await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_status_defaults_to_active() -> TestResult {
        let fx = fixture();

        assert_eq!(
            fx.tokens.token_status("never_seen".into()).await?,
            TokenStatus::Active
        );
        assert_eq!(fx.tokens.count().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_freezes_transition_once() -> TestResult {
        let fx = fixture();
        let tokens = Arc::new(fx.tokens);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tokens = Arc::clone(&tokens);

                tokio::spawn(async move {
                    tokens
                        .freeze("tok_1".into(), freeze_request("risk", false))
                        .await
                })
            })
            .collect();

        let mut frozen = 0;

        for handle in handles {
            if handle.await?? == FreezeOutcome::Frozen {
                frozen += 1;
            }
        }

        assert_eq!(frozen, 1, "exactly one caller should perform the freeze");
        assert_eq!(fx.audit.count().await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_audit_leaves_state_unchanged() -> TestResult {
        let mut audit = MockAuditService::new();

        audit
            .expect_record()
            .once()
            .return_once(|_| Err(AuditServiceError::MissingTarget));

        let tokens = InMemoryTokensService::new(Arc::new(audit));

        let result = tokens
            .freeze("tok_1".into(), freeze_request("risk", false))
            .await;

        assert!(
            matches!(result, Err(TokensServiceError::Audit(_))),
            "expected Audit error, got {result:?}"
        );
        assert_eq!(
            tokens.token_status("tok_1".into()).await?,
            TokenStatus::Active
        );

        Ok(())
    }
}
