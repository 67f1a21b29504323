//! Lifecycle engine.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde_json::json;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    domain::{
        audit::{
            AuditService,
            data::NewAuditEntry,
            records::{Actor, AuditAction, AuditRecord},
        },
        events::{
            EventsService,
            data::NewEvent,
            records::{EventRecord, EventStatus, EventUuid},
        },
        lifecycle::{
            data::{
                AnalyzeResult, AnalyzeTransaction, LifecycleStats, MerchantResponse, TokenView,
                TriageAction, TriageDecision, TriageRequest, TriageResult, VerificationResult,
                VerificationWait, analyze_message,
            },
            errors::LifecycleError,
        },
        risk::models::RiskTier,
        tokens::{
            TokensService, TokensServiceError,
            data::{FreezeOutcome, FreezeToken, RevokeToken, UnfreezeOutcome, UnfreezeToken},
            records::{TokenId, TokenStatus},
        },
        verification::Adjudicator,
    },
    locks::KeyedLocks,
};

const VERIFIED_MESSAGE: &str = "Verification successful - token unfrozen, transaction can proceed";
const FAILED_MESSAGE: &str = "Verification failed - token revoked for security";
const TIMEOUT_REASON: &str = "Merchant verification timed out";
const FREEZE_REFUSED_REASON: &str = "Verification abandoned: token could not be frozen";
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Orchestrates classification, token transitions, event updates and audit.
///
/// Every workflow holds the token's workflow lock for its whole duration.
/// The token store takes its own lock inside, so the order is always
/// workflow lock first, store lock second.
pub struct LifecycleEngine {
    tokens: Arc<dyn TokensService>,
    events: Arc<dyn EventsService>,
    audit: Arc<dyn AuditService>,
    adjudicator: Arc<dyn Adjudicator>,
    locks: KeyedLocks,
}

impl LifecycleEngine {
    #[must_use]
    pub fn new(
        tokens: Arc<dyn TokensService>,
        events: Arc<dyn EventsService>,
        audit: Arc<dyn AuditService>,
        adjudicator: Arc<dyn Adjudicator>,
    ) -> Self {
        Self {
            tokens,
            events,
            audit,
            adjudicator,
            locks: KeyedLocks::new(),
        }
    }

    /// Records a token-side failure that follows an already committed
    /// verification outcome. Never fails the caller.
    async fn warn_secondary_failure(&self, token_id: &TokenId, reason: &str) {
        warn!(token_id = %token_id, reason = %reason, "lifecycle.secondary_failure");

        let entry = NewAuditEntry::new(AuditAction::VerifyEvent, Actor::System, token_id.as_str())
            .reason(format!("Warning: {reason}"));

        if let Err(error) = self.audit.record(entry).await {
            warn!(token_id = %token_id, error = %error, "failed to record warning audit entry");
        }
    }

    async fn settle_token(&self, token_id: &TokenId, verified: bool) {
        let result = if verified {
            self.tokens
                .unfreeze(
                    token_id.clone(),
                    UnfreezeToken {
                        actor: Actor::VerificationSystem,
                        reason: "Merchant verification successful".to_owned(),
                    },
                )
                .await
                .map(|_| ())
        } else {
            self.tokens
                .revoke(
                    token_id.clone(),
                    RevokeToken {
                        actor: Actor::VerificationSystem,
                        reason: "Merchant verification failed".to_owned(),
                    },
                )
                .await
                .map(|_| ())
        };

        if let Err(error) = result {
            let reason = if verified {
                format!("Could not unfreeze token after successful verification: {error}")
            } else {
                format!("Could not revoke token after failed verification: {error}")
            };

            self.warn_secondary_failure(token_id, &reason).await;
        }
    }

    async fn expire(
        &self,
        event: EventUuid,
        timeout: Duration,
    ) -> Result<VerificationWait, LifecycleError> {
        let token_id = self.events.get_event(event).await?.token_id;
        let _guard = self.locks.lock(token_id.as_str()).await;

        let mut event = self.events.get_event(event).await?;

        if !event.status.is_waiting() {
            return Ok(VerificationWait::Resolved(event.status));
        }

        self.audit
            .record(
                NewAuditEntry::new(
                    AuditAction::VerifyEvent,
                    Actor::System,
                    event.uuid.to_string(),
                )
                .reason(TIMEOUT_REASON)
                .details(json!({
                    "token_id": event.token_id.as_str(),
                    "verification_successful": false,
                    "timeout_seconds": timeout.as_secs(),
                })),
            )
            .await?;

        event.status = EventStatus::VerifiedFailure;
        event.verified_by = Some("timeout".to_owned());

        let event = self.events.save_event(event).await?;

        let revoked = self
            .tokens
            .revoke(
                event.token_id.clone(),
                RevokeToken {
                    actor: Actor::System,
                    reason: TIMEOUT_REASON.to_owned(),
                },
            )
            .await;

        if let Err(error) = revoked {
            self.warn_secondary_failure(
                &event.token_id,
                &format!("Could not revoke token after verification timeout: {error}"),
            )
            .await;
        }

        info!(event_id = %event.uuid, token_id = %event.token_id, "lifecycle.verification_timed_out");

        Ok(VerificationWait::TimedOut)
    }

    /// Best-effort audit entry for a workflow that a token or event store
    /// failure aborted. Caller errors and audit failures are not recorded.
    async fn record_failure(
        &self,
        action: AuditAction,
        target: &str,
        workflow: &str,
        error: &LifecycleError,
    ) {
        if !error.is_store_failure() {
            return;
        }

        let entry = NewAuditEntry::new(action, Actor::System, target)
            .reason(format!("{workflow} failed: {error}"));

        if let Err(source) = self.audit.record(entry).await {
            warn!(audit_target = target, error = %source, "failed to record workflow failure");
        }
    }

    /// Fail a freshly created event whose token refused to freeze.
    async fn abandon(
        &self,
        mut event: EventRecord,
        error: &TokensServiceError,
    ) -> Result<(), LifecycleError> {
        self.audit
            .record(
                NewAuditEntry::new(
                    AuditAction::VerifyEvent,
                    Actor::System,
                    event.uuid.to_string(),
                )
                .reason(FREEZE_REFUSED_REASON)
                .details(json!({
                    "token_id": event.token_id.as_str(),
                    "verification_successful": false,
                    "error": error.code(),
                })),
            )
            .await?;

        event.status = EventStatus::VerifiedFailure;
        event.verified_by = Some("freeze_refused".to_owned());

        let event = self.events.save_event(event).await?;

        warn!(
            event_id = %event.uuid,
            token_id = %event.token_id,
            code = error.code(),
            "lifecycle.freeze_refused"
        );

        Ok(())
    }

    async fn analyze_transaction(
        &self,
        request: AnalyzeTransaction,
    ) -> Result<AnalyzeResult, LifecycleError> {
        let token_id = request.token_id;
        let _guard = self.locks.lock(token_id.as_str()).await;

        if self.tokens.token_status(token_id.clone()).await? == TokenStatus::Revoked {
            return Err(LifecycleError::TokenRevoked);
        }

        let event = self
            .events
            .create_event(NewEvent {
                token_id: token_id.clone(),
                merchant_id: request.merchant_id,
                amount: request.amount,
                risk_score: request.risk_score,
            })
            .await?;

        let tier = event.tier();

        self.audit
            .record(
                NewAuditEntry::new(
                    AuditAction::AnalyzeEvent,
                    Actor::System,
                    event.uuid.to_string(),
                )
                .reason(format!("Transaction analysis - Risk Level: {tier}"))
                .details(json!({
                    "token_id": token_id.as_str(),
                    "merchant_id": event.merchant_id,
                    "amount": event.amount,
                    "risk_score": event.risk_score.value(),
                    "risk_level": tier.as_str(),
                    "metadata": request.metadata,
                })),
            )
            .await?;

        if tier.requires_verification() {
            let frozen = self
                .tokens
                .freeze(
                    token_id.clone(),
                    FreezeToken {
                        reason: format!("Risk level {tier} detected"),
                        actor: Actor::System,
                        auto_revoke_candidate: tier == RiskTier::High,
                    },
                )
                .await;

            if let Err(error) = frozen {
                self.abandon(event, &error).await?;

                return Err(error.into());
            }
        }

        let token_status = self.tokens.token_status(token_id.clone()).await?;

        info!(
            event_id = %event.uuid,
            token_id = %token_id,
            risk_level = %tier,
            decision = %event.decision,
            "lifecycle.analyzed"
        );

        Ok(AnalyzeResult {
            event_id: event.uuid,
            decision: event.decision,
            status: event.status,
            token_status,
            risk_level: tier,
            auto_revoke_candidate: event.auto_revoke_candidate,
            message: analyze_message(tier).to_owned(),
        })
    }

    async fn settle_response(
        &self,
        response: MerchantResponse,
    ) -> Result<VerificationResult, LifecycleError> {
        let token_id = self.events.get_event(response.event_id).await?.token_id;
        let _guard = self.locks.lock(token_id.as_str()).await;

        let mut event = self.events.get_event(response.event_id).await?;

        if !event.status.is_waiting() {
            return Err(LifecycleError::Conflict(format!(
                "event is {}, not waiting for verification",
                event.status
            )));
        }

        let verified = self.adjudicator.adjudicate(&response.user_response);

        self.audit
            .record(
                NewAuditEntry::new(
                    AuditAction::VerifyEvent,
                    Actor::MerchantUser,
                    event.uuid.to_string(),
                )
                .reason(format!(
                    "Merchant verification: {}",
                    if verified { "Success" } else { "Failure" }
                ))
                .details(json!({
                    "token_id": token_id.as_str(),
                    "verification_method": response.verification_method,
                    "verification_successful": verified,
                    "user_response": response.user_response,
                })),
            )
            .await?;

        event.status = EventStatus::from_verification(verified);
        event.verified_by = Some(format!("{}:merchant_response", response.verification_method));
        event.verification_evidence = Some(json!({
            "user_response": response.user_response,
            "verification_method": response.verification_method,
            "evidence": response.evidence,
            "processed_at": Timestamp::now(),
        }));

        let event = self.events.save_event(event).await?;

        self.settle_token(&token_id, verified).await;

        let token_status = self.tokens.token_status(token_id.clone()).await?;

        info!(
            event_id = %event.uuid,
            token_id = %token_id,
            verified,
            "lifecycle.verified"
        );

        Ok(VerificationResult {
            event_id: event.uuid,
            final_status: event.status,
            token_status,
            verification_successful: verified,
            message: (if verified { VERIFIED_MESSAGE } else { FAILED_MESSAGE }).to_owned(),
        })
    }

    async fn apply_triage(&self, request: TriageRequest) -> Result<TriageResult, LifecycleError> {
        let token_id = self.events.get_event(request.event_id).await?.token_id;
        let _guard = self.locks.lock(token_id.as_str()).await;

        let mut event = self.events.get_event(request.event_id).await?;

        if event.status.is_verified() {
            return Err(LifecycleError::Conflict(format!(
                "event is already {}",
                event.status
            )));
        }

        let current = self.tokens.token_status(token_id.clone()).await?;

        if current == TokenStatus::Revoked && request.decision != TriageDecision::Revoke {
            return Err(LifecycleError::TokenRevoked);
        }

        let reasoning = request.reasoning.as_deref();

        self.audit
            .record(
                NewAuditEntry::new(
                    AuditAction::TriageEvent,
                    Actor::AiAgent,
                    event.uuid.to_string(),
                )
                .reason(format!("Agent triage decision: {}", request.decision))
                .details(json!({
                    "token_id": token_id.as_str(),
                    "agent_decision": request.decision.as_str(),
                    "reasoning": reasoning,
                    "original_decision": event.decision.as_str(),
                })),
            )
            .await?;

        let action = match request.decision {
            TriageDecision::Approve => {
                let unfrozen = if current == TokenStatus::Frozen {
                    self.tokens
                        .unfreeze(
                            token_id.clone(),
                            UnfreezeToken {
                                actor: Actor::AiAgent,
                                reason: format!(
                                    "Agent approval: {}",
                                    reasoning.unwrap_or("AI agent determined transaction is safe")
                                ),
                            },
                        )
                        .await?
                } else {
                    UnfreezeOutcome::AlreadyActive
                };

                event.status = EventStatus::Approved;

                match unfrozen {
                    UnfreezeOutcome::Unfrozen => TriageAction::ApprovedUnfrozen,
                    UnfreezeOutcome::AlreadyActive => TriageAction::ApprovedNoAction,
                }
            }
            TriageDecision::Challenge => {
                let frozen = if current == TokenStatus::Active {
                    self.tokens
                        .freeze(
                            token_id.clone(),
                            FreezeToken {
                                reason: format!(
                                    "Agent requested additional verification: {}",
                                    reasoning.unwrap_or("AI agent requires more verification")
                                ),
                                actor: Actor::AiAgent,
                                auto_revoke_candidate: false,
                            },
                        )
                        .await?
                } else {
                    FreezeOutcome::AlreadyFrozen
                };

                event.status = EventStatus::WaitingVerification;

                match frozen {
                    FreezeOutcome::Frozen => TriageAction::ChallengeFrozen,
                    FreezeOutcome::AlreadyFrozen => TriageAction::ChallengeAlreadyFrozen,
                }
            }
            TriageDecision::ChallengeHigh => {
                self.tokens
                    .freeze(
                        token_id.clone(),
                        FreezeToken {
                            reason: format!(
                                "Agent identified high risk: {}",
                                reasoning.unwrap_or("AI agent detected high risk indicators")
                            ),
                            actor: Actor::AiAgent,
                            auto_revoke_candidate: true,
                        },
                    )
                    .await?;

                event.status = EventStatus::WaitingVerification;
                event.auto_revoke_candidate = true;

                TriageAction::HighRiskFrozen
            }
            TriageDecision::Revoke => {
                self.tokens
                    .revoke(
                        token_id.clone(),
                        RevokeToken {
                            actor: Actor::AiAgent,
                            reason: format!(
                                "Agent recommended revocation: {}",
                                reasoning.unwrap_or("AI agent determined token should be revoked")
                            ),
                        },
                    )
                    .await?;

                event.status = EventStatus::VerifiedFailure;

                TriageAction::Revoked
            }
        };

        let event = self.events.save_event(event).await?;
        let token_status = self.tokens.token_status(token_id.clone()).await?;

        info!(
            event_id = %event.uuid,
            token_id = %token_id,
            action = %action,
            "lifecycle.triaged"
        );

        Ok(TriageResult {
            event_id: event.uuid,
            action_taken: action,
            event_status: event.status,
            token_status,
            message: action.message().to_owned(),
        })
    }

}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine").finish_non_exhaustive()
    }
}

#[async_trait]
impl LifecycleService for LifecycleEngine {
    async fn analyze(&self, request: AnalyzeTransaction) -> Result<AnalyzeResult, LifecycleError> {
        let token_id = request.token_id.clone();
        let result = self.analyze_transaction(request).await;

        if let Err(error) = &result {
            self.record_failure(AuditAction::AnalyzeEvent, token_id.as_str(), "Analysis", error)
                .await;
        }

        result
    }

    async fn handle_merchant_response(
        &self,
        response: MerchantResponse,
    ) -> Result<VerificationResult, LifecycleError> {
        let target = response.event_id.to_string();
        let result = self.settle_response(response).await;

        if let Err(error) = &result {
            self.record_failure(
                AuditAction::VerifyEvent,
                &target,
                "Merchant response processing",
                error,
            )
            .await;
        }

        result
    }

    async fn triage(&self, request: TriageRequest) -> Result<TriageResult, LifecycleError> {
        let target = request.event_id.to_string();
        let result = self.apply_triage(request).await;

        if let Err(error) = &result {
            self.record_failure(AuditAction::TriageEvent, &target, "Agent triage", error)
                .await;
        }

        result
    }

    async fn await_verification(
        &self,
        event: EventUuid,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<VerificationWait, LifecycleError> {
        let deadline = Instant::now() + timeout;
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);

        loop {
            let status = self.events.get_event(event).await?.status;

            if !status.is_waiting() {
                debug!(event_id = %event, status = %status, "verification resolved");

                return Ok(VerificationWait::Resolved(status));
            }

            let now = Instant::now();

            if now >= deadline {
                break;
            }

            sleep(poll_interval.min(deadline - now)).await;
        }

        self.expire(event, timeout).await
    }

    async fn event(&self, event: EventUuid) -> Result<EventRecord, LifecycleError> {
        Ok(self.events.get_event(event).await?)
    }

    async fn token(&self, token_id: TokenId) -> Result<TokenView, LifecycleError> {
        match self.tokens.get_token(token_id.clone()).await {
            Ok(token) => Ok(TokenView::Known(token)),
            Err(TokensServiceError::NotFound) => Ok(TokenView::Unknown(token_id)),
            Err(error) => Err(error.into()),
        }
    }

    async fn audit_trail(
        &self,
        target: String,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, LifecycleError> {
        Ok(self.audit.list_for_target(target, limit).await?)
    }

    async fn stats(&self) -> Result<LifecycleStats, LifecycleError> {
        Ok(LifecycleStats {
            tokens: self.tokens.count().await?,
            events: self.events.count().await?,
            audit_entries: self.audit.count().await?,
        })
    }
}

#[automock]
#[async_trait]
/// Token and event lifecycle workflows.
pub trait LifecycleService: Send + Sync {
    /// Classifies a transaction, records its event and freezes the token
    /// when verification is required.
    async fn analyze(&self, request: AnalyzeTransaction) -> Result<AnalyzeResult, LifecycleError>;

    /// Resolves a waiting event from the merchant's verification response.
    async fn handle_merchant_response(
        &self,
        response: MerchantResponse,
    ) -> Result<VerificationResult, LifecycleError>;

    /// Applies an agent override to an unresolved event.
    async fn triage(&self, request: TriageRequest) -> Result<TriageResult, LifecycleError>;

    /// Waits for an event to leave `waiting_verification`, failing it and
    /// revoking its token when `timeout` elapses first.
    async fn await_verification(
        &self,
        event: EventUuid,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<VerificationWait, LifecycleError>;

    async fn event(&self, event: EventUuid) -> Result<EventRecord, LifecycleError>;

    /// Token state, with unknown ids reported as the active default.
    async fn token(&self, token_id: TokenId) -> Result<TokenView, LifecycleError>;

    /// The most recent `limit` audit entries for a token or event id, oldest first.
    async fn audit_trail(
        &self,
        target: String,
        limit: usize,
    ) -> Result<Vec<AuditRecord>, LifecycleError>;

    async fn stats(&self) -> Result<LifecycleStats, LifecycleError>;
}
