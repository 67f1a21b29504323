//! Events service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::domain::{
    events::{
        data::NewEvent,
        errors::EventsServiceError,
        records::{EventRecord, EventStatus, EventUuid},
        repository::InMemoryEventsRepository,
    },
    risk::{classify, decision_for, models::RiskTier},
};

#[derive(Debug, Default)]
pub struct InMemoryEventsService {
    repository: InMemoryEventsRepository,
}

impl InMemoryEventsService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: InMemoryEventsRepository::new(),
        }
    }
}

#[async_trait]
impl EventsService for InMemoryEventsService {
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord, EventsServiceError> {
        if !event.amount.is_finite() || event.amount <= 0.0 {
            return Err(EventsServiceError::InvalidAmount);
        }

        let tier = classify(event.risk_score);
        let now = Timestamp::now();

        let status = if tier.requires_verification() {
            EventStatus::WaitingVerification
        } else {
            EventStatus::Approved
        };

        let record = EventRecord {
            uuid: EventUuid::new(),
            token_id: event.token_id,
            merchant_id: event.merchant_id,
            amount: event.amount,
            risk_score: event.risk_score,
            status,
            decision: decision_for(tier),
            auto_revoke_candidate: tier == RiskTier::High,
            verified_by: None,
            verification_evidence: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(record.clone());

        Ok(record)
    }

    async fn get_event(&self, event: EventUuid) -> Result<EventRecord, EventsServiceError> {
        self.repository
            .get(event)
            .ok_or(EventsServiceError::NotFound)
    }

    async fn save_event(&self, mut event: EventRecord) -> Result<EventRecord, EventsServiceError> {
        event.updated_at = Timestamp::now();

        if self.repository.replace(event.clone()) {
            Ok(event)
        } else {
            Err(EventsServiceError::NotFound)
        }
    }

    async fn count(&self) -> Result<usize, EventsServiceError> {
        Ok(self.repository.len())
    }
}

#[automock]
#[async_trait]
pub trait EventsService: Send + Sync {
    /// Creates an event, deriving tier, decision and initial status from the score.
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord, EventsServiceError>;

    /// Retrieves an event.
    async fn get_event(&self, event: EventUuid) -> Result<EventRecord, EventsServiceError>;

    /// Persists changes to an existing event.
    async fn save_event(&self, event: EventRecord) -> Result<EventRecord, EventsServiceError>;

    async fn count(&self) -> Result<usize, EventsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::risk::models::{Decision, RiskScore};

    use super::*;

    fn new_event(score: i64) -> TestResult<NewEvent> {
        Ok(NewEvent {
            token_id: "tok_1".into(),
            merchant_id: "merchant_1".to_owned(),
            amount: 42.5,
            risk_score: RiskScore::new(score)?,
        })
    }

    #[tokio::test]
    async fn low_risk_event_is_approved() -> TestResult {
        let events = InMemoryEventsService::new();

        let event = events.create_event(new_event(10)?).await?;

        assert_eq!(event.status, EventStatus::Approved);
        assert_eq!(event.decision, Decision::Approve);
        assert!(!event.auto_revoke_candidate);
        assert_eq!(event.created_at, event.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn medium_risk_event_waits_for_verification() -> TestResult {
        let events = InMemoryEventsService::new();

        let event = events.create_event(new_event(65)?).await?;

        assert_eq!(event.status, EventStatus::WaitingVerification);
        assert_eq!(event.decision, Decision::Challenge);
        assert!(!event.auto_revoke_candidate);

        Ok(())
    }

    #[tokio::test]
    async fn high_risk_event_is_an_auto_revoke_candidate() -> TestResult {
        let events = InMemoryEventsService::new();

        let event = events.create_event(new_event(80)?).await?;

        assert_eq!(event.status, EventStatus::WaitingVerification);
        assert_eq!(event.decision, Decision::ChallengeHigh);
        assert!(event.auto_revoke_candidate);

        Ok(())
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() -> TestResult {
        let events = InMemoryEventsService::new();

        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = events
                .create_event(NewEvent {
                    amount,
                    ..new_event(10)?
                })
                .await;

            assert!(
                matches!(result, Err(EventsServiceError::InvalidAmount)),
                "expected InvalidAmount for {amount}, got {result:?}"
            );
        }

        assert_eq!(events.count().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn save_updates_existing_event() -> TestResult {
        let events = InMemoryEventsService::new();

        let mut event = events.create_event(new_event(65)?).await?;
        event.status = EventStatus::VerifiedSuccess;
        event.verified_by = Some("sms:merchant_response".to_owned());

        let saved = events.save_event(event.clone()).await?;
        let fetched = events.get_event(event.uuid).await?;

        assert_eq!(fetched.status, EventStatus::VerifiedSuccess);
        assert_eq!(fetched, saved);
        assert!(saved.updated_at >= saved.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn save_unknown_event_is_not_found() -> TestResult {
        let events = InMemoryEventsService::new();
        let other = InMemoryEventsService::new();

        let event = other.create_event(new_event(10)?).await?;

        let result = events.save_event(event).await;

        assert!(
            matches!(result, Err(EventsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_event_is_not_found() {
        let events = InMemoryEventsService::new();

        let result = events.get_event(EventUuid::new()).await;

        assert!(
            matches!(result, Err(EventsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
