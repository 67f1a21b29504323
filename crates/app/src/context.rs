//! App Context

use std::sync::Arc;

use crate::domain::{
    audit::{AuditService, InMemoryAuditService},
    events::{EventsService, InMemoryEventsService},
    lifecycle::{LifecycleEngine, LifecycleService},
    notifications::{LogNotificationSink, NotificationSink},
    scoring::RiskScorer,
    tokens::{InMemoryTokensService, TokensService},
    verification::LexiconAdjudicator,
};

#[derive(Clone)]
pub struct AppContext {
    pub lifecycle: Arc<dyn LifecycleService>,
    pub notifications: Arc<dyn NotificationSink>,

    /// Present only when a remote scorer is configured.
    pub scorer: Option<Arc<dyn RiskScorer>>,
}

impl AppContext {
    /// Build an application context backed by in-memory stores.
    ///
    /// The stores are created once here and shared by every service.
    #[must_use]
    pub fn in_memory(scorer: Option<Arc<dyn RiskScorer>>) -> Self {
        let audit: Arc<dyn AuditService> = Arc::new(InMemoryAuditService::new());
        let tokens: Arc<dyn TokensService> = Arc::new(InMemoryTokensService::new(audit.clone()));
        let events: Arc<dyn EventsService> = Arc::new(InMemoryEventsService::new());

        Self {
            lifecycle: Arc::new(LifecycleEngine::new(
                tokens,
                events,
                audit,
                Arc::new(LexiconAdjudicator::new()),
            )),
            notifications: Arc::new(LogNotificationSink::new()),
            scorer,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("scorer", &self.scorer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::lifecycle::data::LifecycleStats;

    use super::*;

    #[tokio::test]
    async fn in_memory_context_starts_empty() -> TestResult {
        let app = AppContext::in_memory(None);

        assert_eq!(app.lifecycle.stats().await?, LifecycleStats::default());
        assert!(app.scorer.is_none());

        Ok(())
    }
}
