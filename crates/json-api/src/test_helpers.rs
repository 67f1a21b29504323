//! Test helpers.

use std::{sync::Arc, time::Duration};

use salvo::{affix_state::inject, prelude::*};

use tokengate_app::{
    context::AppContext,
    domain::{
        lifecycle::MockLifecycleService, notifications::MockNotificationSink,
        scoring::{MockRiskScorer, RiskScorer},
    },
};

use crate::state::{State, VerificationWindow};

pub(crate) const TEST_WINDOW: VerificationWindow = VerificationWindow {
    timeout: Duration::from_secs(1),
    poll_interval: Duration::from_millis(10),
};

fn strict_notifications_mock() -> MockNotificationSink {
    let mut notifications = MockNotificationSink::new();

    notifications.expect_request_verification().never();

    notifications
}

pub(crate) fn state_with(
    lifecycle: MockLifecycleService,
    notifications: MockNotificationSink,
    scorer: Option<MockRiskScorer>,
) -> Arc<State> {
    let app = AppContext {
        lifecycle: Arc::new(lifecycle),
        notifications: Arc::new(notifications),
        scorer: scorer.map(|scorer| Arc::new(scorer) as Arc<dyn RiskScorer>),
    };

    State::from_app_context(app, TEST_WINDOW)
}

pub(crate) fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn lifecycle_service(lifecycle: MockLifecycleService, route: Router) -> Service {
    service_with(
        state_with(lifecycle, strict_notifications_mock(), None),
        route,
    )
}
