//! State

use std::{sync::Arc, time::Duration};

use tokengate_app::context::AppContext;

use crate::config::lifecycle::LifecycleConfig;

/// How long a challenged event waits for its merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VerificationWindow {
    pub(crate) timeout: Duration,
    pub(crate) poll_interval: Duration,
}

impl From<&LifecycleConfig> for VerificationWindow {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            timeout: config.verification_timeout(),
            poll_interval: config.verification_poll_interval(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) verification: VerificationWindow,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, verification: VerificationWindow) -> Self {
        Self { app, verification }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, verification: VerificationWindow) -> Arc<Self> {
        Arc::new(Self::new(app, verification))
    }
}
