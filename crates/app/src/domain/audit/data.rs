//! Audit Data

use serde_json::Value;

use crate::domain::audit::records::{Actor, AuditAction};

/// New Audit Entry Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub actor: Actor,
    pub target: String,
    pub reason: Option<String>,
    pub details: Option<Value>,
}

impl NewAuditEntry {
    #[must_use]
    pub fn new(action: AuditAction, actor: Actor, target: impl Into<String>) -> Self {
        Self {
            action,
            actor,
            target: target.into(),
            reason: None,
            details: None,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
