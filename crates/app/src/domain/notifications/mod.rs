//! Merchant notification.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::domain::{
    events::records::EventUuid, risk::models::RiskTier, tokens::records::TokenId,
};

/// A request asking the merchant to verify a challenged transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub event_id: EventUuid,
    pub token_id: TokenId,
    pub merchant_id: String,
    pub risk_level: RiskTier,
}

#[automock]
#[async_trait]
/// Delivers verification requests to merchants.
pub trait NotificationSink: Send + Sync {
    async fn request_verification(&self, request: VerificationRequest);
}

/// Writes each verification request as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn request_verification(&self, request: VerificationRequest) {
        info!(
            event_id = %request.event_id,
            token_id = %request.token_id,
            merchant_id = %request.merchant_id,
            risk_level = %request.risk_level,
            "merchant.verification_requested"
        );
    }
}
