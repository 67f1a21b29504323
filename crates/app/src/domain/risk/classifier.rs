//! Score to tier classification.

use crate::domain::risk::{
    errors::RiskError,
    models::{Decision, LOW_MAX, MEDIUM_MAX, MEDIUM_MIN, RiskScore, RiskTier},
};

/// Classify a validated score.
#[must_use]
pub fn classify(score: RiskScore) -> RiskTier {
    match score.value() {
        0..=LOW_MAX => RiskTier::Low,
        MEDIUM_MIN..=MEDIUM_MAX => RiskTier::Medium,
        _ => RiskTier::High,
    }
}

/// Classify a raw score, rejecting anything outside `0..=100`.
pub fn classify_raw(score: i64) -> Result<RiskTier, RiskError> {
    RiskScore::new(score).map(classify)
}

#[must_use]
pub const fn decision_for(tier: RiskTier) -> Decision {
    match tier {
        RiskTier::Low => Decision::Approve,
        RiskTier::Medium => Decision::Challenge,
        RiskTier::High => Decision::ChallengeHigh,
    }
}
