//! Risk Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::domain::risk::errors::RiskError;

/// Highest score still classified as [`RiskTier::Low`].
pub const LOW_MAX: u8 = 49;

/// Lowest score classified as [`RiskTier::Medium`].
pub const MEDIUM_MIN: u8 = 50;

/// Highest score still classified as [`RiskTier::Medium`].
pub const MEDIUM_MAX: u8 = 79;

/// Upper bound of the score range.
pub const SCORE_MAX: u8 = 100;

/// A risk score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    /// Validate a raw score.
    pub fn new(score: i64) -> Result<Self, RiskError> {
        u8::try_from(score)
            .ok()
            .filter(|score| *score <= SCORE_MAX)
            .map(Self)
            .ok_or(RiskError::InvalidScore(score))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RiskScore {
    type Error = RiskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl Display for RiskScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Risk tier derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Tiers above LOW require merchant verification.
    #[must_use]
    pub const fn requires_verification(self) -> bool {
        !matches!(self, Self::Low)
    }
}

impl Display for RiskTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Gating decision attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Challenge,
    ChallengeHigh,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Challenge => "challenge",
            Self::ChallengeHigh => "challenge_high",
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
