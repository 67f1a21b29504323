//! Risk classification errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RiskError {
    #[error("risk score {0} is outside 0..=100")]
    InvalidScore(i64),
}
