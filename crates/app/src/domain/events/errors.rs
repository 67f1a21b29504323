//! Event service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventsServiceError {
    #[error("event not found")]
    NotFound,

    #[error("amount must be a positive finite number")]
    InvalidAmount,
}
