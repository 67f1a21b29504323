//! Token Gate Domain Concerns

pub mod audit;
pub mod events;
pub mod lifecycle;
pub mod notifications;
pub mod risk;
pub mod scoring;
pub mod tokens;
pub mod verification;
