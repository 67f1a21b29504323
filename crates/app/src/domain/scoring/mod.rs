//! External risk scoring.

pub mod client;
pub mod data;
pub mod errors;

pub use client::*;
pub use errors::ScoringError;
