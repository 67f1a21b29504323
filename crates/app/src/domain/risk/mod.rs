//! Risk classification

pub mod classifier;
pub mod errors;
pub mod models;

pub use classifier::*;
pub use errors::RiskError;
