//! Transaction Lifecycle

pub mod data;
pub mod errors;
pub mod service;

pub use errors::LifecycleError;
pub use service::*;
