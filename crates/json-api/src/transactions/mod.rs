//! Transactions

mod errors;
mod followup;
pub(crate) mod handlers;

pub(crate) use errors::into_status_error;
pub(crate) use handlers::*;
