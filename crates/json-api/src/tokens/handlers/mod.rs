//! Token Handlers

pub(crate) mod status;
