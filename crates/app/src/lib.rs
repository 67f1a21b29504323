//! Token lifecycle, risk classification and audit services.

pub mod context;
pub mod domain;

#[cfg(test)]
mod test;

mod locks;
mod uuids;
