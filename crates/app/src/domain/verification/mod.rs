//! Verification Adjudication

mod adjudicator;

pub use adjudicator::*;
