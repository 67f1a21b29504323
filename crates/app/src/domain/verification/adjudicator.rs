//! Free-text verification responses to a verified / not verified outcome.

use mockall::automock;

/// Words that indicate the cardholder confirmed the transaction.
pub const SUCCESS_TERMS: [&str; 6] = [
    "yes",
    "approve",
    "authorized",
    "legitimate",
    "valid",
    "correct",
];

/// Words that indicate the cardholder disputed the transaction.
pub const FAILURE_TERMS: [&str; 7] = [
    "no",
    "deny",
    "fraud",
    "suspicious",
    "unauthorized",
    "invalid",
    "wrong",
];

#[automock]
pub trait Adjudicator: Send + Sync {
    /// Returns `true` only when the response clearly confirms the transaction.
    fn adjudicate(&self, response: &str) -> bool;
}

/// Case-insensitive substring matching against fixed success and failure
/// lexicons. Any failure term, or no success term, means not verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAdjudicator;

impl LexiconAdjudicator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Adjudicator for LexiconAdjudicator {
    fn adjudicate(&self, response: &str) -> bool {
        let response = response.to_lowercase();

        let confirmed = SUCCESS_TERMS.iter().any(|term| response.contains(term));
        let disputed = FAILURE_TERMS.iter().any(|term| response.contains(term));

        confirmed && !disputed
    }
}
