//! Tokens Repository

use dashmap::DashMap;

use crate::domain::tokens::records::{TokenId, TokenRecord};

#[derive(Debug, Default)]
pub(crate) struct InMemoryTokensRepository {
    tokens: DashMap<TokenId, TokenRecord>,
}

impl InMemoryTokensRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, token_id: &TokenId) -> Option<TokenRecord> {
        self.tokens.get(token_id).map(|entry| entry.value().clone())
    }

    pub(crate) fn save(&self, token: TokenRecord) {
        self.tokens.insert(token.token_id.clone(), token);
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }
}
