//! Holder for the current token

use super::Token;
use std::sync::{Arc, PoisonError, RwLock};

/// Atomic cell for the current [`Token`]
///
/// Readers get an `Arc` snapshot: the old token or the new one, never a mix.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Option<Arc<Token>>>,
}

impl TokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if one has been obtained
    #[must_use]
    pub fn read(&self) -> Option<Arc<Token>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current token wholesale and return the stored snapshot
    pub fn replace(&self, token: Token) -> Arc<Token> {
        let token = Arc::new(token);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&token));
        token
    }

    /// Drop the current token. Returns whether there was one.
    pub fn clear(&self) -> bool {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}
