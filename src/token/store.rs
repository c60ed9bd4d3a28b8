use std::sync::Arc;

use crate::core::store::Storage;

/// Storage key owned by the token store. Nothing else reads or writes it.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// The persisted bearer token. Storage failures are logged and never escape.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &ACCESS_TOKEN_KEY)
            .finish()
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Option<String> {
        match self.storage.get_item(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                tracing::error!("Failed to read access token, {:?}", e);
                None
            }
        }
    }

    /// Overwrites the stored token. Returns false if it did not reach storage.
    pub fn set(&self, token: &str) -> bool {
        match self.storage.set_item(ACCESS_TOKEN_KEY, token) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist access token, {:?}", e);
                false
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(ACCESS_TOKEN_KEY) {
            tracing::error!("Failed to remove access token, {:?}", e);
        }
    }
}
