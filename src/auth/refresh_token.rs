/// Refresh Token Registry
///
/// Tracks which refresh tokens are still usable. A signed refresh token is only
/// accepted while its entry is present, so removing the entry revokes it.
/// Entries are keyed by the SHA-256 digest of the token; plaintext tokens
/// never reach the store.
///
/// Entries are not expired by the registry. Expiry is enforced by the token's
/// own `exp` claim; an entry for an expired token is unreachable but harmless.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use sha2::{Digest, Sha256};

use crate::auth::claims::Payload;

/// Storage backend for active refresh tokens
///
/// Implement this to keep refresh tokens in a database or shared cache; the
/// default in-memory store does not survive a restart and is not shared
/// between processes.
pub trait RefreshTokenStore: Send + Sync {
    /// Insert or overwrite an entry
    fn put(&self, key: String, payload: Payload);
    fn get(&self, key: &str) -> Option<Payload>;
    /// Remove an entry; removing a missing key is not an error
    fn delete(&self, key: &str);
}

/// Hash a refresh token using SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Process-local registry backed by a `HashMap`
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    entries: RwLock<HashMap<String, Payload>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RefreshTokenStore for InMemoryRefreshTokenStore {
    fn put(&self, key: String, payload: Payload) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, payload);
    }

    fn get(&self, key: &str) -> Option<Payload> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn delete(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
