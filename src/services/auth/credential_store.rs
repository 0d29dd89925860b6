//! Credential store interface used by the authentication middleware.
use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors.
///
/// Note:
/// - Kept independent from `AppError`: a store failure is not the caller's fault,
///   so the middleware maps it to 500 rather than 401.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential backend error: {0}")]
    Backend(String),
    #[error("api key for {name:?} is empty")]
    EmptyKey { name: String },
    #[error("api key for {name:?} is already registered")]
    DuplicateKey { name: String },
}

/// Who an API key belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    // Short digest prefix; safe to log, unlike the key itself.
    pub fingerprint: String,
}

/// Resolves an API key to its owner.
///
/// Returns:
/// - `Ok(Some(_))` if the key is known
/// - `Ok(None)` if it is not
/// - `Err(_)` on backend failure (caller must fail closed)
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn lookup(&self, api_key: &str) -> StoreResult<Option<Principal>>;
}

fn digest(api_key: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(api_key.as_bytes()));
    out
}

/// Short, log-friendly fingerprint of a key (first 12 hex chars of SHA-256).
pub fn fingerprint(api_key: &str) -> String {
    let mut hex = hex::encode(digest(api_key));
    hex.truncate(12);
    hex
}

/// Immutable store built once at startup. Only digests of keys are kept.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    principals: HashMap<[u8; 32], Principal>,
}

impl InMemoryCredentialStore {
    pub fn from_entries<I, N, K>(entries: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: AsRef<str>,
    {
        let mut principals = HashMap::new();
        for (name, key) in entries {
            let name = name.into();
            let key = key.as_ref();
            if key.is_empty() {
                return Err(StoreError::EmptyKey { name });
            }
            let principal = Principal {
                fingerprint: fingerprint(key),
                name: name.clone(),
            };
            if principals.insert(digest(key), principal).is_some() {
                return Err(StoreError::DuplicateKey { name });
            }
        }
        Ok(Self { principals })
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, api_key: &str) -> StoreResult<Option<Principal>> {
        Ok(self.principals.get(&digest(api_key)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryCredentialStore {
        InMemoryCredentialStore::from_entries([("billing", "k-billing"), ("reports", "k-reports")])
            .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_known_key() {
        let principal = store().lookup("k-billing").await.unwrap().unwrap();
        assert_eq!(principal.name, "billing");
        assert_eq!(principal.fingerprint, fingerprint("k-billing"));
    }

    #[tokio::test]
    async fn test_lookup_unknown_key() {
        let store = store();
        assert!(store.lookup("k-unknown").await.unwrap().is_none());
        // keys are compared exactly
        assert!(store.lookup("K-BILLING").await.unwrap().is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err =
            InMemoryCredentialStore::from_entries([("a", "same"), ("b", "same")]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { name } if name == "b"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = InMemoryCredentialStore::from_entries([("a", "")]).unwrap_err();
        assert!(matches!(err, StoreError::EmptyKey { name } if name == "a"));
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("k-billing");
        assert_eq!(fp.len(), 12);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(fp, fingerprint("k-reports"));
        assert_eq!(store().len(), 2);
    }
}
