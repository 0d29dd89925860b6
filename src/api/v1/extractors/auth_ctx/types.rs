/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The middleware resolves the API key, stores this in request extensions,
 *   and handlers only ever receive this type
 */
use crate::services::auth::Principal;

/// Context attached to a request whose API key was accepted.
///
/// - `principal` is the owner name the key was registered under
/// - `key_fingerprint` is a short digest prefix of the key (log correlation only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub principal: String,
    pub key_fingerprint: String,
}

impl From<Principal> for AuthCtx {
    fn from(p: Principal) -> Self {
        Self {
            principal: p.name,
            key_fingerprint: p.fingerprint,
        }
    }
}
