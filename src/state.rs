/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - credentials: the store the auth middleware resolves keys against
 * - Must stay cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }
}
