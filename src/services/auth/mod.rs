pub mod api_key;
pub mod credential_store;

pub use api_key::{ApiKeyError, extract_api_key};
pub use credential_store::{CredentialStore, InMemoryCredentialStore, Principal};
