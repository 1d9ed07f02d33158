//! Collaborators of the transform pipeline: credential storage and the upstream fetch

pub mod credential_store;
pub mod donki_client;

pub use credential_store::{CredentialStore, MemoryCredentialStore, SettingsCredentialStore};
pub use donki_client::{FetchError, FetchResponse, Fetcher, HttpFetcher};
