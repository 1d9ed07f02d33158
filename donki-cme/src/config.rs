//! Configuration resolution for donki-cme
//!
//! Bootstrap settings come from TOML (see `donki_common::config`). The API key
//! may additionally be supplied through the environment or TOML so a fresh
//! install can serve data before the host runs its authentication flow.

use donki_common::config::TomlConfig;
use donki_common::{Credential, Result};
use tracing::{info, warn};

use crate::connector::ConnectorSettings;
use crate::services::CredentialStore;

/// Environment variable carrying an API key
pub const API_KEY_ENV_VAR: &str = "DONKI_API_KEY";

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Connector settings from bootstrap config
pub fn connector_settings(config: &TomlConfig) -> ConnectorSettings {
    ConnectorSettings {
        endpoint: config.endpoint.clone(),
        admin_mode: config.admin_mode,
    }
}

/// Resolve an API key from environment then TOML
///
/// **Priority:** ENV → TOML. Blank values are ignored.
pub fn resolve_api_key(config: &TomlConfig) -> Option<(String, &'static str)> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok().filter(|k| is_valid_key(k));
    let toml_key = config.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("API key found in both environment and TOML. Using environment (higher priority).");
    }

    env_key
        .map(|key| (key, "environment"))
        .or_else(|| toml_key.map(|key| (key, "TOML")))
}

/// Seed an empty credential store with a configured API key
///
/// A credential already in the store always wins over configuration.
/// Returns true when a key was stored.
pub async fn seed_api_key(store: &dyn CredentialStore, config: &TomlConfig) -> Result<bool> {
    if store.get().await?.is_some() {
        return Ok(false);
    }

    match resolve_api_key(config) {
        Some((key, source)) => {
            store.set(Credential::api_key(key)).await?;
            info!("API key loaded from {} into credential store", source);
            Ok(true)
        }
        None => {
            info!("No stored credential; waiting for the host to authenticate");
            Ok(false)
        }
    }
}
