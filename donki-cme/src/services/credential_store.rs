//! Credential storage
//!
//! The connector keeps a single active credential. [`CredentialStore`] is the
//! seam: [`SettingsCredentialStore`] persists it in the `settings` table,
//! [`MemoryCredentialStore`] keeps it in process (tests, embedding hosts).

use async_trait::async_trait;
use donki_common::{Credential, Result};
use sqlx::{Pool, Sqlite};
use tokio::sync::RwLock;

use crate::db::settings::{self, AUTH_API_KEY, AUTH_PASSWORD, AUTH_USERNAME};

/// Persists and retrieves the single active credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active credential, or None when the user has not authenticated
    async fn get(&self) -> Result<Option<Credential>>;

    /// Replace the active credential
    async fn set(&self, credential: Credential) -> Result<()>;

    /// Forget the active credential
    async fn clear(&self) -> Result<()>;
}

/// Credential store backed by the `settings` table
pub struct SettingsCredentialStore {
    db: Pool<Sqlite>,
}

impl SettingsCredentialStore {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SettingsCredentialStore {
    /// **Algorithm:**
    /// 1. A non-empty API key wins
    /// 2. Otherwise a username or password (either one) yields a pair,
    ///    with the missing half empty
    /// 3. Otherwise None
    async fn get(&self) -> Result<Option<Credential>> {
        let key: Option<String> = settings::get_setting(&self.db, AUTH_API_KEY).await?;
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            return Ok(Some(Credential::api_key(key)));
        }

        let username: Option<String> = settings::get_setting(&self.db, AUTH_USERNAME).await?;
        let password: Option<String> = settings::get_setting(&self.db, AUTH_PASSWORD).await?;
        let username = username.unwrap_or_default();
        let password = password.unwrap_or_default();

        if username.is_empty() && password.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Credential::user_password(username, password)))
        }
    }

    /// Writes the credential and removes the other kind's keys in one transaction
    async fn set(&self, credential: Credential) -> Result<()> {
        tracing::debug!(credential = ?credential, "Storing credential");

        let mut tx = self.db.begin().await?;
        match credential {
            Credential::ApiKey { key } => {
                settings::set_setting(&mut *tx, AUTH_API_KEY, key).await?;
                settings::delete_setting(&mut *tx, AUTH_USERNAME).await?;
                settings::delete_setting(&mut *tx, AUTH_PASSWORD).await?;
            }
            Credential::UserPassword { user_pass } => {
                settings::delete_setting(&mut *tx, AUTH_API_KEY).await?;
                settings::set_setting(&mut *tx, AUTH_USERNAME, user_pass.username).await?;
                settings::set_setting(&mut *tx, AUTH_PASSWORD, user_pass.password).await?;
            }
        }
        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut tx = self.db.begin().await?;
        for key in [AUTH_API_KEY, AUTH_USERNAME, AUTH_PASSWORD] {
            settings::delete_setting(&mut *tx, key).await?;
        }
        tx.commit().await?;
        tracing::debug!("Cleared stored credential");
        Ok(())
    }
}

/// In-process credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        Ok(self.credential.read().await.clone())
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        *self.credential.write().await = Some(credential);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.credential.write().await = None;
        Ok(())
    }
}
