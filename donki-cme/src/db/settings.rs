//! Settings database operations
//!
//! Get/set/delete accessors over the `settings` key/value table.

use donki_common::{Error, Result};
use sqlx::{Executor, Pool, Sqlite};

/// Settings key holding the API key
pub const AUTH_API_KEY: &str = "auth_api_key";
/// Settings key holding the username
pub const AUTH_USERNAME: &str = "auth_username";
/// Settings key holding the password
pub const AUTH_PASSWORD: &str = "auth_password";

/// Generic setting getter
///
/// **Returns:** Some(value) if the key exists with a non-NULL value, None otherwise
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((Some(value),)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::InvalidSetting {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
            Ok(Some(parsed))
        }
        _ => Ok(None),
    }
}

/// Generic setting setter (insert or replace)
///
/// Accepts a pool or an open transaction.
pub async fn set_setting<'e, E, T>(db: E, key: &str, value: T) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Remove a setting; missing keys are not an error
pub async fn delete_setting<'e, E>(db: E, key: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(db)
        .await
        .map_err(Error::Database)?;

    Ok(())
}
