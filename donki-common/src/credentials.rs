//! Credential types and masking
//!
//! A credential is either an API key or a username/password pair. Anything
//! that reaches a log line or diagnostic response goes through
//! [`Credential::masked`] first; `Debug` prints the masked form as well.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Replacement shown in place of any credential value
pub const MASK: &str = "****";

/// Username/password pair as the host sends it; a missing half is empty
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPass {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Active credential used to authenticate upstream requests
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    ApiKey {
        key: String,
    },
    UserPassword {
        #[serde(rename = "userPass")]
        user_pass: UserPass,
    },
}

impl Credential {
    pub fn api_key(key: impl Into<String>) -> Self {
        Credential::ApiKey { key: key.into() }
    }

    pub fn user_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential::UserPassword {
            user_pass: UserPass {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// API key, if this credential is one
    pub fn key(&self) -> Option<&str> {
        match self {
            Credential::ApiKey { key } => Some(key),
            Credential::UserPassword { .. } => None,
        }
    }

    /// Copy with every non-empty value replaced by [`MASK`]
    ///
    /// Empty values stay empty so diagnostics still show which parts are unset.
    pub fn masked(&self) -> Credential {
        match self {
            Credential::ApiKey { key } => Credential::ApiKey { key: mask(key) },
            Credential::UserPassword { user_pass } => Credential::UserPassword {
                user_pass: UserPass {
                    username: mask(&user_pass.username),
                    password: mask(&user_pass.password),
                },
            },
        }
    }
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        MASK.to_string()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.masked() {
            Credential::ApiKey { key } => f.debug_struct("ApiKey").field("key", &key).finish(),
            Credential::UserPassword { user_pass } => f
                .debug_struct("UserPassword")
                .field("username", &user_pass.username)
                .field("password", &user_pass.password)
                .finish(),
        }
    }
}

impl fmt::Debug for UserPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPass")
            .field("username", &mask(&self.username))
            .field("password", &mask(&self.password))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_masked_api_key() {
        let credential = Credential::api_key("secret123");

        assert_eq!(credential.masked(), Credential::api_key("****"));
        assert_eq!(
            serde_json::to_value(credential.masked()).unwrap(),
            json!({ "key": "****" })
        );
    }

    #[test]
    fn test_masked_user_password_keeps_empty_values_empty() {
        let credential = Credential::user_password("alice", "");

        assert_eq!(credential.masked(), Credential::user_password("****", ""));
    }

    #[test]
    fn test_debug_never_prints_raw_values() {
        let key = format!("{:?}", Credential::api_key("secret123"));
        let pair = format!("{:?}", Credential::user_password("alice", "hunter2"));

        assert!(!key.contains("secret123"));
        assert!(key.contains(MASK));
        assert!(!pair.contains("alice"));
        assert!(!pair.contains("hunter2"));
    }

    #[test]
    fn test_host_wire_shapes() {
        let key: Credential = serde_json::from_value(json!({ "key": "abc" })).unwrap();
        assert_eq!(key, Credential::api_key("abc"));

        let pair: Credential = serde_json::from_value(json!({
            "userPass": { "username": "u", "password": "p" }
        }))
        .unwrap();
        assert_eq!(pair, Credential::user_password("u", "p"));
        assert_eq!(pair.key(), None);
    }

    #[test]
    fn test_user_pass_missing_half_is_empty() {
        let pair: UserPass = serde_json::from_value(json!({ "username": "u" })).unwrap();

        assert_eq!(pair.username, "u");
        assert_eq!(pair.password, "");
    }
}
