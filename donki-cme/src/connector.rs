//! Host-facing connector
//!
//! [`Connector`] is what the reporting host talks to: authentication
//! handshake, configuration, schema and data requests. It owns no state of
//! its own beyond its collaborators: the credential store and the fetcher
//! are injected.
//!
//! **Error policy:**
//! - Absent credential: validity reports `false`, data returns no rows
//! - Transport failure: validity reports `false`, data fails hard
//! - Event without analyses: skipped
//! - Unknown requested field: data fails hard, before the credential check;
//!   schema drops it silently

use chrono::NaiveDate;
use donki_common::schema::narrow_schema;
use donki_common::{Credential, DataRow, RequestedField, Schema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cme::{self, full_schema, TransformError};
use crate::config::is_valid_key;
use crate::services::donki_client::{build_auth_check_url, build_data_url};
use crate::services::{CredentialStore, FetchError, Fetcher};

/// Connector failures surfaced to the host
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Upstream request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Upstream payload could not be parsed: {0}")]
    Parse(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Credential store error: {0}")]
    Store(#[from] donki_common::Error),
}

/// Connector settings resolved from bootstrap config
#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    /// Upstream endpoint without query string
    pub endpoint: String,
    /// Whether the host user sees admin diagnostics
    pub admin_mode: bool,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            endpoint: donki_common::config::DEFAULT_ENDPOINT.to_string(),
            admin_mode: false,
        }
    }
}

// ============================================================================
// Host request/response types
// ============================================================================

/// Authentication mechanism the host should collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    None,
    #[serde(rename = "OAUTH2")]
    OAuth2,
    Key,
    #[serde(rename = "USER_PASS")]
    UserPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTypeResponse {
    #[serde(rename = "type")]
    pub auth_type: AuthType,
}

/// Credentials as collected by the host; either part may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetCredentialsRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, rename = "userPass")]
    pub user_pass: Option<donki_common::credentials::UserPass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetCredentialsErrorCode {
    None,
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCredentialsResponse {
    pub error_code: SetCredentialsErrorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigParamType {
    TextInput,
    TextArea,
    SelectSingle,
    SelectMultiple,
    Checkbox,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParam {
    #[serde(rename = "type")]
    pub param_type: ConfigParamType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub config_params: Vec<ConfigParam>,
    pub date_range_required: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRequest {
    /// Narrow to these fields; full schema when absent
    #[serde(default)]
    pub fields: Option<Vec<RequestedField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: Schema,
}

/// Inclusive date range, `YYYY-MM-DD` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    pub fields: Vec<RequestedField>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub schema: Schema,
    pub rows: Vec<DataRow>,
    /// Always false: fetched pages are never cached
    pub cached_data: bool,
}

// ============================================================================
// Connector
// ============================================================================

pub struct Connector {
    store: Arc<dyn CredentialStore>,
    fetcher: Arc<dyn Fetcher>,
    settings: ConnectorSettings,
}

impl Connector {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        fetcher: Arc<dyn Fetcher>,
        settings: ConnectorSettings,
    ) -> Self {
        Self {
            store,
            fetcher,
            settings,
        }
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub fn auth_type(&self) -> AuthTypeResponse {
        AuthTypeResponse {
            auth_type: AuthType::Key,
        }
    }

    pub fn is_admin_user(&self) -> bool {
        debug!(admin = self.settings.admin_mode, "is_admin_user");
        self.settings.admin_mode
    }

    /// Extra parameters the host should collect; the date range is mandatory
    pub fn config(&self) -> ConfigResponse {
        ConfigResponse {
            config_params: vec![ConfigParam {
                param_type: ConfigParamType::Info,
                name: "info".to_string(),
                display_name: None,
                help_text: None,
                text: Some("The connector is now ready to use.".to_string()),
            }],
            date_range_required: true,
        }
    }

    /// Full schema, or the requested subset in request order
    pub fn schema(&self, requested: Option<&[RequestedField]>) -> SchemaResponse {
        let schema = match requested {
            Some(fields) => narrow_schema(fields, full_schema()),
            None => full_schema().clone(),
        };
        debug!(fields = schema.len(), "schema");
        SchemaResponse { schema }
    }

    /// Store credentials collected by the host
    ///
    /// A non-blank API key wins over a username/password pair. When neither
    /// is usable nothing is stored and `INVALID_CREDENTIALS` is returned.
    pub async fn set_credentials(
        &self,
        request: SetCredentialsRequest,
    ) -> Result<SetCredentialsResponse, ConnectorError> {
        let credential = match (request.key, request.user_pass) {
            (Some(key), _) if is_valid_key(&key) => Some(Credential::api_key(key)),
            (_, Some(pair)) if !pair.username.is_empty() || !pair.password.is_empty() => {
                Some(Credential::user_password(pair.username, pair.password))
            }
            _ => None,
        };

        let Some(credential) = credential else {
            warn!("set_credentials called without a usable key or username/password");
            return Ok(SetCredentialsResponse {
                error_code: SetCredentialsErrorCode::InvalidCredentials,
            });
        };

        debug!(credential = ?credential, "set_credentials");
        self.store.set(credential).await?;
        info!("Credentials stored");

        Ok(SetCredentialsResponse {
            error_code: SetCredentialsErrorCode::None,
        })
    }

    pub async fn credentials(&self) -> Result<Option<Credential>, ConnectorError> {
        let credential = self.store.get().await?;
        debug!(credential = ?credential, "credentials");
        Ok(credential)
    }

    /// Stored credential with every value replaced by the mask
    pub async fn masked_credentials(&self) -> Result<Option<Credential>, ConnectorError> {
        Ok(self.credentials().await?.map(|c| c.masked()))
    }

    pub async fn reset_auth(&self) -> Result<(), ConnectorError> {
        self.store.clear().await?;
        info!("Credentials reset");
        Ok(())
    }

    /// Check the stored credential against the upstream API
    ///
    /// Never fails: a missing credential, a store error, a transport error or
    /// any status other than 200 all report `false`.
    pub async fn is_auth_valid(&self) -> bool {
        let credential = match self.store.get().await {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Could not read credentials: {}", e);
                return false;
            }
        };

        let Some(key) = credential.as_ref().and_then(|c| c.key()) else {
            debug!("is_auth_valid: no API key stored");
            return false;
        };

        let url = build_auth_check_url(&self.settings.endpoint, key);
        let valid = match self.fetcher.fetch(&url).await {
            Ok(response) => response.is_ok(),
            Err(e) => {
                warn!("Credential check failed: {}", e);
                false
            }
        };

        debug!(valid, "is_auth_valid");
        valid
    }

    /// Fetch events in the date range and shape them into rows
    ///
    /// **Algorithm:**
    /// 1. Reject unknown field names, then narrow the schema to the request
    /// 2. Without a stored API key, return that schema with no rows
    /// 3. Fetch once; non-200 or unparseable bodies fail the request
    /// 4. Transform events into rows
    pub async fn data(&self, request: &DataRequest) -> Result<DataResponse, ConnectorError> {
        debug!(
            fields = request.fields.len(),
            start = %request.date_range.start_date,
            end = %request.date_range.end_date,
            "data"
        );

        cme::transform::resolve_fields(&request.fields)?;
        let schema = narrow_schema(&request.fields, full_schema());

        let credential = self.store.get().await?;
        let Some(key) = credential.as_ref().and_then(|c| c.key()) else {
            warn!("data requested without an API key; returning no rows");
            return Ok(DataResponse {
                schema,
                rows: Vec::new(),
                cached_data: false,
            });
        };

        let url = build_data_url(
            &self.settings.endpoint,
            key,
            request.date_range.start_date,
            request.date_range.end_date,
        );
        let response = self.fetcher.fetch(&url).await?;
        if !response.is_ok() {
            warn!(status_code = response.status_code, "DONKI request rejected");
            return Err(ConnectorError::UpstreamStatus(response.status_code));
        }

        let events = cme::model::parse_events(&response.body)
            .map_err(|e| ConnectorError::Parse(e.to_string()))?;
        let rows = cme::transform(&events, &request.fields)?;

        info!(events = events.len(), rows = rows.len(), "CME data fetched");

        Ok(DataResponse {
            schema,
            rows,
            cached_data: false,
        })
    }
}
