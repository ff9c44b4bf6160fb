//! Connection configuration shared by the client and its facades.

use serde::{Deserialize, Serialize};

/// Production host used when `ClientConfig::host` is unset.
pub const DEFAULT_HOST: &str = "https://api.commonsense.org";

/// Protocol version segment prepended to every path (`/v3/...`).
pub const API_VERSION: u32 = 3;

/// Credentials and host for the Common Sense API.
///
/// Keys serialize in camelCase (`clientId`, `appId`, `host`) so a config
/// block can be loaded straight from the JSON the service documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub client_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            app_id: app_id.into(),
            host: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Configured host without a trailing slash, or `DEFAULT_HOST`.
    ///
    /// An empty string counts as unset.
    pub fn host(&self) -> &str {
        match self.host.as_deref() {
            Some(host) if !host.is_empty() => host.trim_end_matches('/'),
            _ => DEFAULT_HOST,
        }
    }
}
