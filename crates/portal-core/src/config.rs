//! Client configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! A `.env` file in the working directory is honoured when present.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Environment variable holding the remote API base URL.
pub const ENV_API_URL: &str = "PORTAL_API_URL";
/// Environment variable holding the HTTP request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "PORTAL_REQUEST_TIMEOUT_SECS";
/// Environment variable holding the path of the file-backed session store.
pub const ENV_SESSION_FILE: &str = "PORTAL_SESSION_FILE";

/// Default remote API URL (a local json-server).
fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// Portal client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the remote resource API (e.g., `http://localhost:3000`).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Timeout applied to every remote API request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the file backing the session cache.
    ///
    /// `None` keeps the session cache in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            session_file: None,
        }
    }
}

impl PortalConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if a variable is present but invalid.
    pub fn from_env() -> CoreResult<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(ENV_API_URL) {
            Some(url) => normalize_api_url(&url)?,
            None => default_api_url(),
        };

        let request_timeout_secs = match lookup(ENV_REQUEST_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                CoreError::config(format!("{ENV_REQUEST_TIMEOUT} must be a number of seconds: {e}"))
            })?,
            None => default_request_timeout_secs(),
        };

        let session_file = lookup(ENV_SESSION_FILE)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            request_timeout_secs,
            session_file,
        })
    }

    /// Creates a configuration for testing against a local server.
    #[must_use]
    pub fn for_testing(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 5,
            session_file: None,
        }
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn normalize_api_url(raw: &str) -> CoreResult<String> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(CoreError::config(format!("{ENV_API_URL} is empty")));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CoreError::config(format!(
            "{ENV_API_URL} must be an http(s) URL, got '{url}'"
        )));
    }
    Ok(url.to_string())
}
