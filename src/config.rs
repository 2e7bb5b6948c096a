// Configuration: where the server lives and which key to present. Values
// come from the environment (or the matching global flags, which clap
// binds to the same variables) and are resolved once per invocation.

use crate::error::{CliError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8710";
pub const DEFAULT_API_VERSION: &str = "v1";

/// Resolved settings handed to the API client.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub api_version: String,
}

impl Config {
    /// Build a `Config` from optional raw values. A missing or blank key is
    /// fatal: the client never proceeds unauthenticated.
    pub fn resolve(
        api_url: Option<String>,
        api_key: Option<String>,
        api_version: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(CliError::MissingCredential)?;

        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_version = api_version
            .map(|v| v.trim().trim_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Config {
            api_url,
            api_key,
            api_version,
        })
    }

    /// Prefix every resource path is appended to, e.g.
    /// `http://localhost:8710/api/v1`.
    pub fn base_url(&self) -> String {
        format!("{}/api/{}", self.api_url, self.api_version)
    }
}
