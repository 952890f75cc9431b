//! Injected client configuration.

use serde::{Deserialize, Serialize};

/// Header carrying the caller credential when none is configured.
pub const DEFAULT_CREDENTIAL_HEADER: &str = "x-password";
/// Per-request bound in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;
/// How long a finished batch indicator stays visible.
pub const DEFAULT_BATCH_DISMISS_DELAY_MS: u32 = 1_500;
/// Root directory guarded by the area gate.
pub const DEFAULT_GATED_DIR_NAME: &str = "private";
/// Root directory holding installed mini-apps.
pub const DEFAULT_FEATURES_DIR: &str = "features";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Client configuration. Every field falls back to its default when absent.
pub struct StoreConfig {
    /// Base URL requests are issued against (no trailing `/`). Empty means same origin.
    pub api_base_url: String,
    /// Header name the credential travels in.
    pub credential_header: String,
    /// Per-request timeout; elapsed requests surface as connection errors.
    pub request_timeout_ms: u32,
    /// Delay before a finished batch indicator is dismissed.
    pub batch_dismiss_delay_ms: u32,
    /// Root directory name guarded by the area gate.
    pub gated_dir_name: String,
    /// Root directory holding installed mini-apps.
    pub features_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("STORE_API_URL")
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            batch_dismiss_delay_ms: DEFAULT_BATCH_DISMISS_DELAY_MS,
            gated_dir_name: DEFAULT_GATED_DIR_NAME.to_string(),
            features_dir: DEFAULT_FEATURES_DIR.to_string(),
        }
    }
}

impl StoreConfig {
    /// Parses a JSON configuration object, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not a JSON object of the expected shape or names an empty
    /// credential header.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let mut config: Self = serde_json::from_str(raw).map_err(|err| err.to_string())?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        if config.credential_header.trim().is_empty() {
            return Err("credential_header must not be empty".to_string());
        }
        Ok(config)
    }

    /// Builds the absolute request URL for an already-encoded wire path.
    pub fn request_url(&self, encoded_wire_path: &str) -> String {
        format!("{}{}", self.api_base_url, encoded_wire_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_take_defaults() {
        let config =
            StoreConfig::from_json(r#"{"api_base_url": "https://store.example/"}"#).expect("parse");
        assert_eq!(config.api_base_url, "https://store.example");
        assert_eq!(config.credential_header, "x-password");
        assert_eq!(config.request_timeout_ms, 15_000);
        assert_eq!(config.gated_dir_name, "private");
        assert_eq!(
            config.request_url("/docs/a%20b.txt"),
            "https://store.example/docs/a%20b.txt"
        );
    }

    #[test]
    fn empty_credential_header_is_rejected() {
        assert!(StoreConfig::from_json(r#"{"credential_header": " "}"#).is_err());
        assert!(StoreConfig::from_json("[1]").is_err());
    }
}
