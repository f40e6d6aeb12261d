//! Plugin Configuration
//!
//! The one required setting is the Zapper API key, read from the runtime's
//! settings with a process-environment fallback. Validation happens on
//! every handler call; nothing is cached.

use agent_core::AgentRuntime;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Result, ZapperError};

/// Settings/environment key holding the API key
pub const ZAPPER_API_KEY: &str = "ZAPPER_API_KEY";

/// Validated plugin configuration
#[derive(Clone, Debug)]
pub struct ZapperConfig {
    /// Non-empty Zapper API key
    pub api_key: String,
}

impl ZapperConfig {
    /// Validate the configuration from runtime settings and environment.
    pub fn validate(runtime: &AgentRuntime) -> Result<Self> {
        match runtime.setting(ZAPPER_API_KEY) {
            Some(key) if !key.trim().is_empty() => Ok(Self { api_key: key }),
            _ => Err(ZapperError::Config(format!("{ZAPPER_API_KEY} is required"))),
        }
    }

    /// HTTP headers for the Zapper API: JSON content type plus Basic auth
    /// with the whole API key as the base64-encoded credential.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let credential = STANDARD.encode(&self.api_key);
        let value = HeaderValue::from_str(&format!("Basic {credential}"))
            .map_err(|e| ZapperError::Config(format!("invalid API key: {e}")))?;
        headers.insert(AUTHORIZATION, value);

        Ok(headers)
    }
}
