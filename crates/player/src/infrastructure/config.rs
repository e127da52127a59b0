//! Client configuration from the environment
//!
//! `.env.local` then `.env` at the workspace root are loaded first (without
//! overriding variables already set), then `ClientConfig::from_env` reads:
//!
//! - `ECHOVERSE_APP_ID` - document namespace (default `default-app-id`)
//! - `ECHOVERSE_BACKEND_CONFIG` - backend credentials as JSON, with a
//!   non-blank `apiKey` (required)
//! - `ECHOVERSE_INITIAL_AUTH_TOKEN` - optional bootstrap sign-in token
//! - `ECHOVERSE_NARRATOR_URL` - narration endpoint
//! - `ECHOVERSE_REQUEST_TIMEOUT_MS` - HTTP timeout (default 120000)

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::error::ClientError;

pub const DEFAULT_APP_ID: &str = "default-app-id";

pub const DEFAULT_NARRATOR_URL: &str = "http://localhost:8888/.netlify/functions/gemini-narrator";

/// Default request timeout in milliseconds (2 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

const APP_ID_VAR: &str = "ECHOVERSE_APP_ID";
const BACKEND_CONFIG_VAR: &str = "ECHOVERSE_BACKEND_CONFIG";
const INITIAL_AUTH_TOKEN_VAR: &str = "ECHOVERSE_INITIAL_AUTH_TOKEN";
const NARRATOR_URL_VAR: &str = "ECHOVERSE_NARRATOR_URL";
const REQUEST_TIMEOUT_VAR: &str = "ECHOVERSE_REQUEST_TIMEOUT_MS";

/// Credentials for the hosted identity and document backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Remaining provider settings, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub app_id: String,
    pub backend: BackendConfig,
    pub initial_auth_token: Option<String>,
    pub narrator_url: String,
    pub request_timeout_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let raw_backend = var(BACKEND_CONFIG_VAR).ok_or_else(|| {
            ClientError::Configuration(format!("{BACKEND_CONFIG_VAR} is not set"))
        })?;
        let backend = parse_backend_config(&raw_backend)?;

        let request_timeout_ms = match var(REQUEST_TIMEOUT_VAR) {
            Some(raw) => raw.parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "{REQUEST_TIMEOUT_VAR} must be a number, got {raw}"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        Ok(Self {
            app_id: var(APP_ID_VAR).unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            backend,
            initial_auth_token: var(INITIAL_AUTH_TOKEN_VAR),
            narrator_url: var(NARRATOR_URL_VAR).unwrap_or_else(|| DEFAULT_NARRATOR_URL.to_string()),
            request_timeout_ms,
        })
    }
}

fn parse_backend_config(raw: &str) -> Result<BackendConfig, ClientError> {
    let backend: BackendConfig = serde_json::from_str(raw).map_err(|e| {
        ClientError::Configuration(format!("{BACKEND_CONFIG_VAR} is not valid: {e}"))
    })?;
    if backend.api_key.trim().is_empty() {
        return Err(ClientError::Configuration(
            "backend apiKey is missing".to_string(),
        ));
    }
    Ok(backend)
}

/// Load `.env.local` and `.env` from the workspace root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
