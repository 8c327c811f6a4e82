//! Environment-driven configuration for both binaries.

use std::time::Duration;

use crate::client::ClientError;
use crate::options::TransportOptions;
use crate::transit::{TransitClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, USER_AGENT};

pub const API_KEY_VARS: &[&str] = &["GROQ_API_KEY", "GROQ_KEY"];
pub const TPL_BASE_URL_VAR: &str = "TPL_BASE_URL";
pub const TPL_TIMEOUT_VAR: &str = "TPL_TIMEOUT_SECS";
pub const CHAT_TIMEOUT_VAR: &str = "CHAT_TIMEOUT_SECS";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env: {}", e),
    }
}

/// The chat API key. Missing credentials are fatal.
pub fn api_key() -> Result<String, ClientError> {
    api_key_from(|var| std::env::var(var).ok())
}

pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ClientError> {
    API_KEY_VARS
        .iter()
        .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            ClientError::Config(format!("Missing {} in environment or .env", API_KEY_VARS[0]))
        })
}

/// Transport for chat completions, with a per-request ceiling.
pub fn chat_transport() -> Result<TransportOptions, ClientError> {
    chat_transport_from(|var| std::env::var(var).ok())
}

pub fn chat_transport_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TransportOptions, ClientError> {
    let timeout = match lookup(CHAT_TIMEOUT_VAR) {
        Some(secs) => parse_secs(CHAT_TIMEOUT_VAR, &secs)?,
        None => DEFAULT_CHAT_TIMEOUT,
    };
    Ok(TransportOptions::new().with_timeout(timeout))
}

fn parse_secs(var: &str, value: &str) -> Result<Duration, ClientError> {
    value.trim().parse().map(Duration::from_secs).map_err(|_| {
        ClientError::Config(format!("{} must be a whole number of seconds, got {:?}", var, value))
    })
}

/// Transit endpoint settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransitConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(url) = lookup(TPL_BASE_URL_VAR).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }

        if let Some(secs) = lookup(TPL_TIMEOUT_VAR) {
            config.timeout = parse_secs(TPL_TIMEOUT_VAR, &secs)?;
        }

        Ok(config)
    }

    pub fn client(&self) -> TransitClient {
        TransitClient::with_options(
            self.base_url.clone(),
            TransportOptions::new()
                .with_timeout(self.timeout)
                .with_user_agent(USER_AGENT),
        )
    }
}
