//! Process configuration (environment variables, overridable from the CLI).

use thiserror::Error;

use cmi_extraction::{BatchPolicy, GeminiConfig};
use cmi_observability::LogFormat;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub listen_addr: String,
    pub batch_policy: BatchPolicy,
    /// Upper bound on one multipart upload request.
    pub max_upload_bytes: usize,
    /// `None` unless CMI_LOG_FORMAT is set; each command picks its own default.
    pub log_format: Option<LogFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            batch_policy: BatchPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            log_format: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            config.gemini.api_key = key.trim().to_string();
        }
        if let Some(model) = get("CMI_GEMINI_MODEL") {
            config.gemini.model = model.trim().to_string();
        }
        if let Some(url) = get("CMI_GEMINI_BASE_URL") {
            config.gemini.base_url = url.trim().to_string();
        }
        if let Some(addr) = get("CMI_LISTEN_ADDR") {
            config.listen_addr = addr.trim().to_string();
        }
        if let Some(policy) = get("CMI_BATCH_POLICY") {
            config.batch_policy = policy.parse().map_err(|e: cmi_core::DomainError| {
                ConfigError::Invalid {
                    key: "CMI_BATCH_POLICY",
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(mb) = get("CMI_MAX_UPLOAD_MB") {
            let mb: usize = mb.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "CMI_MAX_UPLOAD_MB",
                message: format!("expected a whole number of megabytes, got '{mb}'"),
            })?;
            config.max_upload_bytes = mb.saturating_mul(1024 * 1024);
        }
        if let Some(format) = get("CMI_LOG_FORMAT") {
            let format = format.parse::<LogFormat>().map_err(|message| ConfigError::Invalid {
                key: "CMI_LOG_FORMAT",
                message,
            })?;
            config.log_format = Some(format);
        }

        Ok(config)
    }

    pub fn has_credential(&self) -> bool {
        !self.gemini.api_key.is_empty()
    }
}
