//! Configuration for the advisory text generator.

use super::{env_or, env_string};

pub const DEFAULT_ADVISORY_BASE_URL: &str = "http://127.0.0.1:11434/v1";
pub const DEFAULT_ADVISORY_MODEL: &str = "Qwen/Qwen2.5-3B-Instruct";

/// Backend selection and connection settings for safety guideline generation
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// Generator backend (openai, mock, disabled)
    pub provider: String,
    /// Base URL of an OpenAI-compatible server
    pub base_url: String,
    /// Model identifier passed to the backend
    pub model: String,
    /// Bearer token for the backend, if it needs one
    pub api_key: Option<String>,
    /// Timeout for a generation request in seconds
    pub timeout_seconds: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: DEFAULT_ADVISORY_BASE_URL.to_string(),
            model: DEFAULT_ADVISORY_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 120,
        }
    }
}

impl AdvisoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            provider: env_string("ADVISORY_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.provider),
            base_url: env_or("ADVISORY_BASE_URL", defaults.base_url),
            model: env_or("ADVISORY_MODEL", defaults.model),
            api_key: env_string("ADVISORY_API_KEY"),
            timeout_seconds: env_or("ADVISORY_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }

    /// A configuration that uses the built-in deterministic generator
    pub fn mock() -> Self {
        Self {
            provider: "mock".to_string(),
            ..Self::default()
        }
    }
}
