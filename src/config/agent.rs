//! Configuration for the orchestrating REPL client.

use super::{env_or, env_string};

pub const DEFAULT_TOOL_URL: &str = "http://127.0.0.1:8080";

/// Where the client finds each tool and how long it waits for one
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base URL of the process hosting `get_weather`
    pub weather_tool_url: String,
    /// Base URL of the process hosting `get_aqi`
    pub aqi_tool_url: String,
    /// Base URL of the process hosting `safety_guidelines`
    pub advisory_tool_url: String,
    /// Per tool call timeout in seconds; generation can be slow
    pub timeout_seconds: u64,
    /// Sent as `X-Client` on every tool call
    pub client_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            weather_tool_url: DEFAULT_TOOL_URL.to_string(),
            aqi_tool_url: DEFAULT_TOOL_URL.to_string(),
            advisory_tool_url: DEFAULT_TOOL_URL.to_string(),
            timeout_seconds: 180,
            client_id: "aqi-agent".to_string(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            weather_tool_url: env_or("WEATHER_TOOL_URL", defaults.weather_tool_url),
            aqi_tool_url: env_or("AQI_TOOL_URL", defaults.aqi_tool_url),
            advisory_tool_url: env_or("ADVISORY_TOOL_URL", defaults.advisory_tool_url),
            timeout_seconds: env_or("AGENT_REQUEST_TIMEOUT_SECONDS", defaults.timeout_seconds),
            client_id: env_string("AGENT_CLIENT_ID").unwrap_or(defaults.client_id),
        }
    }

    /// Point every tool at a single host
    pub fn single_host(base_url: &str) -> Self {
        Self {
            weather_tool_url: base_url.to_string(),
            aqi_tool_url: base_url.to_string(),
            advisory_tool_url: base_url.to_string(),
            ..Self::default()
        }
    }
}
