//! HTTP server configuration for the tool host.

use super::{env_or, env_string};
use crate::models::tools::ToolName;
use tracing::warn;

/// Bind address, enabled tools and feature switches for the tool server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tools exposed by this process
    pub tools: Vec<ToolName>,
    /// Whether `/api/metrics` serves the Prometheus registry
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            tools: ToolName::ALL.to_vec(),
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env_or("SERVER_HOST", defaults.host),
            port: env_or("SERVER_PORT", defaults.port),
            tools: env_string("TOOLS_ENABLED")
                .map(|list| parse_tool_list(&list))
                .unwrap_or(defaults.tools),
            metrics_enabled: env_or("METRICS_ENABLED", defaults.metrics_enabled),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_enabled(&self, tool: ToolName) -> bool {
        self.tools.contains(&tool)
    }
}

/// Parse a comma-separated tool list, skipping unknown names
pub fn parse_tool_list(list: &str) -> Vec<ToolName> {
    let mut tools = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name.parse::<ToolName>() {
            Ok(tool) if !tools.contains(&tool) => tools.push(tool),
            Ok(_) => {}
            Err(_) => warn!(tool = name, "Ignoring unknown tool in TOOLS_ENABLED"),
        }
    }
    tools
}
