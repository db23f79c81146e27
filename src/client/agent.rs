//! Chains the three tools for one location.

use crate::client::tool_client::{AgentError, ToolClient};
use crate::config::AgentConfig;
use crate::models::{LocationArgs, SafetyGuidelinesArgs, ToolCallResponse, ToolName};
use crate::services::resilient_client::{ResilientClient, ResilientClientConfig};

/// Client for the weather, AQI and advisory tool servers
pub struct AqiAgent {
    weather: ToolClient,
    aqi: ToolClient,
    advisory: ToolClient,
}

impl AqiAgent {
    /// Build an agent whose tool calls are bounded by `config.timeout_seconds`
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client_config = ResilientClientConfig {
            request_timeout_seconds: config.timeout_seconds,
            ..ResilientClientConfig::default()
        };
        let client = ResilientClient::new(client_config, None)
            .map_err(|e| AgentError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            weather: ToolClient::new(client.clone(), &config.weather_tool_url, &config.client_id)?,
            aqi: ToolClient::new(client.clone(), &config.aqi_tool_url, &config.client_id)?,
            advisory: ToolClient::new(client, &config.advisory_tool_url, &config.client_id)?,
        })
    }

    pub async fn get_weather(&self, location: &str) -> Result<ToolCallResponse, AgentError> {
        let args = LocationArgs {
            location: location.to_string(),
        };
        self.weather.call(ToolName::GetWeather, &args).await
    }

    pub async fn get_aqi_report(&self, location: &str) -> Result<ToolCallResponse, AgentError> {
        let args = LocationArgs {
            location: location.to_string(),
        };
        self.aqi.call(ToolName::GetAqi, &args).await
    }

    pub async fn get_health_recommendations(
        &self,
        weather_report: &str,
        aqi_report: &str,
    ) -> Result<ToolCallResponse, AgentError> {
        let args = SafetyGuidelinesArgs {
            weather_report: weather_report.to_string(),
            aqi_report: aqi_report.to_string(),
        };
        self.advisory.call(ToolName::SafetyGuidelines, &args).await
    }
}
