//! The tool surface: validates arguments, dispatches to the enabled
//! services and renders every outcome as a [`ToolCallResponse`].

use crate::config::{AdvisoryConfig, ToolsConfig};
use crate::models::{
    LocationArgs, SafetyGuidelinesArgs, ToolCallResponse, ToolDescriptor, ToolListResponse,
    ToolName,
};
use crate::services::advisory::{AdvisoryGenerator, ModelState};
use crate::services::air_quality::AirQualityService;
use crate::services::geocoder::Geocoder;
use crate::services::resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientMetrics,
};
use crate::services::weather::WeatherService;
use thiserror::Error;
use tracing::{info, warn};

/// Rejection of a tool call before any tool logic runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Tool '{0}' is not enabled on this server")]
    NotEnabled(ToolName),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// The set of tools served by this process
#[derive(Clone, Default)]
pub struct ToolBox {
    weather: Option<WeatherService>,
    air_quality: Option<AirQualityService>,
    advisory: Option<AdvisoryGenerator>,
}

impl ToolBox {
    /// Build the services for `enabled` tools from configuration
    ///
    /// The advisory model is only initialized when `safety_guidelines` is enabled.
    pub async fn from_config(
        enabled: &[ToolName],
        tools: &ToolsConfig,
        client_config: ResilientClientConfig,
        advisory: &AdvisoryConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = ResilientClient::new(client_config, metrics.clone())?;
        let geocoder = Geocoder::new(client.clone(), tools.geocode_api_url.clone());
        let mut toolbox = Self::default();

        if enabled.contains(&ToolName::GetWeather) {
            toolbox = toolbox.with_weather(WeatherService::new(
                client.clone(),
                geocoder.clone(),
                tools.weather_api_url.clone(),
            ));
        }
        if enabled.contains(&ToolName::GetAqi) {
            toolbox = toolbox.with_air_quality(AirQualityService::new(
                client.clone(),
                geocoder.clone(),
                tools.air_pollution_api_url.clone(),
                tools.aqi_api_key.clone(),
            ));
        }
        if enabled.contains(&ToolName::SafetyGuidelines) {
            toolbox = toolbox
                .with_advisory(AdvisoryGenerator::initialize(advisory, metrics).await);
        }

        Ok(toolbox)
    }

    pub fn with_weather(mut self, service: WeatherService) -> Self {
        self.weather = Some(service);
        self
    }

    pub fn with_air_quality(mut self, service: AirQualityService) -> Self {
        self.air_quality = Some(service);
        self
    }

    pub fn with_advisory(mut self, generator: AdvisoryGenerator) -> Self {
        self.advisory = Some(generator);
        self
    }

    pub fn is_enabled(&self, tool: ToolName) -> bool {
        match tool {
            ToolName::GetWeather => self.weather.is_some(),
            ToolName::GetAqi => self.air_quality.is_some(),
            ToolName::SafetyGuidelines => self.advisory.is_some(),
        }
    }

    pub fn enabled_tools(&self) -> Vec<ToolName> {
        ToolName::ALL
            .into_iter()
            .filter(|tool| self.is_enabled(*tool))
            .collect()
    }

    /// Discovery listing of the enabled tools
    pub fn describe(&self) -> ToolListResponse {
        ToolListResponse {
            tools: self
                .enabled_tools()
                .into_iter()
                .map(ToolDescriptor::from)
                .collect(),
        }
    }

    /// Advisory model state, when the advisory tool is served
    pub fn model_state(&self) -> Option<&ModelState> {
        self.advisory.as_ref().map(AdvisoryGenerator::state)
    }

    pub async fn get_weather(
        &self,
        args: &LocationArgs,
    ) -> Result<ToolCallResponse, ToolCallError> {
        let tool = ToolName::GetWeather;
        let service = self
            .weather
            .as_ref()
            .ok_or(ToolCallError::NotEnabled(tool))?;
        let location = required_location(args)?;

        let result = service.current_weather(location).await;
        Ok(render(tool, location, result))
    }

    pub async fn get_aqi(&self, args: &LocationArgs) -> Result<ToolCallResponse, ToolCallError> {
        let tool = ToolName::GetAqi;
        let service = self
            .air_quality
            .as_ref()
            .ok_or(ToolCallError::NotEnabled(tool))?;
        let location = required_location(args)?;

        let result = service.air_quality(location).await;
        Ok(render(tool, location, result))
    }

    pub async fn safety_guidelines(
        &self,
        args: &SafetyGuidelinesArgs,
    ) -> Result<ToolCallResponse, ToolCallError> {
        let tool = ToolName::SafetyGuidelines;
        let generator = self
            .advisory
            .as_ref()
            .ok_or(ToolCallError::NotEnabled(tool))?;

        let result = generator
            .safety_guidelines(&args.weather_report, &args.aqi_report)
            .await;
        Ok(render(tool, "", result))
    }
}

fn required_location(args: &LocationArgs) -> Result<&str, ToolCallError> {
    let location = args.location.trim();
    if location.is_empty() {
        return Err(ToolCallError::InvalidArguments(
            "'location' must not be empty".to_string(),
        ));
    }
    Ok(location)
}

fn render<T: std::fmt::Display>(
    tool: ToolName,
    location: &str,
    result: Result<T, crate::error::ToolError>,
) -> ToolCallResponse {
    match &result {
        Ok(_) => info!(tool = tool.as_str(), location, "Tool call succeeded"),
        Err(e) => warn!(
            tool = tool.as_str(),
            location,
            kind = e.kind(),
            error = %e,
            "Tool call failed"
        ),
    }
    ToolCallResponse::from_result(tool, &result)
}
