//! Error types shared by the tool services.
//!
//! A [`ToolError`] never escapes a tool invocation as a fault: the tool surface
//! renders it into the human-readable text returned to the caller, together
//! with its [`kind`](ToolError::kind) and context fields.

use crate::services::resilient_client::ResilientClientError;
use std::fmt;
use thiserror::Error;

/// Environment variable holding the OpenWeatherMap key
pub const AQI_API_KEY_VAR: &str = "AQI_API_KEY";

/// External collaborator a tool talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Geocoding,
    Forecast,
    AirPollution,
    Model,
}

impl Upstream {
    /// Name used in upstream status errors
    pub fn api_name(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "Geocoding API",
            Upstream::Forecast => "Weather API",
            Upstream::AirPollution => "AQI API",
            Upstream::Model => "Model API",
        }
    }

    /// Short label for metrics and log fields
    pub fn label(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "geocoding",
            Upstream::Forecast => "forecast",
            Upstream::AirPollution => "air_pollution",
            Upstream::Model => "model",
        }
    }
}

/// What was being fetched, as shown in error text
impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Upstream::Geocoding => "coordinates",
            Upstream::Forecast => "weather",
            Upstream::AirPollution => "AQI",
            Upstream::Model => "safety guidelines",
        })
    }
}

/// Failure of a single tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("AQI API key is missing. Set the '{variable}' environment variable.")]
    MissingApiKey { variable: &'static str },

    #[error("Invalid tool configuration: {message}")]
    Configuration { message: String },

    #[error("Location '{location}' not found.")]
    LocationNotFound { location: String },

    #[error("Network error while fetching {upstream}: {message}")]
    Network { upstream: Upstream, message: String },

    #[error("Request timed out after {seconds}s while fetching {upstream}.")]
    Timeout { upstream: Upstream, seconds: u64 },

    #[error("{} returned an error: {status} {body}", .upstream.api_name())]
    UpstreamStatus {
        upstream: Upstream,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {upstream} response: {message}")]
    MalformedResponse { upstream: Upstream, message: String },

    #[error("Weather data not available for '{name}, {country}'.")]
    WeatherUnavailable { name: String, country: String },

    #[error("No AQI data found for '{location}'.")]
    NoAqiData { location: String },

    #[error(
        "The language model could not be initialized. Please check your model path and device setup. ({reason})"
    )]
    ModelUnavailable { reason: String },

    #[error("Failed to generate safety guidelines. The model returned no valid output.")]
    EmptyGeneration,

    #[error("Model pipeline error: {message}")]
    Generation { message: String },
}

impl ToolError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(upstream: Upstream, message: S) -> Self {
        Self::MalformedResponse {
            upstream,
            message: message.into(),
        }
    }

    /// Convert a transport failure into the error class the caller sees
    pub fn from_transport(upstream: Upstream, error: ResilientClientError) -> Self {
        match error {
            ResilientClientError::NetworkError(e) => ToolError::Network {
                upstream,
                message: e.to_string(),
            },
            ResilientClientError::Timeout(duration) => ToolError::Timeout {
                upstream,
                seconds: duration.as_secs(),
            },
            ResilientClientError::RetryableStatus { status, body } => ToolError::UpstreamStatus {
                upstream,
                status,
                body,
            },
            ResilientClientError::SerializationError(message) => ToolError::Configuration {
                message: format!("could not encode {upstream} request: {message}"),
            },
        }
    }

    /// Stable failure class reported alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::MissingApiKey { .. } | ToolError::Configuration { .. } => "configuration",
            ToolError::LocationNotFound { .. } => "resolution",
            ToolError::Network { .. } => "network",
            ToolError::Timeout { .. } => "timeout",
            ToolError::UpstreamStatus { .. } => "upstream_status",
            ToolError::MalformedResponse { .. }
            | ToolError::WeatherUnavailable { .. }
            | ToolError::NoAqiData { .. } => "data_shape",
            ToolError::ModelUnavailable { .. } => "model_unavailable",
            ToolError::EmptyGeneration | ToolError::Generation { .. } => "model_output",
        }
    }

    /// Location the failure refers to, when it names one
    pub fn location(&self) -> Option<String> {
        match self {
            ToolError::LocationNotFound { location } | ToolError::NoAqiData { location } => {
                Some(location.clone())
            }
            ToolError::WeatherUnavailable { name, country } => Some(format!("{name}, {country}")),
            _ => None,
        }
    }

    /// Upstream HTTP status, for protocol errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ToolError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
