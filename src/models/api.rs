//! API request and response models.

use crate::error::ToolError;
use crate::models::tools::ToolName;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    /// Tools served by this process
    pub tools: Vec<String>,
    /// Advisory model state (ready, unavailable, disabled) when the advisory tool is served
    pub model: Option<String>,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Arguments of `get_weather` and `get_aqi`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct LocationArgs {
    /// Free-text place name (e.g., "Paris")
    pub location: String,
}

/// Arguments of `safety_guidelines`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct SafetyGuidelinesArgs {
    /// Text returned by `get_weather`
    pub weather_report: String,
    /// Text returned by `get_aqi`
    pub aqi_report: String,
}

/// One argument of a tool
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Discovery entry for an enabled tool
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl From<ToolName> for ToolDescriptor {
    fn from(tool: ToolName) -> Self {
        Self {
            name: tool.as_str().to_string(),
            description: tool.description().to_string(),
            parameters: tool
                .parameters()
                .iter()
                .map(|(name, description)| ToolParameter {
                    name: name.to_string(),
                    description: description.to_string(),
                    required: true,
                })
                .collect(),
        }
    }
}

/// Response model for `GET /api/tools`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// A text block in a tool result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct TextContent {
    /// Always "text"
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Structured detail of a failed tool call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ToolErrorBody {
    /// Failure class (configuration, resolution, network, timeout, ...)
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Upstream HTTP status for protocol errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&ToolError> for ToolErrorBody {
    fn from(error: &ToolError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            location: error.location(),
            status: error.status(),
        }
    }
}

/// Result of a tool invocation
///
/// Tool failures are reported in-band: `is_error` is set and the content
/// carries the human-readable message.
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ToolCallResponse {
    pub tool: String,
    pub content: Vec<TextContent>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorBody>,
}

impl ToolCallResponse {
    pub fn success<T: Display>(tool: ToolName, value: &T) -> Self {
        Self {
            tool: tool.as_str().to_string(),
            content: vec![TextContent::text(value.to_string())],
            is_error: false,
            error: None,
        }
    }

    pub fn failure(tool: ToolName, error: &ToolError) -> Self {
        Self {
            tool: tool.as_str().to_string(),
            content: vec![TextContent::text(error.to_string())],
            is_error: true,
            error: Some(ToolErrorBody::from(error)),
        }
    }

    /// Render a tool outcome as the response returned to callers
    pub fn from_result<T: Display>(tool: ToolName, result: &Result<T, ToolError>) -> Self {
        match result {
            Ok(value) => Self::success(tool, value),
            Err(error) => Self::failure(tool, error),
        }
    }

    /// All text blocks joined with newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
