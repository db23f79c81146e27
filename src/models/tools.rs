//! Catalogue of the tools this crate can serve.

use std::fmt;
use std::str::FromStr;

/// A named tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetWeather,
    GetAqi,
    SafetyGuidelines,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [
        ToolName::GetWeather,
        ToolName::GetAqi,
        ToolName::SafetyGuidelines,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetWeather => "get_weather",
            ToolName::GetAqi => "get_aqi",
            ToolName::SafetyGuidelines => "safety_guidelines",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::GetWeather => "Get current weather for a location.",
            ToolName::GetAqi => "Get Air Quality Index (AQI) for a location.",
            ToolName::SafetyGuidelines => {
                "Generate outdoor safety guidelines from weather and AQI reports."
            }
        }
    }

    /// Argument names and their descriptions, in call order
    pub fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ToolName::GetWeather | ToolName::GetAqi => {
                &[("location", "Free-text place name, e.g. \"Paris\"")]
            }
            ToolName::SafetyGuidelines => &[
                ("weather_report", "Text returned by get_weather"),
                ("aqi_report", "Text returned by get_aqi"),
            ],
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool '{}'", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s.trim())
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}
