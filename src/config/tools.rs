//! Upstream endpoints and credentials for the weather and AQI tools.

use super::{env_or, env_string};
use crate::error::AQI_API_KEY_VAR;

pub const DEFAULT_GEOCODE_API_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_AIR_POLLUTION_API_URL: &str =
    "http://api.openweathermap.org/data/2.5/air_pollution";

/// Configuration shared by the data-fetching tools
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Open-Meteo geocoding search endpoint
    pub geocode_api_url: String,
    /// Open-Meteo forecast endpoint
    pub weather_api_url: String,
    /// OpenWeatherMap air pollution endpoint
    pub air_pollution_api_url: String,
    /// OpenWeatherMap key; `None` short-circuits the AQI tool
    pub aqi_api_key: Option<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            geocode_api_url: DEFAULT_GEOCODE_API_URL.to_string(),
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            air_pollution_api_url: DEFAULT_AIR_POLLUTION_API_URL.to_string(),
            aqi_api_key: None,
        }
    }
}

impl ToolsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            geocode_api_url: env_or("GEOCODE_API_URL", defaults.geocode_api_url),
            weather_api_url: env_or("WEATHER_API_URL", defaults.weather_api_url),
            air_pollution_api_url: env_or(
                "AIR_POLLUTION_API_URL",
                defaults.air_pollution_api_url,
            ),
            aqi_api_key: env_string(AQI_API_KEY_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::ENV_MUTEX;
    use std::env;

    #[test]
    fn test_tools_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("GEOCODE_API_URL", "http://localhost:9000/search");
            env::set_var(AQI_API_KEY_VAR, "  key-123  ");
            env::remove_var("WEATHER_API_URL");
        }

        let config = ToolsConfig::from_env();
        assert_eq!(config.geocode_api_url, "http://localhost:9000/search");
        assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
        assert_eq!(config.aqi_api_key.as_deref(), Some("key-123"));

        unsafe {
            env::remove_var("GEOCODE_API_URL");
            env::remove_var(AQI_API_KEY_VAR);
        }
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var(AQI_API_KEY_VAR, "   ");
        }

        assert!(ToolsConfig::from_env().aqi_api_key.is_none());

        unsafe {
            env::remove_var(AQI_API_KEY_VAR);
        }
    }
}
