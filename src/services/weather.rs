//! Current weather lookup via the Open-Meteo forecast API.

use crate::error::{ToolError, Upstream};
use crate::models::reports::{WeatherReport, lenient_reading};
use crate::services::fetch::{build_url, fetch_json};
use crate::services::geocoder::Geocoder;
use crate::services::resilient_client::ResilientClient;
use serde::Deserialize;
use tracing::info;

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default, deserialize_with = "lenient_reading")]
    temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    windspeed: Option<f64>,
}

/// Weather service for external API integration
#[derive(Clone)]
pub struct WeatherService {
    client: ResilientClient,
    geocoder: Geocoder,
    base_url: String,
}

impl WeatherService {
    pub fn new(client: ResilientClient, geocoder: Geocoder, base_url: impl Into<String>) -> Self {
        Self {
            client,
            geocoder,
            base_url: base_url.into(),
        }
    }

    /// Resolve `location` and fetch its current temperature and wind speed
    pub async fn current_weather(&self, location: &str) -> Result<WeatherReport, ToolError> {
        let coordinates = self.geocoder.resolve(location).await?;

        let url = build_url(
            &self.base_url,
            &[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ],
            Upstream::Forecast,
        )?;

        let forecast: ForecastResponse = fetch_json(&self.client, &url, Upstream::Forecast).await?;

        let current = forecast
            .current_weather
            .ok_or_else(|| ToolError::WeatherUnavailable {
                name: coordinates.name.clone(),
                country: coordinates.country.clone(),
            })?;

        info!(
            location,
            temperature = ?current.temperature,
            windspeed = ?current.windspeed,
            "Fetched current weather"
        );

        Ok(WeatherReport::new(
            coordinates,
            current.temperature,
            current.windspeed,
        ))
    }
}
