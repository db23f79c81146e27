//! Air quality lookup via the OpenWeatherMap air pollution API.

use crate::error::{AQI_API_KEY_VAR, ToolError, Upstream};
use crate::models::reports::{AqiReport, Pollutants};
use crate::services::fetch::{build_url, fetch_json};
use crate::services::geocoder::Geocoder;
use crate::services::resilient_client::ResilientClient;
use serde::Deserialize;
use tracing::info;

/// OpenWeatherMap air pollution response
#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Option<Vec<AirPollutionEntry>>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: Option<AirPollutionIndex>,
    components: Option<Pollutants>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionIndex {
    aqi: Option<i64>,
}

impl AirPollutionEntry {
    fn aqi(&self) -> Option<i64> {
        self.main.as_ref().and_then(|main| main.aqi)
    }
}

/// AQI service for external API integration
#[derive(Clone)]
pub struct AirQualityService {
    client: ResilientClient,
    geocoder: Geocoder,
    base_url: String,
    api_key: Option<String>,
}

impl AirQualityService {
    pub fn new(
        client: ResilientClient,
        geocoder: Geocoder,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            geocoder,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, ToolError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ToolError::MissingApiKey {
                variable: AQI_API_KEY_VAR,
            })
    }

    /// Resolve `location` and fetch its AQI ordinal and pollutant readings
    pub async fn air_quality(&self, location: &str) -> Result<AqiReport, ToolError> {
        let api_key = self.api_key()?;
        let coordinates = self.geocoder.resolve(location).await?;

        let url = build_url(
            &self.base_url,
            &[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", api_key.to_string()),
            ],
            Upstream::AirPollution,
        )?;

        let response: AirPollutionResponse =
            fetch_json(&self.client, &url, Upstream::AirPollution).await?;

        let entry = response
            .list
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| ToolError::NoAqiData {
                location: location.to_string(),
            })?;

        let aqi = entry.aqi().ok_or_else(|| {
            ToolError::malformed(Upstream::AirPollution, "missing field 'list[0].main.aqi'")
        })?;

        info!(location, aqi, "Fetched air quality");

        Ok(AqiReport::new(
            location,
            coordinates,
            aqi,
            entry.components.unwrap_or_default(),
        ))
    }
}
