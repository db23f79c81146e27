//! Free-text location resolution via the Open-Meteo geocoding API.

use crate::error::{ToolError, Upstream};
use crate::models::reports::{Coordinates, UNKNOWN_COUNTRY};
use crate::services::fetch::{build_url, fetch_json};
use crate::services::resilient_client::ResilientClient;
use serde::Deserialize;
use tracing::{debug, info};

/// Geocoding search response
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

/// A single geocoding match; every field is optional upstream
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    name: Option<String>,
    country: Option<String>,
}

impl GeocodingResult {
    fn into_coordinates(self) -> Result<Coordinates, ToolError> {
        let missing = |field: &str| {
            ToolError::malformed(Upstream::Geocoding, format!("missing field '{field}'"))
        };

        Ok(Coordinates {
            latitude: self.latitude.ok_or_else(|| missing("latitude"))?,
            longitude: self.longitude.ok_or_else(|| missing("longitude"))?,
            name: self.name.ok_or_else(|| missing("name"))?,
            country: self
                .country
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        })
    }
}

/// Resolves place names to coordinates
#[derive(Clone)]
pub struct Geocoder {
    client: ResilientClient,
    base_url: String,
}

impl Geocoder {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Resolve `location` to the provider's first match
    pub async fn resolve(&self, location: &str) -> Result<Coordinates, ToolError> {
        let url = build_url(
            &self.base_url,
            &[
                ("name", location.to_string()),
                ("count", "1".to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ],
            Upstream::Geocoding,
        )?;

        let response: GeocodingResponse =
            fetch_json(&self.client, &url, Upstream::Geocoding).await?;

        let first = response
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| {
                info!(location, "No geocoding match");
                ToolError::LocationNotFound {
                    location: location.to_string(),
                }
            })?;

        let coordinates = first.into_coordinates()?;
        debug!(
            location,
            name = %coordinates.name,
            country = %coordinates.country,
            "Resolved location"
        );
        Ok(coordinates)
    }
}
