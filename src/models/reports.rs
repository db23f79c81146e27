//! Request-scoped report records produced by the tools.
//!
//! Every record renders itself as the fixed text block returned to tool
//! callers. Missing upstream readings render as [`NOT_AVAILABLE`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder for a reading the upstream response did not include
pub const NOT_AVAILABLE: &str = "N/A";

/// Country used when the geocoder does not report one
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Optional numeric reading as shown in reports.
struct Reading(Option<f64>);

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // Debug keeps the trailing `.0` on whole readings.
            Some(value) => write!(f, "{value:?}"),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Decode an optional upstream reading field by field
///
/// Numbers and numeric strings are kept; `null` or any other shape becomes
/// `None` instead of failing the whole record.
pub(crate) fn lenient_reading<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|reading| reading.is_finite()))
}

/// Resolved position of a free-text location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Place name as reported by the geocoder
    pub name: String,
    pub country: String,
}

/// Current weather at a resolved location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Kilometres per hour
    pub windspeed: Option<f64>,
}

impl WeatherReport {
    pub fn new(coordinates: Coordinates, temperature: Option<f64>, windspeed: Option<f64>) -> Self {
        Self {
            name: coordinates.name,
            country: coordinates.country,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            temperature,
            windspeed,
        }
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Location: {}, {}", self.name, self.country)?;
        writeln!(
            f,
            "- Coordinates: {}, {}",
            Reading(Some(self.latitude)),
            Reading(Some(self.longitude))
        )?;
        writeln!(f, "- Temperature: {}°C", Reading(self.temperature))?;
        write!(f, "- Wind Speed: {} km/h", Reading(self.windspeed))
    }
}

/// OpenWeatherMap air quality bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    /// Map the upstream 1-5 ordinal onto its band
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pollutant concentrations in μg/m3
///
/// Deserializes directly from the OpenWeatherMap `components` object. Each
/// concentration is read on its own, so one unusable value leaves the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    #[serde(default, deserialize_with = "lenient_reading")]
    pub co: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub no: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub no2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub o3: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub so2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub pm2_5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub pm10: Option<f64>,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub nh3: Option<f64>,
}

impl Pollutants {
    fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("CO", self.co),
            ("NO", self.no),
            ("NO2", self.no2),
            ("O3", self.o3),
            ("SO2", self.so2),
            ("PM2.5", self.pm2_5),
            ("PM10", self.pm10),
            ("NH3", self.nh3),
        ]
    }
}

/// Air quality at a resolved location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReport {
    /// Location as the caller typed it
    pub location: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: i64,
    pub level: AqiLevel,
    pub pollutants: Pollutants,
}

impl AqiReport {
    pub fn new(location: &str, coordinates: Coordinates, aqi: i64, pollutants: Pollutants) -> Self {
        Self {
            location: location.to_string(),
            country: coordinates.country,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            aqi,
            level: AqiLevel::from_index(aqi),
            pollutants,
        }
    }
}

impl fmt::Display for AqiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Location: {}, {}", self.location, self.country)?;
        writeln!(
            f,
            "- Coordinates: {}, {}",
            Reading(Some(self.latitude)),
            Reading(Some(self.longitude))
        )?;
        writeln!(f, "- AQI Level: {} ({})", self.aqi, self.level)?;
        writeln!(f)?;
        write!(f, "Pollutants (μg/m3):")?;
        for (name, value) in self.pollutants.rows() {
            write!(f, "\n- {name}: {}", Reading(value))?;
        }
        Ok(())
    }
}

/// Generated outdoor safety advice, returned as the model wrote it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub text: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
