//! Service layer: upstream clients, the advisory model and the tool surface.

pub mod advisory;
pub mod air_quality;
pub(crate) mod fetch;
pub mod geocoder;
pub mod metrics;
pub mod resilient_client;
pub mod tools;
pub mod weather;

pub use advisory::{
    AdvisoryGenerator, GenerationParams, MockGenerator, ModelState, OpenAiCompatibleGenerator,
    TextGenerator,
};
pub use air_quality::AirQualityService;
pub use geocoder::Geocoder;
pub use metrics::AppMetrics;
pub use resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
    RetryConfig,
};
pub use tools::{ToolBox, ToolCallError};
pub use weather::WeatherService;
