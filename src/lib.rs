//! AQI Advisor - weather, air quality and outdoor safety tools
//!
//! Three independent tools are served over HTTP, each callable on its own:
//! - `get_weather` resolves a place name and reports current temperature and wind
//! - `get_aqi` resolves a place name and reports the air quality index and pollutants
//! - `safety_guidelines` asks a language model for outdoor advice given both reports
//!
//! The `aqi-agent` binary chains the three for a location from an interactive prompt.
//!
//! ## Architecture
//!
//! - `models/` - Report records, tool catalogue and request/response bodies
//! - `services/` - Upstream clients, the advisory model and the tool surface
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - Request IDs, metrics and MCP context detection
//! - `client/` - Remote tool client and the REPL
//! - `config/` - Environment-driven configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use aqi_advisor::{AppMetrics, AppState, ServerConfig, ToolBox, create_app};
//! use actix_web::HttpServer;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState {
//!         tools: ToolBox::default(),
//!         server: ServerConfig::default(),
//!         metrics: AppMetrics::new().map_err(std::io::Error::other)?,
//!     };
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use client::{AgentError, AqiAgent, ToolClient, run_repl};
pub use config::{AdvisoryConfig, AgentConfig, ServerConfig, ToolsConfig};
pub use error::{ToolError, Upstream};
pub use handlers::{
    AppState, create_app, create_openapi_spec, get_aqi, get_metrics, get_weather, health,
    list_tools, safety_guidelines, version,
};
pub use middleware::{
    McpMiddleware, MetricsMiddleware, RequestIdMiddleware, extract_mcp_context,
    respond_with_context,
};
pub use models::{
    AqiLevel, AqiReport, ContextMetadata, Coordinates, HealthResponse, LocationArgs, McpResponse,
    SafetyGuidelinesArgs, ToolCallResponse, ToolListResponse, ToolName, VersionResponse,
    WeatherReport,
};
pub use services::{
    AdvisoryGenerator, AirQualityService, AppMetrics, Geocoder, ModelState, ResilientClient,
    ResilientClientConfig, ResilientClientError, ResilientClientMetrics, TextGenerator, ToolBox,
    ToolCallError, WeatherService,
};
