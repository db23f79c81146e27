//! OpenAPI specification generation and app factory.

use crate::{
    config::ServerConfig,
    handlers::{get_aqi, get_metrics, get_weather, health, list_tools, safety_guidelines, version},
    middleware::{McpMiddleware, MetricsMiddleware, RequestIdMiddleware},
    services::{AppMetrics, ToolBox},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Shared state handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub tools: ToolBox,
    pub server: ServerConfig,
    pub metrics: AppMetrics,
}

/// Creates the OpenAPI specification for the tool API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "AQI Advisor Tools".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Weather, air quality and outdoor safety advisory tools.\n\n\
                ## Tools\n\
                - `get_weather` with `{\"location\": \"Paris\"}`\n\
                - `get_aqi` with `{\"location\": \"Paris\"}`\n\
                - `safety_guidelines` with `{\"weather_report\": \"...\", \"aqi_report\": \"...\"}`\n\
                \n\
                Tool failures are returned in-band with `is_error: true` and a human-readable message.\n\
                \n\
                ## Model Context Protocol (MCP) Support\n\
                Requests carrying `X-MCP-Context`, `X-Client` or `X-Trace-ID` receive\n\
                `{\"data\": <response>, \"context\": {trace_id, model_version, timestamp, correlation_id, client_id}}`.\n\
                Other clients receive the bare response. `X-Correlation-ID` is copied into the context."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with every endpoint and middleware
///
/// Used by the server binary and by integration tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap(McpMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.tools))
        .app_data(web::Data::new(state.server))
        .app_data(web::Data::new(state.metrics))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/api/tools").route(web::get().to(list_tools)))
        .service(web::resource("/api/tools/get_weather").route(web::post().to(get_weather)))
        .service(web::resource("/api/tools/get_aqi").route(web::post().to(get_aqi)))
        .service(
            web::resource("/api/tools/safety_guidelines").route(web::post().to(safety_guidelines)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}
