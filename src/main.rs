use actix_web::HttpServer;
use aqi_advisor::{
    AdvisoryConfig, AppMetrics, AppState, ResilientClientConfig, ServerConfig, ToolBox,
    ToolName, ToolsConfig, create_app,
    telemetry::{LogFormat, LogTarget, init_tracing},
};
use std::io;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = init_tracing(LogFormat::from_env(), LogTarget::Stdout, "info") {
        eprintln!("Failed to initialize logging: {e}");
    }

    let server = ServerConfig::from_env();
    let tools_config = ToolsConfig::from_env();
    let metrics = AppMetrics::new().map_err(io::Error::other)?;

    if server.tools.is_empty() {
        warn!("TOOLS_ENABLED names no known tool; only health endpoints will answer");
    }
    if server.is_enabled(ToolName::GetAqi) && tools_config.aqi_api_key.is_none() {
        warn!("AQI_API_KEY is not set; get_aqi will report a configuration error");
    }

    let upstream_metrics = server.metrics_enabled.then(|| metrics.upstream.clone());
    let tools = ToolBox::from_config(
        &server.tools,
        &tools_config,
        ResilientClientConfig::from_env(),
        &AdvisoryConfig::from_env(),
        upstream_metrics,
    )
    .await
    .map_err(io::Error::other)?;

    let address = server.bind_address();
    info!(
        %address,
        tools = ?tools.enabled_tools().iter().map(ToolName::as_str).collect::<Vec<_>>(),
        model = tools.model_state().map(|state| state.label()),
        "Tool server starting"
    );

    let state = AppState {
        tools,
        server,
        metrics,
    };

    HttpServer::new(move || create_app(state.clone()))
        .bind(address)?
        .run()
        .await
}
