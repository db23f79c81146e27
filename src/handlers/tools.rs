//! Tool discovery and invocation handlers.
//!
//! Tool failures come back in-band with HTTP 200 and `is_error` set. Only
//! calls that never reach a tool are rejected: 404 for a tool this process
//! does not serve, 400 for invalid arguments.

use crate::{
    middleware::respond_with_context,
    models::{
        LocationArgs, McpResponse, SafetyGuidelinesArgs, ToolCallResponse, ToolListResponse,
        ToolName,
    },
    services::{AppMetrics, ToolBox, ToolCallError},
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

fn toolbox(req: &HttpRequest) -> Result<&web::Data<ToolBox>, Error> {
    req.app_data::<web::Data<ToolBox>>()
        .ok_or_else(|| actix_web::error::ErrorServiceUnavailable("No tools configured"))
}

/// Count the outcome and turn a rejection into its HTTP error
fn finish(
    req: &HttpRequest,
    tool: ToolName,
    outcome: Result<ToolCallResponse, ToolCallError>,
) -> Result<web::Json<McpResponse<ToolCallResponse>>, Error> {
    let label = match &outcome {
        Ok(response) if response.is_error => "error",
        Ok(_) => "success",
        Err(_) => "rejected",
    };
    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_tool_call(tool.as_str(), label);
    }

    match outcome {
        Ok(response) => Ok(web::Json(respond_with_context(req, response))),
        Err(e @ ToolCallError::NotEnabled(_)) => {
            tracing::debug!(tool = tool.as_str(), "Call to disabled tool");
            Err(actix_web::error::ErrorNotFound(e.to_string()))
        }
        Err(e @ ToolCallError::InvalidArguments(_)) => {
            tracing::debug!(tool = tool.as_str(), error = %e, "Rejected tool arguments");
            Err(actix_web::error::ErrorBadRequest(e.to_string()))
        }
    }
}

/// List enabled tools
#[api_v2_operation(
    summary = "Tool Discovery",
    description = "Lists the tools served by this process with their parameters.",
    tags("Tools")
)]
pub async fn list_tools(req: HttpRequest) -> Result<web::Json<McpResponse<ToolListResponse>>, Error> {
    let listing = toolbox(&req)?.describe();
    Ok(web::Json(respond_with_context(&req, listing)))
}

/// Current weather for a location
#[api_v2_operation(
    summary = "get_weather",
    description = "Resolves a free-text location and returns its current temperature and wind speed as text.",
    tags("Tools")
)]
pub async fn get_weather(req: HttpRequest, args: web::Json<LocationArgs>) -> Result<web::Json<McpResponse<ToolCallResponse>>, Error> {
    let outcome = toolbox(&req)?.get_weather(&args).await;
    finish(&req, ToolName::GetWeather, outcome)
}

/// Air quality for a location
#[api_v2_operation(
    summary = "get_aqi",
    description = "Resolves a free-text location and returns its air quality index and pollutant concentrations as text.",
    tags("Tools")
)]
pub async fn get_aqi(req: HttpRequest, args: web::Json<LocationArgs>) -> Result<web::Json<McpResponse<ToolCallResponse>>, Error> {
    let outcome = toolbox(&req)?.get_aqi(&args).await;
    finish(&req, ToolName::GetAqi, outcome)
}

/// Outdoor safety advice from a weather and an AQI report
#[api_v2_operation(
    summary = "safety_guidelines",
    description = "Generates outdoor safety and health guidelines from the texts returned by get_weather and get_aqi.",
    tags("Tools")
)]
pub async fn safety_guidelines(
    req: HttpRequest,
    args: web::Json<SafetyGuidelinesArgs>,
) -> Result<web::Json<McpResponse<ToolCallResponse>>, Error> {
    let outcome = toolbox(&req)?.safety_guidelines(&args).await;
    finish(&req, ToolName::SafetyGuidelines, outcome)
}
