//! Health check endpoint handler.

use crate::{
    middleware::respond_with_context,
    models::{HealthResponse, McpResponse},
    services::ToolBox,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports the tools served by this process and, when the advisory tool is
/// among them, whether its model is ready. A degraded model does not make
/// the process unhealthy.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the health status, the enabled tools and the advisory model state.",
    tags("Health")
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<McpResponse<HealthResponse>>, Error> {
    let toolbox = req.app_data::<web::Data<ToolBox>>();

    let response = HealthResponse {
        status: "healthy".to_string(),
        tools: toolbox
            .map(|t| {
                t.enabled_tools()
                    .iter()
                    .map(|tool| tool.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default(),
        model: toolbox
            .and_then(|t| t.model_state())
            .map(|state| state.label().to_string()),
    };

    Ok(web::Json(respond_with_context(&req, response)))
}
