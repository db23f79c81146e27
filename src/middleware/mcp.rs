//! Model Context Protocol (MCP) context detection.
//!
//! Requests carrying `X-MCP-Context`, `X-Client` or `X-Trace-ID` are treated
//! as MCP-aware: their [`ContextMetadata`] is stored in the request
//! extensions and handlers wrap their response with it.

use crate::models::mcp::{ContextMetadata, McpResponse};
use crate::utils::http::header_string;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

const MCP_HEADERS: [&str; 3] = ["X-MCP-Context", "X-Client", "X-Trace-ID"];

/// MCP middleware factory
pub struct McpMiddleware;

impl<S, B> Transform<S, ServiceRequest> for McpMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = McpMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(McpMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct McpMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for McpMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let headers = req.headers();
            let is_mcp_request = MCP_HEADERS.iter().any(|name| headers.contains_key(*name));

            if is_mcp_request {
                let context = ContextMetadata::from_headers(
                    header_string(headers, "X-Trace-ID"),
                    header_string(headers, "X-Client"),
                    header_string(headers, "X-Correlation-ID"),
                );

                tracing::debug!(
                    trace_id = %context.trace_id,
                    client_id = ?context.client_id,
                    "MCP request detected"
                );
                req.extensions_mut().insert(context);
            }

            service.call(req).await
        })
    }
}

/// MCP context stored for this request, if any
pub fn extract_mcp_context(req: &HttpRequest) -> Option<ContextMetadata> {
    req.extensions().get::<ContextMetadata>().cloned()
}

/// Wrap `data` with the request's MCP context, or leave it bare for REST clients
pub fn respond_with_context<T>(req: &HttpRequest, data: T) -> McpResponse<T> {
    match extract_mcp_context(req) {
        Some(context) => McpResponse::with_context(data, context),
        None => McpResponse::new(data),
    }
}
