//! HTTP client for a single remote tool server.

use crate::models::{McpResponse, ToolCallResponse, ToolName};
use crate::services::resilient_client::{ResilientClient, ResilientClientError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Failure to obtain a tool result from a remote server
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("could not reach {tool} at {url}: {source}")]
    Transport {
        tool: ToolName,
        url: String,
        #[source]
        source: ResilientClientError,
    },

    #[error("{tool} answered HTTP {status}: {body}")]
    Status {
        tool: ToolName,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {tool}: {message}")]
    Decode { tool: ToolName, message: String },

    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

/// Either an MCP envelope or a bare tool result
#[derive(Deserialize)]
#[serde(untagged)]
enum ToolEnvelope {
    Wrapped(McpResponse<ToolCallResponse>),
    Bare(ToolCallResponse),
}

impl ToolEnvelope {
    fn into_response(self) -> ToolCallResponse {
        match self {
            ToolEnvelope::Wrapped(wrapped) => wrapped.into_data(),
            ToolEnvelope::Bare(response) => response,
        }
    }
}

/// Calls tools on one server over `POST /api/tools/{name}`
#[derive(Clone)]
pub struct ToolClient {
    client: ResilientClient,
    base_url: String,
    client_id: HeaderValue,
}

impl ToolClient {
    pub fn new(
        client: ResilientClient,
        base_url: &str,
        client_id: &str,
    ) -> Result<Self, AgentError> {
        let client_id = HeaderValue::from_str(client_id)
            .map_err(|_| AgentError::Configuration(format!("invalid client id '{client_id}'")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
        })
    }

    fn tool_url(&self, tool: ToolName) -> String {
        format!("{}/api/tools/{}", self.base_url, tool.as_str())
    }

    /// Invoke `tool` with `args`; tool-level failures come back in the response
    pub async fn call<A: Serialize + ?Sized>(
        &self,
        tool: ToolName,
        args: &A,
    ) -> Result<ToolCallResponse, AgentError> {
        let url = self.tool_url(tool);
        let trace_id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-client"), self.client_id.clone());
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            headers.insert(HeaderName::from_static("x-trace-id"), value);
        }

        debug!(tool = tool.as_str(), %url, %trace_id, "Calling tool");

        let transport = |source| AgentError::Transport {
            tool,
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .post_json(&url, args, headers)
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = self.client.read_text(response).await.map_err(transport)?;

        if !status.is_success() {
            return Err(AgentError::Status {
                tool,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<ToolEnvelope>(&body)
            .map(ToolEnvelope::into_response)
            .map_err(|e| AgentError::Decode {
                tool,
                message: e.to_string(),
            })
    }
}
