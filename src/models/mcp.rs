//! Model Context Protocol (MCP) context envelope.
//!
//! Context-aware clients receive tool results wrapped together with trace
//! metadata, while plain REST clients keep receiving the bare response body.

use chrono::Utc;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Context metadata for MCP-aware requests and responses
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ContextMetadata {
    /// Unique trace identifier, taken from `X-Trace-ID` when supplied
    pub trace_id: String,
    /// Version of the tool server
    pub model_version: String,
    /// Timestamp when the context was created (RFC 3339)
    pub timestamp: String,
    pub correlation_id: Option<String>,
    /// Caller identity from `X-Client`
    pub client_id: Option<String>,
}

impl ContextMetadata {
    /// Create context metadata from request headers, generating a trace ID when absent
    pub fn from_headers(
        trace_id: Option<String>,
        client_id: Option<String>,
        correlation_id: Option<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            model_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            correlation_id,
            client_id,
        }
    }
}

impl Default for ContextMetadata {
    fn default() -> Self {
        Self::from_headers(None, None, None)
    }
}

/// Response body, optionally wrapped with MCP context
///
/// Without context only `data` is serialized, so REST clients see the
/// plain response.
#[derive(Debug, Clone, Deserialize, Apiv2Schema)]
pub struct McpResponse<T> {
    pub data: T,
    pub context: Option<ContextMetadata>,
}

impl<T> McpResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            context: None,
        }
    }

    pub fn with_context(data: T, context: ContextMetadata) -> Self {
        Self {
            data,
            context: Some(context),
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }
}

impl<T> Serialize for McpResponse<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.context {
            Some(ref context) => {
                use serde::ser::SerializeStruct;
                let mut state = serializer.serialize_struct("McpResponse", 2)?;
                state.serialize_field("data", &self.data)?;
                state.serialize_field("context", context)?;
                state.end()
            }
            None => self.data.serialize(serializer),
        }
    }
}

impl<T> From<T> for McpResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ToolCallResponse, ToolName};

    fn weather_result() -> ToolCallResponse {
        ToolCallResponse::success(ToolName::GetWeather, &"- Location: Paris, France")
    }

    #[test]
    fn test_context_metadata_from_headers() {
        let context = ContextMetadata::from_headers(
            Some("test-trace-123".to_string()),
            Some("aqi-agent".to_string()),
            Some("corr-456".to_string()),
        );

        assert_eq!(context.trace_id, "test-trace-123");
        assert_eq!(context.client_id.as_deref(), Some("aqi-agent"));
        assert_eq!(context.correlation_id.as_deref(), Some("corr-456"));
        assert_eq!(context.model_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_generated_trace_id() {
        let context = ContextMetadata::default();
        assert!(Uuid::parse_str(&context.trace_id).is_ok());
        assert!(context.client_id.is_none());
    }

    #[test]
    fn test_rest_serialization_is_bare() {
        let response = McpResponse::new(weather_result());
        assert!(!response.has_context());

        let parsed = serde_json::to_value(&response).unwrap();
        assert_eq!(parsed["tool"], "get_weather");
        assert!(parsed.get("data").is_none());
        assert!(parsed.get("context").is_none());
    }

    #[test]
    fn test_mcp_serialization_is_wrapped() {
        let context = ContextMetadata::from_headers(Some("trace-1".to_string()), None, None);
        let response = McpResponse::with_context(weather_result(), context);

        let parsed = serde_json::to_value(&response).unwrap();
        assert_eq!(parsed["data"]["tool"], "get_weather");
        assert_eq!(parsed["context"]["trace_id"], "trace-1");

        let back: McpResponse<ToolCallResponse> = serde_json::from_value(parsed).unwrap();
        assert!(back.has_context());
        assert_eq!(back.into_data().text(), "- Location: Paris, France");
    }
}
