//! LLM-backed outdoor safety guidelines.
//!
//! A [`TextGenerator`] turns a prompt into text. The [`AdvisoryGenerator`]
//! owns the process-wide model handle, built once at startup by
//! [`AdvisoryGenerator::initialize`]; a backend that cannot be reached at
//! that point leaves the handle [`ModelState::Unavailable`] instead of
//! failing the server.

use crate::config::AdvisoryConfig;
use crate::error::{ToolError, Upstream};
use crate::models::reports::{Advisory, AqiLevel};
use crate::services::resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
    RetryConfig,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sampling settings applied to every generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    /// Cap on newly generated tokens
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

/// Text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, params: &GenerationParams)
    -> Result<String, ToolError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Generator for any server exposing the OpenAI chat-completions API
pub struct OpenAiCompatibleGenerator {
    client: ResilientClient,
    base_url: String,
    model: String,
    headers: HeaderMap,
}

impl OpenAiCompatibleGenerator {
    pub fn new(
        config: &AdvisoryConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, ToolError> {
        let client_config = ResilientClientConfig {
            request_timeout_seconds: config.timeout_seconds,
            retry: RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            },
            ..ResilientClientConfig::default()
        };
        let client = ResilientClient::new(client_config, metrics)
            .map_err(|e| ToolError::configuration(format!("failed to create HTTP client: {e}")))?;

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| ToolError::configuration("ADVISORY_API_KEY is not a valid header"))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            headers,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Check that the backend answers and serves the configured model
    pub async fn probe(&self) -> Result<(), String> {
        let response = self
            .client
            .get_with_headers(&self.endpoint("models"), self.headers.clone())
            .await
            .map_err(|e| format!("model server unreachable: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("model server answered {status} to the readiness probe"));
        }

        let body = self
            .client
            .read_text(response)
            .await
            .map_err(|e| format!("model server unreachable: {e}"))?;
        let models: ModelList = serde_json::from_str(&body)
            .map_err(|e| format!("unexpected model list from server: {e}"))?;

        if models.data.iter().any(|entry| entry.id == self.model) {
            Ok(())
        } else {
            Err(format!("model '{}' is not served by {}", self.model, self.base_url))
        }
    }
}

/// Map a transport failure during generation; only timeouts stay distinct
fn generation_error(error: ResilientClientError) -> ToolError {
    match error {
        ResilientClientError::Timeout(_) => ToolError::from_transport(Upstream::Model, error),
        ResilientClientError::RetryableStatus { status, body } => ToolError::Generation {
            message: format!("{} returned an error: {status} {body}", Upstream::Model.api_name()),
        },
        other => ToolError::Generation {
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ToolError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post_json(&self.endpoint("chat/completions"), &request, self.headers.clone())
            .await
            .map_err(generation_error)?;

        let status = response.status();
        let body = self
            .client
            .read_text(response)
            .await
            .map_err(generation_error)?;

        if !status.is_success() {
            return Err(ToolError::Generation {
                message: format!(
                    "{} returned an error: {} {body}",
                    Upstream::Model.api_name(),
                    status.as_u16()
                ),
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ToolError::Generation {
                message: format!("unexpected completion format: {e}"),
            })?;

        completion
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(ToolError::EmptyGeneration)
    }
}

/// Deterministic offline generator keyed on the AQI level in the prompt
pub struct MockGenerator;

impl MockGenerator {
    fn level_in(prompt: &str) -> AqiLevel {
        prompt
            .lines()
            .find_map(|line| line.trim().strip_prefix("- AQI Level:"))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|index| index.parse::<i64>().ok())
            .map(AqiLevel::from_index)
            .unwrap_or(AqiLevel::Unknown)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ToolError> {
        let level = Self::level_in(prompt);
        let (safety, risks, precautions) = match level {
            AqiLevel::Good | AqiLevel::Fair => (
                "Safe for outdoor activities. Parasailing is fine if winds are moderate.",
                "Minimal health risk from air pollution.",
                "No special precautions needed; stay hydrated.",
            ),
            AqiLevel::Moderate => (
                "Generally acceptable for outdoor activities. Check wind speed before parasailing.",
                "Unusually sensitive people may notice mild respiratory irritation.",
                "Limit prolonged strenuous exertion outdoors.",
            ),
            AqiLevel::Poor | AqiLevel::VeryPoor => (
                "Outdoor activity is not advisable. Postpone parasailing.",
                "Increased likelihood of respiratory and cardiovascular symptoms.",
                "Stay indoors where possible and wear a well-fitted mask outside.",
            ),
            AqiLevel::Unknown => (
                "Air quality could not be assessed. Use caution outdoors.",
                "Unknown; treat conditions as potentially unhealthy.",
                "Check local air quality reports before going out.",
            ),
        };

        Ok(format!(
            "1. Overall outdoor safety level ({level}): {safety}\n\
             2. Health risks: {risks}\n\
             3. Precautions: {precautions}\n\
             4. Sensitive groups: children, older adults and people with asthma or heart disease should reduce time outdoors."
        ))
    }
}

/// Lifecycle of the process-wide model handle
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<dyn TextGenerator>),
    Unavailable { reason: String },
    Disabled,
}

impl ModelState {
    pub fn label(&self) -> &'static str {
        match self {
            ModelState::Ready(_) => "ready",
            ModelState::Unavailable { .. } => "unavailable",
            ModelState::Disabled => "disabled",
        }
    }
}

/// Builds advisory prompts and runs them through the model
#[derive(Clone)]
pub struct AdvisoryGenerator {
    state: ModelState,
    params: GenerationParams,
}

impl AdvisoryGenerator {
    /// Build the model handle for the configured provider
    pub async fn initialize(
        config: &AdvisoryConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Self {
        let state = match config.provider.as_str() {
            "openai" => match OpenAiCompatibleGenerator::new(config, metrics) {
                Ok(generator) => match generator.probe().await {
                    Ok(()) => {
                        info!(model = %config.model, base_url = %config.base_url, "Advisory model ready");
                        ModelState::Ready(Arc::new(generator))
                    }
                    Err(reason) => {
                        warn!(model = %config.model, %reason, "Advisory model unavailable");
                        ModelState::Unavailable { reason }
                    }
                },
                Err(e) => ModelState::Unavailable {
                    reason: e.to_string(),
                },
            },
            "mock" => {
                info!("Using mock advisory generator");
                ModelState::Ready(Arc::new(MockGenerator))
            }
            "disabled" => ModelState::Disabled,
            other => {
                warn!(provider = other, "Unknown advisory provider");
                ModelState::Unavailable {
                    reason: format!("unknown provider '{other}'"),
                }
            }
        };

        Self {
            state,
            params: GenerationParams::default(),
        }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            state: ModelState::Ready(generator),
            params: GenerationParams::default(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable {
                reason: reason.into(),
            },
            params: GenerationParams::default(),
        }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Prompt embedding both reports verbatim
    pub fn build_prompt(weather_report: &str, aqi_report: &str) -> String {
        format!(
            "You are a health assistant. Given this weather and air quality:\n\n\
             Weather Report:\n{weather_report}\n\n\
             AQI Report:\n{aqi_report}\n\n\
             Provide:\n\
             1. Overall outdoor safety level. Can I go for parasailing based on the weather report?\n\
             2. Health risks.\n\
             3. Precautions.\n\
             4. Special advice for sensitive groups.\n"
        )
    }

    /// Generate outdoor safety advice for the two reports
    pub async fn safety_guidelines(
        &self,
        weather_report: &str,
        aqi_report: &str,
    ) -> Result<Advisory, ToolError> {
        let generator = match &self.state {
            ModelState::Ready(generator) => generator,
            ModelState::Unavailable { reason } => {
                return Err(ToolError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
            ModelState::Disabled => {
                return Err(ToolError::ModelUnavailable {
                    reason: "advisory generation is disabled".to_string(),
                });
            }
        };

        let prompt = Self::build_prompt(weather_report, aqi_report);
        debug!(generator = generator.name(), prompt_len = prompt.len(), "Generating advisory");

        let text = generator.generate(&prompt, &self.params).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ToolError::EmptyGeneration);
        }

        Ok(Advisory {
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AQI_REPORT: &str = "- Location: Paris, France\n- AQI Level: 4 (Poor)";

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _: &str, _: &GenerationParams) -> Result<String, ToolError> {
            Ok(self.0.to_string())
        }
    }

    fn openai_config(server: &MockServer) -> AdvisoryConfig {
        AdvisoryConfig {
            provider: "openai".to_string(),
            base_url: format!("{}/v1", server.uri()),
            model: "test-model".to_string(),
            api_key: Some("token-1".to_string()),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_prompt_embeds_reports() {
        let prompt = AdvisoryGenerator::build_prompt("WEATHER-TEXT", "AQI-TEXT");
        assert!(prompt.contains("Weather Report:\nWEATHER-TEXT"));
        assert!(prompt.contains("AQI Report:\nAQI-TEXT"));
        assert!(prompt.contains("parasailing"));
        assert!(prompt.contains("4. Special advice for sensitive groups."));
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_tokens, 512);
    }

    #[tokio::test]
    async fn test_output_is_trimmed() {
        let generator = AdvisoryGenerator::with_generator(Arc::new(FixedGenerator("\n  Stay safe.  \n")));
        let advisory = generator.safety_guidelines("w", "a").await.unwrap();
        assert_eq!(advisory.text, "Stay safe.");
    }

    #[tokio::test]
    async fn test_blank_output_is_empty_generation() {
        let generator = AdvisoryGenerator::with_generator(Arc::new(FixedGenerator(" \n\t")));
        let error = generator.safety_guidelines("w", "a").await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Failed to generate safety guidelines. The model returned no valid output."
        );
    }

    #[tokio::test]
    async fn test_unavailable_model() {
        let generator = AdvisoryGenerator::unavailable("no GPU");
        assert_eq!(generator.state().label(), "unavailable");

        let error = generator.safety_guidelines("w", "a").await.unwrap_err();
        assert!(error
            .to_string()
            .starts_with("The language model could not be initialized."));
    }

    #[tokio::test]
    async fn test_mock_generator_follows_level() {
        let generator = AdvisoryGenerator::initialize(&AdvisoryConfig::mock(), None).await;
        assert_eq!(generator.state().label(), "ready");

        let advisory = generator.safety_guidelines("w", AQI_REPORT).await.unwrap();
        assert!(advisory.text.contains("(Poor)"));
        assert!(advisory.text.contains("Postpone parasailing"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_unavailable() {
        let config = AdvisoryConfig {
            provider: "llama-magic".to_string(),
            ..AdvisoryConfig::default()
        };
        let generator = AdvisoryGenerator::initialize(&config, None).await;
        assert_eq!(generator.state().label(), "unavailable");
    }

    #[tokio::test]
    async fn test_openai_probe_and_generate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"id": "test-model", "object": "model"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "temperature": 0.7,
                "max_tokens": 512
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Wear a mask.\n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = AdvisoryGenerator::initialize(&openai_config(&server), None).await;
        assert_eq!(generator.state().label(), "ready");

        let advisory = generator.safety_guidelines("w", AQI_REPORT).await.unwrap();
        assert_eq!(advisory.text, "Wear a mask.");
    }

    #[tokio::test]
    async fn test_probe_rejects_unserved_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "other-model"}]
            })))
            .mount(&server)
            .await;

        let generator = AdvisoryGenerator::initialize(&openai_config(&server), None).await;
        match generator.state() {
            ModelState::Unavailable { reason } => assert!(reason.contains("test-model")),
            other => panic!("expected unavailable, got {}", other.label()),
        }
    }

    #[tokio::test]
    async fn test_backend_error_is_pipeline_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("context length exceeded"))
            .mount(&server)
            .await;

        let generator =
            OpenAiCompatibleGenerator::new(&openai_config(&server), None).unwrap();
        let error = generator
            .generate("prompt", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(error.to_string().starts_with("Model pipeline error:"));
        assert!(error.to_string().contains("context length exceeded"));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let generator =
            OpenAiCompatibleGenerator::new(&openai_config(&server), None).unwrap();
        let error = generator
            .generate("prompt", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ToolError::EmptyGeneration));
    }
}
