//! Resilient HTTP client used for every outbound request.
//!
//! This module provides a configurable HTTP client that implements:
//! - One request timeout applied to every attempt, surfaced as a distinct error
//! - Optional exponential backoff with jitter on network errors and retryable statuses
//! - Structured logging that never includes query strings (they may carry API keys)
//! - Optional Prometheus metrics per destination

use prometheus::{CounterVec, HistogramVec, Opts, Registry};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{error, info, warn};

/// Configuration for resilient HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilientClientConfig {
    /// Timeout for a single request attempt, headers and body (in seconds)
    pub request_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Enable detailed logging
    pub enable_detailed_logging: bool,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Extra attempts after the first one; zero disables retries
    pub max_retries: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Retry on these HTTP status codes
    pub retry_on_status: Vec<u16>,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            retry: RetryConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

/// Metrics for outbound HTTP requests
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// Requests by destination, method, and outcome
    pub requests_total: CounterVec,

    /// Request duration by destination and method
    pub request_duration_seconds: HistogramVec,

    /// Retry attempts by destination and reason
    pub retry_attempts_total: CounterVec,

    /// Timeout occurrences by destination
    pub timeouts_total: CounterVec,
}

impl ResilientClientMetrics {
    /// Create metrics and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new(
                "upstream_requests_total",
                "Total outbound requests by destination, method, and outcome",
            ),
            &["destination", "method", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "upstream_request_duration_seconds",
                "Duration of outbound requests including retries",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 120.0]),
            &["destination", "method"],
        )?;

        let retry_attempts_total = CounterVec::new(
            Opts::new(
                "upstream_retry_attempts_total",
                "Outbound attempts that failed with a retryable outcome",
            ),
            &["destination", "reason"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new("upstream_timeouts_total", "Outbound request timeouts by destination"),
            &["destination"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(retry_attempts_total.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            retry_attempts_total,
            timeouts_total,
        })
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
struct RequestContext {
    destination: String,
    method: String,
    /// Path only; the query string is never logged
    path: String,
}

/// HTTP client with a uniform timeout and optional retries
#[derive(Clone)]
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
}

impl ResilientClient {
    /// Create a new resilient HTTP client
    pub fn new(
        config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    /// Timeout applied to each attempt
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_seconds)
    }

    /// Execute an HTTP GET request
    pub async fn get(&self, url: &str) -> Result<Response, ResilientClientError> {
        self.execute(Method::GET, url, None, HeaderMap::new()).await
    }

    /// Execute an HTTP GET request with extra headers
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Response, ResilientClientError> {
        self.execute(Method::GET, url, None, headers).await
    }

    /// Execute an HTTP POST request with a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        json: &T,
        headers: HeaderMap,
    ) -> Result<Response, ResilientClientError> {
        let body = serde_json::to_value(json)
            .map_err(|e| ResilientClientError::SerializationError(e.to_string()))?;
        self.execute(Method::POST, url, Some(body), headers).await
    }

    /// Read a response body
    ///
    /// The body shares the deadline of the attempt that produced `response`,
    /// so a slow body fails with [`ResilientClientError::Timeout`] once the
    /// request timeout has elapsed in total.
    pub async fn read_text(&self, response: Response) -> Result<String, ResilientClientError> {
        response
            .text()
            .await
            .map_err(|e| transport_error(e, self.request_timeout()))
    }

    /// Extract destination (host) from URL for metrics and logging
    fn extract_destination(&self, url: &str) -> String {
        url::Url::parse(url)
            .map(|u| u.host_str().unwrap_or("unknown").to_string())
            .unwrap_or_else(|_| "invalid_url".to_string())
    }

    fn extract_path(&self, url: &str) -> String {
        url::Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_default()
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> Result<Response, ResilientClientError> {
        let context = RequestContext {
            destination: self.extract_destination(url),
            method: method.to_string(),
            path: self.extract_path(url),
        };
        let started = Instant::now();
        let timeout = self.request_timeout();

        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
            .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.retry.max_retries);

        let context_ref = &context;
        let headers_ref = &headers;
        let body_ref = &body;

        let result = Retry::start(retry_strategy, || {
            // reqwest's total timeout runs from connect until the body is read.
            let request = self
                .client
                .request(method.clone(), url)
                .timeout(timeout)
                .headers(headers_ref.clone());
            let request = match body_ref {
                Some(value) => request.json(value),
                None => request,
            };

            async move {
                let context = context_ref;
                let attempt_started = Instant::now();
                match request.send().await {
                    Ok(response) => {
                        let status = response.status().as_u16();
                        if is_retry_status(status, &self.config.retry.retry_on_status) {
                            if self.config.enable_detailed_logging {
                                warn!(
                                    destination = %context.destination,
                                    method = %context.method,
                                    path = %context.path,
                                    status,
                                    duration_ms = attempt_started.elapsed().as_millis(),
                                    "Request failed with retryable status"
                                );
                            }
                            self.record_retry_attempt(context, "http_status");
                            let body = response.text().await.unwrap_or_default();
                            Err(ResilientClientError::RetryableStatus { status, body })
                        } else {
                            if self.config.enable_detailed_logging {
                                info!(
                                    destination = %context.destination,
                                    method = %context.method,
                                    path = %context.path,
                                    status,
                                    duration_ms = attempt_started.elapsed().as_millis(),
                                    "Request completed"
                                );
                            }
                            Ok(response)
                        }
                    }
                    Err(e) => {
                        let error = transport_error(e, timeout);
                        if matches!(error, ResilientClientError::Timeout(_)) {
                            if self.config.enable_detailed_logging {
                                warn!(
                                    destination = %context.destination,
                                    method = %context.method,
                                    path = %context.path,
                                    timeout_seconds = timeout.as_secs(),
                                    "Request timed out"
                                );
                            }
                            self.record_retry_attempt(context, "timeout");
                        } else {
                            if self.config.enable_detailed_logging {
                                error!(
                                    destination = %context.destination,
                                    method = %context.method,
                                    path = %context.path,
                                    error = %error,
                                    duration_ms = attempt_started.elapsed().as_millis(),
                                    "Request failed with network error"
                                );
                            }
                            self.record_retry_attempt(context, "network_error");
                        }
                        Err(error)
                    }
                }
            }
        })
        .await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(ResilientClientError::RetryableStatus { .. }) => "retry_exhausted",
            Err(ResilientClientError::NetworkError(_)) => "network_error",
            Err(ResilientClientError::Timeout(_)) => {
                self.record_timeout(&context);
                "timeout"
            }
            Err(ResilientClientError::SerializationError(_)) => "error",
        };
        self.record_request_metrics(&context, outcome, started.elapsed());

        result
    }

    fn record_request_metrics(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .requests_total
                .with_label_values(&[context.destination.as_str(), context.method.as_str(), outcome])
                .inc();

            metrics
                .request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method.as_str()])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_retry_attempt(&self, context: &RequestContext, reason: &str) {
        if let Some(metrics) = &self.metrics {
            metrics
                .retry_attempts_total
                .with_label_values(&[context.destination.as_str(), reason])
                .inc();
        }
    }

    fn record_timeout(&self, context: &RequestContext) {
        if let Some(metrics) = &self.metrics {
            metrics
                .timeouts_total
                .with_label_values(&[context.destination.as_str()])
                .inc();
        }
    }
}

/// Check if status code should trigger a retry
fn is_retry_status(status: u16, retry_statuses: &[u16]) -> bool {
    retry_statuses.contains(&status)
}

/// Errors that can occur with the resilient client
#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("{0}")]
    NetworkError(reqwest::Error),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Upstream returned status {status}")]
    RetryableStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Classify a reqwest failure, keeping timeouts distinct from other transport errors
fn transport_error(error: reqwest::Error, timeout: Duration) -> ResilientClientError {
    if error.is_timeout() {
        return ResilientClientError::Timeout(timeout);
    }
    // The URL may carry credentials in its query string.
    ResilientClientError::NetworkError(error.without_url())
}
