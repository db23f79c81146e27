//! Configuration for the resilient HTTP client
//!
//! One timeout bounds every outbound tool request. Retries are off unless
//! `TOOL_REQUEST_RETRIES` asks for them.

use super::{env_or, env_string};
use crate::services::resilient_client::{ResilientClientConfig, RetryConfig};

impl ResilientClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            request_timeout_seconds: env_or(
                "TOOL_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            connect_timeout_seconds: env_or(
                "TOOL_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            ),
            retry: RetryConfig::from_env(),
            enable_detailed_logging: env_or(
                "TOOL_DETAILED_LOGGING",
                defaults.enable_detailed_logging,
            ),
        }
    }
}

impl RetryConfig {
    /// Load retry configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Parse retry status codes from comma-separated values
        let retry_on_status = env_string("TOOL_RETRY_ON_STATUS")
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or(defaults.retry_on_status);

        Self {
            max_retries: env_or("TOOL_REQUEST_RETRIES", defaults.max_retries),
            initial_delay_ms: env_or("TOOL_RETRY_INITIAL_DELAY_MS", defaults.initial_delay_ms),
            max_delay_ms: env_or("TOOL_RETRY_MAX_DELAY_MS", defaults.max_delay_ms),
            retry_on_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::ENV_MUTEX;
    use std::env;

    const VARS: &[&str] = &[
        "TOOL_REQUEST_TIMEOUT_SECONDS",
        "TOOL_CONNECT_TIMEOUT_SECONDS",
        "TOOL_DETAILED_LOGGING",
        "TOOL_REQUEST_RETRIES",
        "TOOL_RETRY_INITIAL_DELAY_MS",
        "TOOL_RETRY_MAX_DELAY_MS",
        "TOOL_RETRY_ON_STATUS",
    ];

    fn clear() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_resilient_client_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert!(config.enable_detailed_logging);
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_resilient_client_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        unsafe {
            env::set_var("TOOL_REQUEST_TIMEOUT_SECONDS", "4");
            env::set_var("TOOL_CONNECT_TIMEOUT_SECONDS", "2");
            env::set_var("TOOL_DETAILED_LOGGING", "false");
            env::set_var("TOOL_REQUEST_RETRIES", "2");
        }

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 4);
        assert_eq!(config.connect_timeout_seconds, 2);
        assert!(!config.enable_detailed_logging);
        assert_eq!(config.retry.max_retries, 2);

        clear();
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        unsafe {
            env::set_var("TOOL_REQUEST_TIMEOUT_SECONDS", "soon");
        }

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 10);

        clear();
    }

    #[test]
    fn test_retry_status_codes_parsing() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        unsafe {
            env::set_var("TOOL_RETRY_ON_STATUS", "500, 502,abc,503");
        }

        let config = RetryConfig::from_env();
        assert_eq!(config.retry_on_status, vec![500, 502, 503]);

        clear();
    }
}
