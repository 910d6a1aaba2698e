//! Export configuration.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Tunables for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Maximum cameras fetched in parallel, bounding load on the server.
    pub max_parallel_fetches: usize,
    /// Per-call HTTP timeout.
    pub request_timeout: Duration,
    /// Maximum retries per capture, on top of the first attempt. Only
    /// transient failures are retried.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay: Duration,
    /// Cap on the backoff delay.
    pub retry_max_delay: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_parallel_fetches: 4,
            request_timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(200),
            retry_max_delay: Duration::from_secs(2),
        }
    }
}

impl ExportConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_parallel_fetches: env_parse("CAMREPORT_MAX_PARALLEL")
                .unwrap_or(defaults.max_parallel_fetches),
            request_timeout: env_parse("CAMREPORT_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_retries: env_parse("CAMREPORT_MAX_RETRIES").unwrap_or(defaults.max_retries),
            retry_base_delay: env_parse("CAMREPORT_RETRY_BASE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            retry_max_delay: env_parse("CAMREPORT_RETRY_MAX_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_max_delay),
        }
    }

    /// Retry policy derived from this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.retry_base_delay,
            max_delay: self.retry_max_delay,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_bounded() {
        let config = ExportConfig::default();
        assert!(config.max_parallel_fetches >= 1);
        assert!(config.max_retries <= 5);
        assert!(config.request_timeout <= Duration::from_secs(30));
    }
}
