//! HTTP client wrapper for the BGG XML API.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::Settings;
use crate::error::{BggError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("bgg-xml/", env!("CARGO_PKG_VERSION"), " (BGG API Client)");

/// Upper bound for a single retry delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(300);

/// Create a configured HTTP client.
///
/// # Arguments
/// * `settings` - Supplies the request timeout
///
/// # Returns
/// Blocking client with timeout and user agent set
pub fn create_client(settings: &Settings) -> Result<Client> {
    let client = Client::builder()
        .timeout(settings.request_timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Retry schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff factor in seconds.
    pub backoff_factor: f64,
    /// Extra delay in seconds after a rate-limit response.
    pub rate_limit_base_delay: f64,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_retries: settings.max_retries,
            backoff_factor: settings.backoff_factor,
            rate_limit_base_delay: settings.rate_limit_base_delay,
        }
    }

    /// Delay before retrying after the given (zero-based) attempt.
    ///
    /// `backoff_factor * 2^attempt`, plus the rate-limit base delay when the
    /// server answered 429, capped at [`MAX_RETRY_DELAY`].
    #[must_use]
    pub fn delay(&self, attempt: u32, rate_limited: bool) -> Duration {
        let base = if rate_limited {
            self.rate_limit_base_delay
        } else {
            0.0
        };
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = base + self.backoff_factor * 2f64.powi(exponent);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Why an attempt should be retried.
enum Transient {
    RateLimited,
    Failure(String),
}

/// Download content from a URL with retry logic.
///
/// Connection errors, timeouts and 5xx responses are retried with
/// exponential backoff; 429 responses are retried with an additional base
/// delay. Other client errors fail immediately.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download from
/// * `policy` - Retry count and backoff schedule
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str, policy: &RetryPolicy) -> Result<Vec<u8>> {
    let attempts = policy.max_retries + 1;
    let mut last: Option<Transient> = None;

    for attempt in 0..attempts {
        if let Some(previous) = &last {
            let delay = policy.delay(attempt - 1, matches!(previous, Transient::RateLimited));
            tracing::debug!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying after delay"
            );
            thread::sleep(delay);
        }

        tracing::debug!(url, attempt = attempt + 1, "GET");
        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        "Rate limited, will retry"
                    );
                    last = Some(Transient::RateLimited);
                    continue;
                }

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        "Server error, will retry"
                    );
                    last = Some(Transient::Failure(format!("Server error: {status}")));
                    continue;
                }

                // Don't retry other client errors (4xx) - they won't succeed
                let response = response.error_for_status()?;
                let bytes = response.bytes()?;
                return Ok(bytes.to_vec());
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        "Connection error, will retry"
                    );
                    last = Some(Transient::Failure(e.to_string()));
                    continue;
                }
                return Err(BggError::Http(e));
            }
        }
    }

    tracing::error!(url, attempts, "Max retries exceeded");
    Err(match last {
        Some(Transient::RateLimited) => BggError::RateLimited { attempts },
        Some(Transient::Failure(message)) => BggError::RetriesExhausted { attempts, message },
        None => BggError::RetriesExhausted {
            attempts,
            message: "Unknown error".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client(&Settings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_retry_delay_backoff() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_factor: 0.5,
            rate_limit_base_delay: 5.0,
        };

        assert_eq!(policy.delay(0, false), Duration::from_millis(500));
        assert_eq!(policy.delay(1, false), Duration::from_secs(1));
        assert_eq!(policy.delay(2, false), Duration::from_secs(2));
        assert_eq!(policy.delay(0, true), Duration::from_millis(5500));
    }

    #[test]
    fn test_retry_delay_zero_factor() {
        let policy = RetryPolicy {
            max_retries: 1,
            backoff_factor: 0.0,
            rate_limit_base_delay: 0.0,
        };
        assert_eq!(policy.delay(4, true), Duration::ZERO);
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let huge_factor = RetryPolicy {
            max_retries: 3,
            backoff_factor: 1e300,
            rate_limit_base_delay: 5.0,
        };
        assert_eq!(huge_factor.delay(0, false), MAX_RETRY_DELAY);

        let many_retries = RetryPolicy {
            max_retries: u32::MAX,
            ..RetryPolicy::default()
        };
        assert_eq!(many_retries.delay(66, false), MAX_RETRY_DELAY);
        assert_eq!(many_retries.delay(u32::MAX - 1, true), MAX_RETRY_DELAY);
    }

    #[test]
    fn test_retry_delay_from_oversized_env_value() {
        let settings = Settings::from_lookup(|key| {
            (key == "BGG_RETRY_BACKOFF_FACTOR").then(|| "1e300".to_string())
        });
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.delay(0, false), Duration::from_millis(500));
    }
}
