//! Configuration constants, settings and validation functions.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::error::{BggError, Result};

/// Base URL for the BoardGameGeek XML API v2.
pub const BGG_API_BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Delay before each API request, in seconds.
///
/// BGG throttles clients that hit the API in quick succession.
pub const RATE_LIMIT_DELAY_SECS: f64 = 2.0;

/// Maximum number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 3;

/// Exponential backoff factor in seconds: delay = factor * 2^attempt.
pub const RETRY_BACKOFF_FACTOR: f64 = 0.5;

/// Extra delay in seconds added to the backoff after a 429 response.
pub const RATE_LIMIT_BASE_DELAY_SECS: f64 = 5.0;

/// Whether API responses are cached on disk by default.
pub const CACHE_ENABLED: bool = true;

/// Cache time-to-live in seconds.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Default cache directory, relative to the working directory.
pub const CACHE_DIR: &str = ".cache";

/// Default log filter when neither `RUST_LOG` nor `BGG_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Item type requested from the API.
pub const THING_TYPE: &str = "boardgame";

/// Thing ID pattern: positive decimal integer without leading zeros.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static THING_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d*$").expect("valid regex"));

/// Runtime settings, read from `BGG_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub rate_limit_delay: Duration,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub rate_limit_base_delay: f64,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub cache_dir: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: BGG_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            rate_limit_delay: Duration::from_secs_f64(RATE_LIMIT_DELAY_SECS),
            max_retries: MAX_RETRIES,
            backoff_factor: RETRY_BACKOFF_FACTOR,
            rate_limit_base_delay: RATE_LIMIT_BASE_DELAY_SECS,
            cache_enabled: CACHE_ENABLED,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            cache_dir: PathBuf::from(CACHE_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// Unset or unparsable variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup("BGG_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = lookup("BGG_REQUEST_TIMEOUT")
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let rate_limit_delay = lookup("BGG_RATE_LIMIT_DELAY")
            .and_then(|v| parse_seconds(&v))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(defaults.rate_limit_delay);

        let max_retries = lookup("BGG_MAX_RETRIES")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.max_retries);

        let backoff_factor = lookup("BGG_RETRY_BACKOFF_FACTOR")
            .and_then(|v| parse_seconds(&v))
            .filter(|secs| Duration::try_from_secs_f64(*secs).is_ok())
            .unwrap_or(defaults.backoff_factor);

        let cache_enabled = lookup("BGG_CACHE_ENABLED")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.cache_enabled);

        let cache_ttl = lookup("BGG_CACHE_TTL")
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let cache_dir = lookup("BGG_CACHE_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map_or(defaults.cache_dir, PathBuf::from);

        let log_level = lookup("BGG_LOG_LEVEL")
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_level);

        Self {
            api_base_url,
            request_timeout,
            rate_limit_delay,
            max_retries,
            backoff_factor,
            rate_limit_base_delay: defaults.rate_limit_base_delay,
            cache_enabled,
            cache_ttl,
            cache_dir,
            log_level,
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set both backoff parameters (seconds).
    #[must_use]
    pub fn with_backoff(mut self, factor: f64, rate_limit_base_delay: f64) -> Self {
        self.backoff_factor = factor;
        self.rate_limit_base_delay = rate_limit_base_delay;
        self
    }

    /// Cache responses under `dir`.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_enabled = true;
        self.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_seconds(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Validate and parse a thing ID.
///
/// # Arguments
/// * `id` - Thing ID as typed by the user
///
/// # Returns
/// * `Ok(id)` if it is a positive integer without leading zeros
/// * `Err(BggError::InvalidThingId)` otherwise
///
/// # Examples
/// ```
/// use bgg_xml::config::validate_thing_id;
///
/// assert_eq!(validate_thing_id("174430").unwrap(), 174430);
/// assert!(validate_thing_id("0").is_err());
/// assert!(validate_thing_id("gloomhaven").is_err());
/// ```
pub fn validate_thing_id(id: &str) -> Result<u64> {
    let id = id.trim();
    if !THING_ID_PATTERN.is_match(id) {
        return Err(BggError::InvalidThingId(id.to_string()));
    }
    id.parse()
        .map_err(|_| BggError::InvalidThingId(id.to_string()))
}

fn endpoint(base_url: &str, name: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{}/{name}", base_url.trim_end_matches('/')))?)
}

/// Build the `/thing` URL for one or more IDs.
///
/// # Arguments
/// * `base_url` - API base URL (trailing slash optional)
/// * `ids` - Thing IDs, joined with commas
/// * `include_stats` - Request community statistics (`stats=1`)
///
/// # Returns
/// Fully encoded request URL
///
/// # Examples
/// ```
/// use bgg_xml::config::{thing_url, BGG_API_BASE_URL};
///
/// let url = thing_url(BGG_API_BASE_URL, &[174430, 266192], true).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://boardgamegeek.com/xmlapi2/thing?id=174430%2C266192&type=boardgame&stats=1"
/// );
/// ```
pub fn thing_url(base_url: &str, ids: &[u64], include_stats: bool) -> Result<Url> {
    let ids = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let mut url = endpoint(base_url, "thing")?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("id", &ids).append_pair("type", THING_TYPE);
        if include_stats {
            query.append_pair("stats", "1");
        }
    }
    Ok(url)
}

/// Build the `/search` URL for a query.
///
/// # Arguments
/// * `base_url` - API base URL (trailing slash optional)
/// * `query` - Search text
/// * `exact` - Only match exact names (`exact=1`)
///
/// # Errors
/// Returns `BggError::EmptyQuery` for a blank query.
pub fn search_url(base_url: &str, query: &str, exact: bool) -> Result<Url> {
    let query = query.trim();
    if query.is_empty() {
        return Err(BggError::EmptyQuery);
    }

    let mut url = endpoint(base_url, "search")?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", query).append_pair("type", THING_TYPE);
        if exact {
            pairs.append_pair("exact", "1");
        }
    }
    Ok(url)
}
