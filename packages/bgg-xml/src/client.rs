//! BGG API client: fetch XML documents and map them onto records.

use std::thread;

use reqwest::blocking::Client;
use url::Url;

use crate::cache::ResponseCache;
use crate::config::{search_url, thing_url, Settings};
use crate::error::Result;
use crate::http::{create_client, download_bytes, RetryPolicy};
use crate::models::{parse_search, parse_things, Game, SearchResponse};

/// Blocking client for the BoardGameGeek XML API v2.
#[derive(Debug, Clone)]
pub struct BggClient {
    client: Client,
    settings: Settings,
    retry: RetryPolicy,
    cache: Option<ResponseCache>,
}

impl BggClient {
    /// Create a client from settings.
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            client: create_client(&settings)?,
            retry: RetryPolicy::from_settings(&settings),
            cache: ResponseCache::from_settings(&settings),
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The response cache, if caching is enabled.
    #[must_use]
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Fetch games by ID, optionally with community statistics.
    ///
    /// An empty ID list returns immediately without a request.
    ///
    /// # Errors
    /// Fails on HTTP errors after retries, malformed XML, or an item that
    /// cannot be constructed.
    pub fn get_things(&self, ids: &[u64], include_stats: bool) -> Result<Vec<Game>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = thing_url(&self.settings.api_base_url, ids, include_stats)?;
        let xml = self.get_xml(&url)?;
        let games = parse_things(&xml)?;

        tracing::info!(requested = ids.len(), parsed = games.len(), "Fetched games");
        Ok(games)
    }

    /// Fetch a single game by ID. `None` if BGG does not know the ID.
    ///
    /// # Errors
    /// Same as [`BggClient::get_things`].
    pub fn get_thing(&self, id: u64, include_stats: bool) -> Result<Option<Game>> {
        Ok(self.get_things(&[id], include_stats)?.into_iter().next())
    }

    /// Search games by name.
    ///
    /// # Errors
    /// Fails on a blank query, HTTP errors after retries, or malformed XML.
    pub fn search(&self, query: &str, exact: bool) -> Result<SearchResponse> {
        let url = search_url(&self.settings.api_base_url, query, exact)?;
        let xml = self.get_xml(&url)?;
        let response = parse_search(&xml)?;

        tracing::info!(query, total = response.total, "Search complete");
        Ok(response)
    }

    /// Response body for `url`, served from the cache when possible.
    ///
    /// A failed cache write is logged; the fetched body is still returned.
    fn get_xml(&self, url: &Url) -> Result<String> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(url.as_str())) {
            return Ok(body);
        }

        if !self.settings.rate_limit_delay.is_zero() {
            thread::sleep(self.settings.rate_limit_delay);
        }
        let bytes = download_bytes(&self.client, url.as_str(), &self.retry)?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(url.as_str(), &body) {
                tracing::warn!(error = %e, "Failed to cache response");
            }
        }
        Ok(body)
    }
}
