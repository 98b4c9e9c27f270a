//! PokeAPI HTTP client
//!
//! A read-through client: every request checks the response cache first,
//! keyed by the fully resolved URL, and stores the verbatim response body on
//! a successful fetch. Repeated paginated queries within the cache TTL never
//! hit the network twice.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::TimedCache;
use crate::cli::Settings;

use super::{LocationAreaDetail, LocationAreaPage, Pokemon};

/// Errors that can occur when querying PokeAPI
#[derive(Debug, Error)]
pub enum PokeApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The requested resource does not exist
    #[error("{resource} not found")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// The API answered with a non-success status other than 404
    #[error("Unexpected status code {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code
        status: u16,
        /// The requested URL
        url: String,
    },
}

/// Client for querying PokeAPI with response caching
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    /// Shared HTTP client with the configured request timeout
    http: Client,
    /// API root, without a trailing slash
    base_url: String,
    /// Response cache keyed by request URL
    cache: TimedCache,
}

impl PokeApiClient {
    /// Creates a client from validated settings
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(settings: &Settings) -> Result<Self, PokeApiError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cache: TimedCache::new(settings.ttl),
        })
    }

    /// Creates a client against a custom API root (for testing)
    #[cfg(test)]
    pub fn with_base_url(base_url: String, ttl: std::time::Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: TimedCache::new(ttl),
        }
    }

    /// The response cache backing this client
    pub fn cache(&self) -> &TimedCache {
        &self.cache
    }

    /// URL of the first page of the location-area listing
    pub fn location_areas_url(&self) -> String {
        format!("{}/location-area/", self.base_url)
    }

    /// Fetches one page of the location-area listing
    ///
    /// `url` is either `location_areas_url()` or a `next`/`previous` link
    /// from a previously fetched page.
    pub async fn list_location_areas(
        &self,
        url: &str,
    ) -> Result<LocationAreaPage, PokeApiError> {
        self.fetch(url, "location areas").await
    }

    /// Fetches the detail record for a location area by name
    pub async fn get_location_area(
        &self,
        name: &str,
    ) -> Result<LocationAreaDetail, PokeApiError> {
        let url = format!("{}/location-area/{}/", self.base_url, name);
        self.fetch(&url, &format!("location area '{}'", name)).await
    }

    /// Fetches the detail record for a Pokemon by name
    pub async fn get_pokemon(&self, name: &str) -> Result<Pokemon, PokeApiError> {
        let url = format!("{}/pokemon/{}/", self.base_url, name);
        self.fetch(&url, &format!("pokemon '{}'", name)).await
    }

    /// Read-through fetch: cache lookup, then network on a miss
    ///
    /// On a successful fetch the raw response bytes are cached as received,
    /// so the cached and fresh paths decode identical input. A cached blob
    /// that no longer decodes is treated as a miss and refetched. Error
    /// responses never populate the cache.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        resource: &str,
    ) -> Result<T, PokeApiError> {
        if let Some(bytes) = self.cache.get(url) {
            match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!(url, "cache hit");
                    return Ok(value);
                }
                Err(error) => {
                    warn!(url, %error, "cached response no longer decodes, refetching");
                }
            }
        }

        debug!(url, "cache miss, fetching");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PokeApiError::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            return Err(PokeApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes)?;
        self.cache.add(url, bytes.to_vec());
        Ok(value)
    }
}
