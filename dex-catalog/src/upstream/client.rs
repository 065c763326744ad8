//! PokeAPI REST client
//!
//! Two read-only, unauthenticated endpoints:
//! - `GET {base}/pokemon?offset={offset}&limit={limit}` (ascending id order)
//! - `GET {base}/pokemon/{id}`
//!
//! One attempt per request; no retry or rate limiting.

use super::wire::{DetailResponse, ListingResponse};
use super::{CatalogSource, FetchError};
use crate::types::RecordId;
use async_trait::async_trait;
use dex_common::config::UpstreamConfig;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// PokeAPI client
pub struct PokeApiClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl PokeApiClient {
    /// Create new client from upstream settings
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FetchError::Network(format!("Invalid user agent: {}", e)))?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str, query: &[(&str, usize)]) -> Result<reqwest::Response, FetchError> {
        debug!(url = %url, query = ?query, "Querying catalog API");

        self.http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Catalog API request failed: {}", e)))
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    fn name(&self) -> &'static str {
        "PokeAPI"
    }

    async fn fetch_listing(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<ListingResponse, FetchError> {
        let url = format!("{}/pokemon", self.base_url);
        let response = self
            .get(&url, &[("offset", offset), ("limit", limit)])
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api(status.as_u16(), body));
        }

        let listing: ListingResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("Failed to parse listing: {}", e)))?;

        debug!(
            offset,
            limit,
            count = listing.count,
            returned = listing.results.len(),
            "Listing window received"
        );

        Ok(listing)
    }

    async fn fetch_detail(&self, id: RecordId) -> Result<DetailResponse, FetchError> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        let response = self.get(&url, &[]).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api(status.as_u16(), body));
        }

        let detail: DetailResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("Failed to parse detail {}: {}", id, e)))?;

        debug!(id, name = %detail.name, "Detail record received");

        Ok(detail)
    }
}
