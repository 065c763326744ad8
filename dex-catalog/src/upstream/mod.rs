//! Upstream catalog service
//!
//! The core depends on exactly two read-only operations: an offset/limit
//! listing in ascending id order, and a per-id detail lookup. Both sit behind
//! [`CatalogSource`] so the shaping layer never sees HTTP.

pub mod client;
pub mod wire;

#[cfg(test)]
pub mod mock;

pub use client::PokeApiClient;
pub use wire::{DetailResponse, ListingResponse, NamedResource};

use crate::types::RecordId;
use async_trait::async_trait;
use thiserror::Error;

/// Upstream failure taxonomy
///
/// None of these are fatal: callers log them and treat the affected window or
/// item as absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Valid id without an upstream record
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// Id outside `1..=max_id`; no request is issued
    #[error("Id {id} outside 1..={max_id}")]
    OutOfRange { id: i64, max_id: RecordId },

    /// Non-success status other than 404 (treated like a network failure)
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Malformed response body
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Read-only access to the upstream collection
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Source name for log provenance
    fn name(&self) -> &'static str;

    /// One window of the collection in ascending id order
    async fn fetch_listing(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<ListingResponse, FetchError>;

    /// Full detail record for one id
    async fn fetch_detail(&self, id: RecordId) -> Result<DetailResponse, FetchError>;
}
