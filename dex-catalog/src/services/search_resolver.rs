//! Free-text and numeric search
//!
//! Independent of the pagination cursor. A numeric query is an exact id
//! lookup; anything else is a case-insensitive substring scan over the names
//! of the whole collection.

use super::collection_fetcher::CollectionFetcher;
use super::detail_enricher::DetailEnricher;
use super::sort_resolver;
use crate::types::{EnrichedRecord, EnrichmentLevel, RecordId, SortKey};
use crate::upstream::FetchError;
use tracing::{debug, info, warn};

/// Interpreted search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Empty,
    Id(RecordId),
    /// Integer outside `1..=max_id`
    OutOfRange(i64),
    /// Lowercased name fragment
    Name(String),
}

impl SearchQuery {
    pub fn parse(raw: &str, max_id: RecordId) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        match trimmed.parse::<i64>() {
            Ok(n) if (1..=i64::from(max_id)).contains(&n) => Self::Id(n as RecordId),
            Ok(n) => Self::OutOfRange(n),
            Err(_) => Self::Name(trimmed.to_lowercase()),
        }
    }
}

#[derive(Clone)]
pub struct SearchResolver {
    fetcher: CollectionFetcher,
    enricher: DetailEnricher,
}

impl SearchResolver {
    pub fn new(fetcher: CollectionFetcher, enricher: DetailEnricher) -> Self {
        Self { fetcher, enricher }
    }

    /// Matching records ordered by `sort_key`
    ///
    /// Upstream failures yield an empty result and are logged here.
    pub async fn search(&self, query: &str, sort_key: SortKey) -> Vec<EnrichedRecord> {
        let parsed = SearchQuery::parse(query, self.fetcher.max_id());
        debug!(query = %query, parsed = ?parsed, "Resolving search");

        let results = match parsed {
            SearchQuery::Empty => Vec::new(),
            SearchQuery::OutOfRange(n) => {
                debug!(query = n, max_id = self.fetcher.max_id(), "Numeric query out of range");
                Vec::new()
            }
            SearchQuery::Id(id) => match self.enricher.enrich_id(id, EnrichmentLevel::Full).await {
                Ok(record) => vec![record],
                Err(FetchError::NotFound(_)) => Vec::new(),
                Err(e) => {
                    warn!(id, error = %e, "Id lookup failed");
                    Vec::new()
                }
            },
            SearchQuery::Name(fragment) => self.search_names(&fragment).await,
        };

        let results = sort_resolver::sort(results, sort_key);
        info!(query = %query, matches = results.len(), sort = %sort_key, "Search complete");
        results
    }

    async fn search_names(&self, fragment: &str) -> Vec<EnrichedRecord> {
        let all = match self.fetcher.fetch_all().await {
            Ok(all) => all,
            Err(e) => {
                warn!(error = %e, "Collection fetch for search failed");
                return Vec::new();
            }
        };

        let matches: Vec<_> = all
            .into_iter()
            .filter(|reference| reference.name.to_lowercase().contains(fragment))
            .collect();

        self.enricher
            .enrich_all(&matches, EnrichmentLevel::Summary)
            .await
    }
}
