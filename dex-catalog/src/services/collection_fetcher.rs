//! Listing-window retrieval
//!
//! The upstream listing only windows in ascending id order. Two strategies
//! hide that behind one call:
//! - [`WindowStrategy::Native`]: id ordering, upstream offset/limit directly
//! - [`WindowStrategy::FullSortSlice`]: name ordering, fetch the whole
//!   collection (bounded by max_id), sort it, slice the window locally
//!
//! The direction of an id ordering is left to the caller's re-sort, so the two
//! descending orders start from different ends. `ID_DESC` page one holds ids
//! `page_size..=1` (the lowest window, reversed) and later pages extend upward,
//! each load re-sorting the accumulated set. `NAME_DESC` page one holds the
//! globally last names. Serving ids from the top would need the collection
//! count before the first window, which the listing only reports alongside one.

use super::sort_resolver;
use crate::types::{PageCursor, RecordId, SortField, SortKey, SummaryReference};
use crate::upstream::{CatalogSource, FetchError, ListingResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a window is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStrategy {
    Native,
    FullSortSlice,
}

impl WindowStrategy {
    pub fn for_field(field: SortField) -> Self {
        match field {
            SortField::Id => Self::Native,
            SortField::Name => Self::FullSortSlice,
        }
    }
}

/// One page's worth of references, before enrichment
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub references: Vec<SummaryReference>,
    /// Collection size as far as this catalog is concerned (capped at max_id)
    pub total: usize,
}

/// Fetches windows or the whole collection from the listing endpoint
#[derive(Clone)]
pub struct CollectionFetcher {
    source: Arc<dyn CatalogSource>,
    max_id: RecordId,
}

impl CollectionFetcher {
    pub fn new(source: Arc<dyn CatalogSource>, max_id: RecordId) -> Self {
        Self { source, max_id }
    }

    pub fn max_id(&self) -> RecordId {
        self.max_id
    }

    /// Window `[offset, offset + page_size)` under `sort_key`
    pub async fn fetch_window(
        &self,
        cursor: PageCursor,
        sort_key: SortKey,
    ) -> Result<Window, FetchError> {
        let strategy = WindowStrategy::for_field(sort_key.field);
        debug!(
            source = self.source.name(),
            offset = cursor.offset,
            page_size = cursor.page_size,
            sort = %sort_key,
            strategy = ?strategy,
            "Fetching window"
        );

        match strategy {
            WindowStrategy::Native => self.fetch_native(cursor).await,
            WindowStrategy::FullSortSlice => {
                let all = sort_resolver::sort(self.fetch_all().await?, sort_key);
                let total = all.len();
                let references = all
                    .into_iter()
                    .skip(cursor.offset)
                    .take(cursor.page_size)
                    .collect();
                Ok(Window { references, total })
            }
        }
    }

    /// Whole collection in upstream (ascending id) order, ids above max_id removed
    pub async fn fetch_all(&self) -> Result<Vec<SummaryReference>, FetchError> {
        let listing = self
            .source
            .fetch_listing(0, self.max_id as usize)
            .await?;
        Ok(self.references_from(listing))
    }

    async fn fetch_native(&self, cursor: PageCursor) -> Result<Window, FetchError> {
        let max = self.max_id as usize;
        if cursor.offset >= max {
            debug!(offset = cursor.offset, max_id = self.max_id, "Window starts past max_id");
            return Ok(Window {
                references: Vec::new(),
                total: max,
            });
        }

        let limit = cursor.page_size.min(max - cursor.offset);
        let listing = self.source.fetch_listing(cursor.offset, limit).await?;
        let total = listing.count.min(max);

        Ok(Window {
            references: self.references_from(listing),
            total,
        })
    }

    fn references_from(&self, listing: ListingResponse) -> Vec<SummaryReference> {
        listing
            .results
            .into_iter()
            .filter_map(|entry| match entry.trailing_id() {
                Some(id) if (1..=self.max_id).contains(&id) => Some(SummaryReference {
                    id,
                    name: entry.name,
                    reference_url: entry.url,
                }),
                Some(id) => {
                    debug!(id, max_id = self.max_id, "Dropping reference beyond max_id");
                    None
                }
                None => {
                    warn!(name = %entry.name, url = %entry.url, "Reference URL carries no id");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::mock::MockSource;

    fn ids(window: &Window) -> Vec<RecordId> {
        window.references.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_id_window_uses_upstream_offset() {
        let source = Arc::new(MockSource::numbered(50));
        let fetcher = CollectionFetcher::new(source.clone(), 1025);

        let cursor = PageCursor {
            offset: 10,
            page_size: 10,
        };
        let window = fetcher.fetch_window(cursor, SortKey::ID_ASC).await.unwrap();

        assert_eq!(ids(&window), (11..=20).collect::<Vec<_>>());
        assert_eq!(window.total, 50);
        assert_eq!(*source.listing_limits.lock().unwrap(), vec![(10, 10)]);
    }

    #[tokio::test]
    async fn test_descending_id_window_is_still_ascending_from_upstream() {
        let fetcher = CollectionFetcher::new(Arc::new(MockSource::numbered(30)), 1025);
        let window = fetcher
            .fetch_window(PageCursor::new(5), SortKey::ID_DESC)
            .await
            .unwrap();
        assert_eq!(ids(&window), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_name_window_sorts_full_collection_then_slices() {
        let source = Arc::new(MockSource::with_names(&[
            "pikachu", "abra", "mew", "zubat", "eevee", "bulbasaur",
        ]));
        let fetcher = CollectionFetcher::new(source.clone(), 1025);

        let first = fetcher
            .fetch_window(PageCursor::new(3), SortKey::NAME_ASC)
            .await
            .unwrap();
        let second = fetcher
            .fetch_window(
                PageCursor {
                    offset: 3,
                    page_size: 3,
                },
                SortKey::NAME_ASC,
            )
            .await
            .unwrap();

        let names = |w: &Window| w.references.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&first), vec!["abra", "bulbasaur", "eevee"]);
        assert_eq!(names(&second), vec!["mew", "pikachu", "zubat"]);
        assert_eq!(*source.listing_limits.lock().unwrap(), vec![(0, 1025), (0, 1025)]);
    }

    #[tokio::test]
    async fn test_max_id_bounds_windows() {
        let source = Arc::new(MockSource::numbered(40));
        let fetcher = CollectionFetcher::new(source.clone(), 25);

        let window = fetcher
            .fetch_window(
                PageCursor {
                    offset: 20,
                    page_size: 10,
                },
                SortKey::ID_ASC,
            )
            .await
            .unwrap();
        assert_eq!(ids(&window), vec![21, 22, 23, 24, 25]);
        assert_eq!(window.total, 25);

        let past = fetcher
            .fetch_window(
                PageCursor {
                    offset: 30,
                    page_size: 10,
                },
                SortKey::ID_ASC,
            )
            .await
            .unwrap();
        assert!(past.references.is_empty());
        assert_eq!(source.listing_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_drops_ids_beyond_max() {
        let source = MockSource::with_entries(vec![
            (1, "bulbasaur".to_string()),
            (2, "ivysaur".to_string()),
            (10001, "deoxys-attack".to_string()),
        ]);
        let fetcher = CollectionFetcher::new(Arc::new(source), 1025);

        let all = fetcher.fetch_all().await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported() {
        let source = MockSource::numbered(5);
        source.set_listing_fails(true);
        let fetcher = CollectionFetcher::new(Arc::new(source), 1025);

        let result = fetcher.fetch_window(PageCursor::new(5), SortKey::ID_ASC).await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
