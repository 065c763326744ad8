//! Incremental page accumulation
//!
//! Owns the cursor, the accumulated result set, the active sort key and the
//! search overlay. Phases: `Idle --load_more--> Loading --> Loaded`, and any
//! phase `--change_sort--> Idle` with cursor and results cleared.
//!
//! Invariants held by every method:
//! - results contain each id at most once and are ordered by the active key
//! - at most one page load is in flight
//! - a load that completes after `change_sort` or a new search is discarded
//! - while a search is active `load_more` changes nothing
//!
//! Page loads and searches run in spawned tasks that own the engine state, so
//! a caller dropping its future never leaves the engine stuck in `Loading` or
//! a search stuck pending.

use super::collection_fetcher::CollectionFetcher;
use super::detail_enricher::DetailEnricher;
use super::search_resolver::SearchResolver;
use super::sort_resolver;
use crate::types::{
    CatalogView, EnginePhase, EnrichedRecord, EnrichmentLevel, PageCursor, RecordId, SortKey,
    ViewMode,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Consecutive loads without new records that count as exhaustion
const STALL_LIMIT: u32 = 2;

/// One enriched, ordered page
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<EnrichedRecord>,
    /// References in the window before enrichment
    pub window_len: usize,
    /// Collection total, `None` when the listing request failed
    pub total: Option<usize>,
}

#[derive(Debug, Clone)]
struct SearchOverlay {
    query: String,
    epoch: u64,
    results: Vec<EnrichedRecord>,
    pending: bool,
}

#[derive(Debug)]
struct EngineState {
    phase: EnginePhase,
    cursor: PageCursor,
    sort_key: SortKey,
    results: Vec<EnrichedRecord>,
    known_ids: HashSet<RecordId>,
    total: Option<usize>,
    stalled_loads: u32,
    /// Bumped whenever an in-flight load must be discarded
    generation: u64,
    search: Option<SearchOverlay>,
    search_epoch: u64,
}

impl EngineState {
    fn new(page_size: usize, sort_key: SortKey) -> Self {
        Self {
            phase: EnginePhase::Idle,
            cursor: PageCursor::new(page_size),
            sort_key,
            results: Vec::new(),
            known_ids: HashSet::new(),
            total: None,
            stalled_loads: 0,
            generation: 0,
            search: None,
            search_epoch: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.total.is_some_and(|total| self.cursor.offset >= total)
            || self.stalled_loads >= STALL_LIMIT
    }

    /// Union by id (existing records win), then re-sort the union
    fn merge(&mut self, incoming: Vec<EnrichedRecord>) -> usize {
        let mut added = 0;
        for record in incoming {
            if self.known_ids.insert(record.id) {
                self.results.push(record);
                added += 1;
            }
        }
        sort_resolver::sort_in_place(&mut self.results, self.sort_key);
        added
    }

    fn resting_phase(&self) -> EnginePhase {
        if self.results.is_empty() && self.cursor.offset == 0 {
            EnginePhase::Idle
        } else {
            EnginePhase::Loaded
        }
    }

    /// Drop any in-flight load and return to a resting phase
    fn supersede_load(&mut self) {
        self.generation += 1;
        if self.phase == EnginePhase::Loading {
            self.phase = self.resting_phase();
        }
    }

    /// Merge a finished page unless a newer operation superseded it
    fn apply_page(&mut self, generation: u64, cursor: PageCursor, sort_key: SortKey, page: Page) {
        if self.generation != generation {
            info!(
                offset = cursor.offset,
                sort = %sort_key,
                "Discarding page superseded by a newer operation"
            );
            return;
        }

        if page.total.is_some() {
            self.total = page.total;
        }
        let added = self.merge(page.records);
        self.cursor = cursor.advanced(self.total);
        self.stalled_loads = if added == 0 { self.stalled_loads + 1 } else { 0 };
        self.phase = EnginePhase::Loaded;

        info!(
            offset = self.cursor.offset,
            window = page.window_len,
            added,
            accumulated = self.results.len(),
            exhausted = self.exhausted(),
            "Page loaded"
        );
    }

    /// Install search results if `epoch` is still the active search
    fn install_search(&mut self, epoch: u64, mut results: Vec<EnrichedRecord>) -> bool {
        let sort_key = self.sort_key;
        match self.search.as_mut() {
            Some(overlay) if overlay.epoch == epoch => {
                sort_resolver::sort_in_place(&mut results, sort_key);
                overlay.results = results;
                overlay.pending = false;
                true
            }
            _ => {
                info!(epoch, "Discarding superseded search results");
                false
            }
        }
    }

    fn view(&self) -> CatalogView {
        let (records, mode, search_pending) = match &self.search {
            Some(overlay) => (
                overlay.results.clone(),
                ViewMode::Search {
                    query: overlay.query.clone(),
                },
                overlay.pending,
            ),
            None => (self.results.clone(), ViewMode::Browse, false),
        };

        let no_results =
            records.is_empty() && self.phase != EnginePhase::Loading && !search_pending;

        CatalogView {
            records,
            mode,
            phase: self.phase,
            cursor: self.cursor,
            sort: self.sort_key,
            total: self.total,
            exhausted: self.exhausted(),
            search_pending,
            no_results,
        }
    }
}

/// Composes fetcher, sorter and enricher into accumulated pages
pub struct PaginationEngine {
    fetcher: CollectionFetcher,
    enricher: DetailEnricher,
    level: EnrichmentLevel,
    state: Arc<Mutex<EngineState>>,
}

impl PaginationEngine {
    pub fn new(
        fetcher: CollectionFetcher,
        enricher: DetailEnricher,
        page_size: usize,
        sort_key: SortKey,
        level: EnrichmentLevel,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            level,
            state: Arc::new(Mutex::new(EngineState::new(page_size, sort_key))),
        }
    }

    /// One enriched page at `cursor` under `sort_key`, without touching state
    ///
    /// Listing failures are logged and produce an empty page.
    pub async fn list_page(&self, cursor: PageCursor, sort_key: SortKey) -> Page {
        fetch_page(&self.fetcher, &self.enricher, self.level, cursor, sort_key).await
    }

    /// Load the next page and merge it into the result set
    pub async fn load_more(&self) -> CatalogView {
        let (generation, cursor, sort_key) = {
            let mut state = self.state.lock().await;
            if state.search.is_some() {
                debug!("load_more suppressed while a search is active");
                return state.view();
            }
            if state.phase == EnginePhase::Loading {
                debug!("load_more ignored, a page is already in flight");
                return state.view();
            }
            if state.exhausted() {
                debug!(offset = state.cursor.offset, "load_more ignored, collection exhausted");
                return state.view();
            }
            state.phase = EnginePhase::Loading;
            (state.generation, state.cursor, state.sort_key)
        };

        let task = tokio::spawn({
            let state = Arc::clone(&self.state);
            let fetcher = self.fetcher.clone();
            let enricher = self.enricher.clone();
            let level = self.level;
            async move {
                let page = fetch_page(&fetcher, &enricher, level, cursor, sort_key).await;
                let mut state = state.lock().await;
                state.apply_page(generation, cursor, sort_key, page);
                state.view()
            }
        });

        match task.await {
            Ok(view) => view,
            Err(e) => {
                warn!(offset = cursor.offset, error = %e, "Page load task failed");
                let mut state = self.state.lock().await;
                if state.generation == generation && state.phase == EnginePhase::Loading {
                    state.phase = state.resting_phase();
                }
                state.view()
            }
        }
    }

    /// Switch ordering; always restarts accumulation
    pub async fn change_sort(&self, sort_key: SortKey) -> CatalogView {
        let mut state = self.state.lock().await;
        let page_size = state.cursor.page_size;

        state.generation += 1;
        state.phase = EnginePhase::Idle;
        state.cursor = PageCursor::new(page_size);
        state.sort_key = sort_key;
        state.results.clear();
        state.known_ids.clear();
        state.total = None;
        state.stalled_loads = 0;

        if let Some(overlay) = state.search.as_mut() {
            sort_resolver::sort_in_place(&mut overlay.results, sort_key);
        }

        info!(sort = %sort_key, "Sort changed, pagination reset");
        state.view()
    }

    /// Enter search mode for `query`; returns the epoch and active key
    ///
    /// Any in-flight page load is discarded; the accumulated result set is
    /// kept for when the search is cleared.
    pub async fn begin_search(&self, query: &str) -> (u64, SortKey) {
        let mut state = self.state.lock().await;
        state.supersede_load();
        state.search_epoch += 1;
        let epoch = state.search_epoch;
        state.search = Some(SearchOverlay {
            query: query.to_string(),
            epoch,
            results: Vec::new(),
            pending: true,
        });
        debug!(query = %query, epoch, "Search started");
        (epoch, state.sort_key)
    }

    /// Install search results if `epoch` is still the active search
    pub async fn complete_search(&self, epoch: u64, results: Vec<EnrichedRecord>) -> bool {
        self.state.lock().await.install_search(epoch, results)
    }

    /// Run `query` through `resolver` and show the results
    pub async fn search(&self, query: &str, resolver: &SearchResolver) -> CatalogView {
        let (epoch, sort_key) = self.begin_search(query).await;

        let task = tokio::spawn({
            let state = Arc::clone(&self.state);
            let resolver = resolver.clone();
            let query = query.to_string();
            async move {
                let results = resolver.search(&query, sort_key).await;
                state.lock().await.install_search(epoch, results);
            }
        });

        if let Err(e) = task.await {
            warn!(epoch, error = %e, "Search task failed");
            self.state.lock().await.install_search(epoch, Vec::new());
        }

        self.snapshot().await
    }

    /// Leave search mode; the paginated result set reappears unchanged
    pub async fn clear_search(&self) -> CatalogView {
        let mut state = self.state.lock().await;
        if state.search.take().is_some() {
            state.search_epoch += 1;
            debug!("Search cleared");
        }
        state.view()
    }

    pub async fn snapshot(&self) -> CatalogView {
        self.state.lock().await.view()
    }
}

async fn fetch_page(
    fetcher: &CollectionFetcher,
    enricher: &DetailEnricher,
    level: EnrichmentLevel,
    cursor: PageCursor,
    sort_key: SortKey,
) -> Page {
    let window = match fetcher.fetch_window(cursor, sort_key).await {
        Ok(window) => window,
        Err(e) => {
            warn!(
                offset = cursor.offset,
                sort = %sort_key,
                error = %e,
                "Window fetch failed, treating as empty"
            );
            return Page::default();
        }
    };

    let records = enricher.enrich_all(&window.references, level).await;
    Page {
        records: sort_resolver::sort(records, sort_key),
        window_len: window.references.len(),
        total: Some(window.total),
    }
}
