//! Catalog facade
//!
//! Single entry point the HTTP layer talks to. Owns the pagination engine and
//! the search resolver, and assembles detail views.

use crate::services::{
    display_number, weaknesses_of, CollectionFetcher, DetailEnricher, ImageUrlFormatter, Page,
    PaginationEngine, SearchResolver,
};
use crate::types::{
    CatalogView, EnrichedRecord, EnrichmentLevel, PageCursor, RecordId, SortKey,
};
use crate::upstream::{CatalogSource, FetchError, PokeApiClient};
use dex_common::config::{CatalogSettings, TomlConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Shaping parameters resolved from configuration
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub max_id: RecordId,
    pub page_size: usize,
    pub image_url_template: String,
    pub sort_key: SortKey,
    /// Enrichment applied to paginated list entries
    pub list_level: EnrichmentLevel,
}

impl From<&CatalogSettings> for CatalogOptions {
    fn from(settings: &CatalogSettings) -> Self {
        Self {
            max_id: settings.max_id,
            page_size: settings.page_size as usize,
            image_url_template: settings.image_url_template.clone(),
            sort_key: SortKey::default(),
            list_level: EnrichmentLevel::Summary,
        }
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::from(&CatalogSettings::default())
    }
}

/// One attribute with its share of the maximum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeShare {
    pub name: String,
    pub value: u8,
    pub percent: f64,
}

/// Everything the detail view renders for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDetail {
    pub record: EnrichedRecord,
    /// `#001` style number
    pub display_number: String,
    pub image_url: String,
    pub weaknesses: Vec<String>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub attributes: Vec<AttributeShare>,
    pub previous_id: Option<RecordId>,
    pub next_id: Option<RecordId>,
}

pub struct Catalog {
    enricher: DetailEnricher,
    search: SearchResolver,
    engine: PaginationEngine,
    images: ImageUrlFormatter,
    max_id: RecordId,
    page_size: usize,
    source_name: &'static str,
}

impl Catalog {
    pub fn new(source: Arc<dyn CatalogSource>, options: CatalogOptions) -> Self {
        let fetcher = CollectionFetcher::new(Arc::clone(&source), options.max_id);
        let enricher = DetailEnricher::new(Arc::clone(&source), options.max_id);

        Self {
            search: SearchResolver::new(fetcher.clone(), enricher.clone()),
            engine: PaginationEngine::new(
                fetcher,
                enricher.clone(),
                options.page_size,
                options.sort_key,
                options.list_level,
            ),
            enricher,
            images: ImageUrlFormatter::new(options.image_url_template),
            max_id: options.max_id,
            page_size: options.page_size.max(1),
            source_name: source.name(),
        }
    }

    /// Catalog backed by the live upstream client
    pub fn from_config(config: &TomlConfig) -> Result<Self, FetchError> {
        let client = PokeApiClient::new(&config.upstream)?;
        info!(
            base_url = %client.base_url(),
            max_id = config.catalog.max_id,
            page_size = config.catalog.page_size,
            "Catalog initialised"
        );
        Ok(Self::new(Arc::new(client), CatalogOptions::from(&config.catalog)))
    }

    pub fn max_id(&self) -> RecordId {
        self.max_id
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    pub async fn view(&self) -> CatalogView {
        self.engine.snapshot().await
    }

    pub async fn list_page(&self, cursor: PageCursor, sort_key: SortKey) -> Page {
        self.engine.list_page(cursor, sort_key).await
    }

    pub async fn load_more(&self) -> CatalogView {
        self.engine.load_more().await
    }

    pub async fn change_sort(&self, sort_key: SortKey) -> CatalogView {
        self.engine.change_sort(sort_key).await
    }

    /// Run a search and show its results; a blank query clears search mode
    pub async fn search(&self, query: &str) -> CatalogView {
        if query.trim().is_empty() {
            return self.engine.clear_search().await;
        }

        self.engine.search(query, &self.search).await
    }

    pub async fn clear_search(&self) -> CatalogView {
        self.engine.clear_search().await
    }

    pub fn weaknesses_of<I, S>(&self, categories: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        weaknesses_of(categories)
    }

    pub fn image_url_for(&self, id: RecordId) -> String {
        self.images.url_for(id)
    }

    /// Fully enriched record with derived presentation values
    pub async fn record_detail(&self, id: RecordId) -> Result<RecordDetail, FetchError> {
        let record = self.enricher.enrich_id(id, EnrichmentLevel::Full).await?;

        let attributes = record
            .attributes
            .iter()
            .flatten()
            .map(|attribute| AttributeShare {
                name: attribute.name.clone(),
                value: attribute.value,
                percent: attribute.percent_of_max(),
            })
            .collect();

        Ok(RecordDetail {
            display_number: display_number(record.id),
            image_url: self.images.url_for(record.id),
            weaknesses: weaknesses_of(&record.categories),
            height_m: record.height.map(tenths),
            weight_kg: record.weight.map(tenths),
            attributes,
            previous_id: (record.id > 1).then(|| record.id - 1),
            next_id: (record.id < self.max_id).then(|| record.id + 1),
            record,
        })
    }
}

/// Decimetres to metres, hectograms to kilograms
fn tenths(value: u32) -> f64 {
    f64::from(value) / 10.0
}
