//! Data-shaping services
//!
//! Leaf helpers (sorting, weaknesses, media URLs) are pure; the fetcher,
//! enricher and search resolver talk to a [`crate::upstream::CatalogSource`];
//! the pagination engine composes them into accumulated pages.

pub mod collection_fetcher;
pub mod detail_enricher;
pub mod media;
pub mod pagination_engine;
pub mod search_resolver;
pub mod sort_resolver;
pub mod weakness_resolver;

pub use collection_fetcher::{CollectionFetcher, Window, WindowStrategy};
pub use detail_enricher::DetailEnricher;
pub use media::{display_number, padded_id, ImageUrlFormatter};
pub use pagination_engine::{Page, PaginationEngine};
pub use search_resolver::{SearchQuery, SearchResolver};
pub use sort_resolver::Sortable;
pub use weakness_resolver::weaknesses_of;
