//! Detail enrichment
//!
//! Turns summary references into normalised records, one detail request per
//! reference. Batches fan out concurrently and are reassembled in input
//! order; a failed item is dropped and logged, never failing the batch.

use crate::types::{Attribute, EnrichedRecord, EnrichmentLevel, RecordId, SummaryReference};
use crate::upstream::{CatalogSource, DetailResponse, FetchError};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct DetailEnricher {
    source: Arc<dyn CatalogSource>,
    max_id: RecordId,
}

impl DetailEnricher {
    pub fn new(source: Arc<dyn CatalogSource>, max_id: RecordId) -> Self {
        Self { source, max_id }
    }

    /// Full detail record
    pub async fn enrich(&self, reference: &SummaryReference) -> Result<EnrichedRecord, FetchError> {
        self.enrich_id(reference.id, EnrichmentLevel::Full).await
    }

    /// Lightweight record: id, name, categories
    pub async fn enrich_summary(
        &self,
        reference: &SummaryReference,
    ) -> Result<EnrichedRecord, FetchError> {
        self.enrich_id(reference.id, EnrichmentLevel::Summary).await
    }

    /// Enrich a bare id, rejecting ids outside `1..=max_id` without a request
    pub async fn enrich_id(
        &self,
        id: RecordId,
        level: EnrichmentLevel,
    ) -> Result<EnrichedRecord, FetchError> {
        if id == 0 || id > self.max_id {
            return Err(FetchError::OutOfRange {
                id: i64::from(id),
                max_id: self.max_id,
            });
        }

        let detail = self.source.fetch_detail(id).await?;
        if detail.id != id {
            return Err(FetchError::Decode(format!(
                "Requested id {} but upstream returned id {}",
                id, detail.id
            )));
        }

        Ok(project(detail, level))
    }

    /// Enrich a window concurrently, preserving window order
    ///
    /// Failures are logged and dropped.
    pub async fn enrich_all(
        &self,
        references: &[SummaryReference],
        level: EnrichmentLevel,
    ) -> Vec<EnrichedRecord> {
        let futures = references.iter().map(|reference| async move {
            match self.enrich_id(reference.id, level).await {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        source = self.source.name(),
                        id = reference.id,
                        error = %e,
                        "Enrichment failed, dropping record from page"
                    );
                    None
                }
            }
        });

        let records: Vec<EnrichedRecord> = join_all(futures).await.into_iter().flatten().collect();

        debug!(
            requested = references.len(),
            enriched = records.len(),
            level = ?level,
            "Window enrichment complete"
        );

        records
    }
}

/// Project an upstream detail payload into the normalised shape
pub fn project(detail: DetailResponse, level: EnrichmentLevel) -> EnrichedRecord {
    let categories = detail.types.into_iter().map(|slot| slot.kind.name).collect();

    match level {
        EnrichmentLevel::Summary => EnrichedRecord {
            id: detail.id,
            name: detail.name,
            categories,
            height: None,
            weight: None,
            abilities: None,
            attributes: None,
            species: None,
        },
        EnrichmentLevel::Full => EnrichedRecord {
            id: detail.id,
            name: detail.name,
            categories,
            height: detail.height,
            weight: detail.weight,
            abilities: Some(
                detail
                    .abilities
                    .into_iter()
                    .map(|slot| slot.ability.name)
                    .collect(),
            ),
            attributes: Some(
                detail
                    .stats
                    .into_iter()
                    .map(|slot| Attribute {
                        name: slot.stat.name,
                        value: u8::try_from(slot.base_stat).unwrap_or(u8::MAX),
                    })
                    .collect(),
            ),
            species: detail.species.map(|species| species.name),
        },
    }
}
