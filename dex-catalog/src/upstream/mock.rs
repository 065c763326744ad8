//! In-memory catalog source for unit tests

use super::wire::{AbilitySlot, DetailResponse, ListingResponse, NamedResource, StatSlot, TypeSlot};
use super::{CatalogSource, FetchError};
use crate::types::RecordId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Mock upstream holding `(id, name)` entries in listing order
pub struct MockSource {
    entries: Vec<(RecordId, String)>,
    categories: HashMap<RecordId, Vec<String>>,
    failing_details: HashSet<RecordId>,
    listing_fails: AtomicBool,
    /// When set, each listing call waits for one permit
    listing_gate: Option<Arc<Semaphore>>,
    pub listing_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub listing_limits: Mutex<Vec<(usize, usize)>>,
}

impl MockSource {
    /// Entries with ids 1..=names.len()
    pub fn with_names(names: &[&str]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| ((i + 1) as RecordId, (*name).to_string()))
            .collect();
        Self::with_entries(entries)
    }

    /// Entries named `mon-001`, `mon-002`, ... with ids 1..=count
    pub fn numbered(count: usize) -> Self {
        let entries = (1..=count)
            .map(|i| (i as RecordId, format!("mon-{:03}", i)))
            .collect();
        Self::with_entries(entries)
    }

    pub fn with_entries(entries: Vec<(RecordId, String)>) -> Self {
        Self {
            entries,
            categories: HashMap::new(),
            failing_details: HashSet::new(),
            listing_fails: AtomicBool::new(false),
            listing_gate: None,
            listing_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            listing_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_categories(mut self, id: RecordId, categories: &[&str]) -> Self {
        self.categories
            .insert(id, categories.iter().map(|c| (*c).to_string()).collect());
        self
    }

    pub fn failing_detail(mut self, id: RecordId) -> Self {
        self.failing_details.insert(id);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.listing_gate = Some(gate);
        self
    }

    pub fn set_listing_fails(&self, fails: bool) {
        self.listing_fails.store(fails, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn fetch_listing(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<ListingResponse, FetchError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut limits) = self.listing_limits.lock() {
            limits.push((offset, limit));
        }

        if let Some(gate) = &self.listing_gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            permit.forget();
        }

        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(FetchError::Network("mock listing failure".to_string()));
        }

        let results = self
            .entries
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, name)| NamedResource {
                name: name.clone(),
                url: format!("https://mock.test/api/v2/pokemon/{}/", id),
            })
            .collect();

        Ok(ListingResponse {
            count: self.entries.len(),
            results,
        })
    }

    async fn fetch_detail(&self, id: RecordId) -> Result<DetailResponse, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_details.contains(&id) {
            return Err(FetchError::Network(format!("mock detail failure {}", id)));
        }

        let name = self
            .entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, name)| name.clone())
            .ok_or(FetchError::NotFound(id))?;

        let categories = self
            .categories
            .get(&id)
            .cloned()
            .unwrap_or_else(|| vec!["normal".to_string()]);

        Ok(DetailResponse {
            id,
            name: name.clone(),
            height: Some(id * 2),
            weight: Some(id * 10),
            types: categories
                .into_iter()
                .enumerate()
                .map(|(slot, name)| TypeSlot {
                    slot: Some(slot as u32 + 1),
                    kind: NamedResource {
                        name,
                        url: String::new(),
                    },
                })
                .collect(),
            abilities: vec![AbilitySlot {
                ability: NamedResource {
                    name: format!("ability-{}", id),
                    url: String::new(),
                },
                is_hidden: false,
            }],
            stats: vec![StatSlot {
                base_stat: 45 + id,
                stat: NamedResource {
                    name: "hp".to_string(),
                    url: String::new(),
                },
            }],
            species: Some(NamedResource {
                name,
                url: String::new(),
            }),
        })
    }
}
