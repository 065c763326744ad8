//! Deterministic ordering of references and records
//!
//! Pure functions. Sorting is stable: records whose keys compare equal keep
//! their existing relative order in both directions.

use crate::types::{EnrichedRecord, RecordId, SortDirection, SortField, SortKey, SummaryReference};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use std::cmp::Ordering;
use tracing::warn;

/// Anything that can be ordered by id or name
pub trait Sortable {
    fn sort_id(&self) -> RecordId;
    fn sort_name(&self) -> &str;
}

impl Sortable for EnrichedRecord {
    fn sort_id(&self) -> RecordId {
        self.id
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

impl Sortable for SummaryReference {
    fn sort_id(&self) -> RecordId {
        self.id
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

thread_local! {
    static COLLATOR: Option<CollatorBorrowed<'static>> =
        match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!(error = %e, "Root collator unavailable, names compare by code point");
                None
            }
        };
}

/// Locale-aware name comparison (root collation)
///
/// Only exact collation ties fall back to comparing the raw text, so the
/// ordering stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let collated = COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => Ordering::Equal,
    });
    collated.then_with(|| a.cmp(b))
}

/// Compare two items under `key`
pub fn compare<T: Sortable>(a: &T, b: &T, key: SortKey) -> Ordering {
    let ordering = match key.field {
        SortField::Id => a.sort_id().cmp(&b.sort_id()),
        SortField::Name => compare_names(a.sort_name(), b.sort_name()),
    };
    match key.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable in-place sort
pub fn sort_in_place<T: Sortable>(items: &mut [T], key: SortKey) {
    items.sort_by(|a, b| compare(a, b, key));
}

/// Stable sort returning the ordered sequence
pub fn sort<T: Sortable>(mut items: Vec<T>, key: SortKey) -> Vec<T> {
    sort_in_place(&mut items, key);
    items
}

/// Whether `items` is already ordered under `key`
pub fn is_sorted<T: Sortable>(items: &[T], key: SortKey) -> bool {
    items
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1], key) != Ordering::Greater)
}
