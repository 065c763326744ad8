//! Core domain types for the catalog
//!
//! Records flow through three shapes:
//! - [`SummaryReference`]: an upstream listing entry before enrichment
//! - [`EnrichedRecord`]: the normalised record handed to presentation code
//! - [`CatalogView`]: a snapshot of what the consumer should display

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upstream record identifier (1..=max_id)
pub type RecordId = u32;

/// Largest attribute value reported upstream
pub const ATTRIBUTE_MAX: u8 = 255;

// ============================================================================
// Records
// ============================================================================

/// Minimal upstream pointer to a record
///
/// The listing endpoint returns the name alongside the URL; it is kept so the
/// collection can be ordered and filtered by name without enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReference {
    pub id: RecordId,
    pub name: String,
    pub reference_url: String,
}

/// One named base attribute (e.g. `hp`, `attack`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: u8,
}

impl Attribute {
    /// Share of the 255 maximum, as a percentage
    pub fn percent_of_max(&self) -> f64 {
        f64::from(self.value) / f64::from(ATTRIBUTE_MAX) * 100.0
    }
}

/// Fully normalised record
///
/// Summary enrichment fills only `id`, `name` and `categories`; full
/// enrichment fills the optional detail fields too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: RecordId,
    pub name: String,
    /// Category tags in upstream slot order
    pub categories: Vec<String>,
    /// Height in decimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Weight in hectograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

/// How much of the detail record to project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentLevel {
    /// id, name, categories (list views)
    #[default]
    Summary,
    /// every field the detail endpoint offers
    Full,
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active ordering, written `id_asc`, `id_desc`, `name_asc` or `name_desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub const ID_ASC: Self = Self::new(SortField::Id, SortDirection::Ascending);
    pub const ID_DESC: Self = Self::new(SortField::Id, SortDirection::Descending);
    pub const NAME_ASC: Self = Self::new(SortField::Name, SortDirection::Ascending);
    pub const NAME_DESC: Self = Self::new(SortField::Name, SortDirection::Descending);

    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::ID_ASC
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::Id => "id",
            SortField::Name => "name",
        };
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}_{}", field, direction)
    }
}

/// Unrecognised sort key text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort key '{0}' (expected id_asc, id_desc, name_asc or name_desc)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id_asc" => Ok(Self::ID_ASC),
            "id_desc" => Ok(Self::ID_DESC),
            "name_asc" => Ok(Self::NAME_ASC),
            "name_desc" => Ok(Self::NAME_DESC),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SortKey {
    type Error = ParseSortKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Incremental-load progress
///
/// Measured in upstream offset, not in accumulated distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub offset: usize,
    pub page_size: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// End of the window `[offset, offset + page_size)`
    pub fn window_end(&self) -> usize {
        self.offset.saturating_add(self.page_size)
    }

    /// Cursor one page further on, never beyond `total` when it is known
    pub fn advanced(&self, total: Option<usize>) -> Self {
        let next = self.window_end();
        Self {
            offset: total.map_or(next, |total| next.min(total.max(self.offset))),
            page_size: self.page_size,
        }
    }
}

// ============================================================================
// View snapshot
// ============================================================================

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePhase {
    Idle,
    Loading,
    Loaded,
}

/// Which sequence the consumer is looking at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ViewMode {
    Browse,
    Search { query: String },
}

/// Snapshot of everything presentation code needs to render the list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogView {
    /// Visible sequence: accumulated pages, or search results in search mode
    pub records: Vec<EnrichedRecord>,
    #[serde(flatten)]
    pub mode: ViewMode,
    pub phase: EnginePhase,
    pub cursor: PageCursor,
    pub sort: SortKey,
    /// Collection total as last reported upstream (capped at max_id)
    pub total: Option<usize>,
    /// No further `load_more` will produce records under this sort key
    pub exhausted: bool,
    pub search_pending: bool,
    /// Visible sequence is empty and nothing is in flight
    pub no_results: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_text_forms() {
        for key in [
            SortKey::ID_ASC,
            SortKey::ID_DESC,
            SortKey::NAME_ASC,
            SortKey::NAME_DESC,
        ] {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
        assert_eq!("Name_Desc".parse::<SortKey>(), Ok(SortKey::NAME_DESC));
        assert!("weight_asc".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_key_serde_uses_text_form() {
        let json = serde_json::to_string(&SortKey::NAME_ASC).unwrap();
        assert_eq!(json, "\"name_asc\"");
        let parsed: SortKey = serde_json::from_str("\"id_desc\"").unwrap();
        assert_eq!(parsed, SortKey::ID_DESC);
    }

    #[test]
    fn test_cursor_advances_by_page_size() {
        let cursor = PageCursor::new(10);
        let next = cursor.advanced(None).advanced(Some(1025));
        assert_eq!(next.offset, 20);
    }

    #[test]
    fn test_cursor_clamps_at_total() {
        let cursor = PageCursor {
            offset: 1020,
            page_size: 10,
        };
        assert_eq!(cursor.advanced(Some(1025)).offset, 1025);
        assert_eq!(cursor.advanced(Some(1025)).advanced(Some(1025)).offset, 1025);
    }

    #[test]
    fn test_zero_page_size_is_lifted() {
        assert_eq!(PageCursor::new(0).page_size, 1);
    }

    #[test]
    fn test_attribute_percent() {
        let attr = Attribute {
            name: "hp".to_string(),
            value: 51,
        };
        assert!((attr.percent_of_max() - 20.0).abs() < 1e-9);
    }
}
