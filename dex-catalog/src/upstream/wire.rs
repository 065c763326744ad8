//! Upstream response shapes
//!
//! Only the fields the catalog projects are declared; everything else in the
//! upstream payload is ignored by serde.

use crate::types::RecordId;
use serde::Deserialize;

/// `GET /pokemon?offset=&limit=`
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    /// Size of the whole upstream collection
    pub count: usize,
    pub results: Vec<NamedResource>,
}

/// Name + URL pair used throughout the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    /// Id taken from the last non-empty path segment of the URL
    ///
    /// `https://pokeapi.co/api/v2/pokemon/25/` → `Some(25)`
    pub fn trailing_id(&self) -> Option<RecordId> {
        self.url
            .split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .and_then(|segment| segment.parse().ok())
    }
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub species: Option<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}
