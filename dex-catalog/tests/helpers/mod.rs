//! Upstream fixtures for integration tests
//!
//! A wiremock server that answers the listing and detail routes from a fixed
//! list of names, ids assigned from 1 in listing order.

#![allow(dead_code)]

use dex_catalog::upstream::PokeApiClient;
use dex_catalog::{Catalog, CatalogOptions};
use dex_common::config::UpstreamConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_PREFIX: &str = "/api/v2";

/// Answers `GET /pokemon?offset=&limit=` by slicing the name list
#[derive(Clone)]
pub struct ListingResponder {
    names: Arc<Vec<String>>,
    base: String,
}

impl Respond for ListingResponder {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let param = |key: &str, default: usize| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(default)
        };
        let offset = param("offset", 0);
        let limit = param("limit", 20);

        let results: Vec<Value> = self
            .names
            .iter()
            .enumerate()
            .skip(offset)
            .take(limit)
            .map(|(i, name)| {
                json!({
                    "name": name,
                    "url": format!("{}/pokemon/{}/", self.base, i + 1),
                })
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "count": self.names.len(),
            "next": null,
            "previous": null,
            "results": results,
        }))
    }
}

/// Answers `GET /pokemon/{id}`; ids past the list are 404
#[derive(Clone)]
pub struct DetailResponder {
    names: Arc<Vec<String>>,
}

impl Respond for DetailResponder {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let id = req
            .url
            .path_segments()
            .and_then(|segments| segments.last().map(str::to_string))
            .and_then(|segment| segment.parse::<usize>().ok());

        match id {
            Some(id) if id >= 1 && id <= self.names.len() => {
                ResponseTemplate::new(200).set_body_json(detail_json(id, &self.names[id - 1]))
            }
            _ => ResponseTemplate::new(404).set_body_string("Not Found"),
        }
    }
}

/// Detail payload in upstream shape
pub fn detail_json(id: usize, name: &str) -> Value {
    let kind = if id % 2 == 0 { "water" } else { "fire" };
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "base_experience": 64,
        "types": [
            {"slot": 1, "type": {"name": kind, "url": "https://pokeapi.co/api/v2/type/1/"}}
        ],
        "abilities": [
            {"ability": {"name": "overgrow", "url": ""}, "is_hidden": false, "slot": 1}
        ],
        "stats": [
            {"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 49, "effort": 0, "stat": {"name": "attack", "url": ""}}
        ],
        "species": {"name": name, "url": ""}
    })
}

/// Start a server answering listing and detail requests for `names`
pub async fn start_upstream(names: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    let names: Arc<Vec<String>> = Arc::new(names.iter().map(|n| (*n).to_string()).collect());
    let base = format!("{}{}", server.uri(), API_PREFIX);

    Mock::given(method("GET"))
        .and(path(format!("{}/pokemon", API_PREFIX)))
        .respond_with(ListingResponder {
            names: Arc::clone(&names),
            base,
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v2/pokemon/\d+$"))
        .respond_with(DetailResponder { names })
        .mount(&server)
        .await;

    server
}

/// `mon-001`, `mon-002`, ...
pub fn numbered_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("mon-{:03}", i)).collect()
}

pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        base_url: format!("{}{}", server.uri(), API_PREFIX),
        timeout_secs: 5,
        ..Default::default()
    }
}

pub fn client_for(server: &MockServer) -> PokeApiClient {
    PokeApiClient::new(&upstream_config(server)).unwrap()
}

pub fn catalog_for(server: &MockServer, max_id: u32, page_size: usize) -> Catalog {
    Catalog::new(
        Arc::new(client_for(server)),
        CatalogOptions {
            max_id,
            page_size,
            ..CatalogOptions::default()
        },
    )
}
