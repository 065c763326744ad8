//! HTTP API handlers for dex-catalog

pub mod catalog;
pub mod health;
pub mod records;

pub use catalog::catalog_routes;
pub use health::health_routes;
pub use records::record_routes;
