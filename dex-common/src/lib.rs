//! # Dex Common Library
//!
//! Shared code for the dex catalog services:
//! - Error and result types
//! - TOML configuration loading and override resolution
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
