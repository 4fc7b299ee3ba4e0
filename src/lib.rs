//! Indie game scouting over a Steam catalog export.
//!
//! Pipeline: load + enrich the export once ([`catalog`]), filter it per query
//! ([`filter`]), then pick the Brightest Star and Underdog from the filtered
//! view ([`insight`]). [`service::CatalogService`] ties the steps together for
//! a presentation layer.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod insight;
pub mod logging;
pub mod normalization;
pub mod service;

pub mod util {
    pub mod env;
}

pub use catalog::{EnrichedCatalog, GameRecord, LoadOptions};
pub use config::ScoutConfig;
pub use error::CatalogError;
pub use filter::{Bounds, FilterCriteria};
pub use insight::{InsightKind, Insights};
pub use normalization::PublisherConfidence;
pub use service::{CatalogService, QueryResult};
