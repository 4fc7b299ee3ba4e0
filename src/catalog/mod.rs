//! Enriched game catalog: raw Steam export rows plus the derived review, age
//! and publisher-confidence fields the scout filters on.

pub mod enrich;
pub mod loader;
pub mod metrics;

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::Serialize;

use crate::normalization::{PublisherConfidence, PublisherFrequencyTable, PublisherTokens};

pub use enrich::{enrich, LoadOptions};
pub use loader::{load_catalog, load_catalog_from_reader};

/// Prefix of a game's Steam store page; the AppID is appended.
pub const STEAM_APP_URL_PREFIX: &str = "https://store.steampowered.com/app/";

pub fn steam_app_url(app_id: u64) -> String {
    format!("{STEAM_APP_URL_PREFIX}{app_id}")
}

/// One catalog row as read from the export, before enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGame {
    pub app_id: u64,
    pub name: String,
    pub release_date: Option<String>,
    pub price: f64,
    /// Comma-separated genre cell; `None` or blank drops the row.
    pub genres: Option<String>,
    pub positive: u64,
    pub negative: u64,
    pub publishers: Option<String>,
}

/// One row of the enriched catalog. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub app_id: u64,
    pub name: String,
    pub genres: Vec<String>,
    pub price: f64,
    pub release_date: Option<NaiveDate>,
    pub positive: u64,
    pub negative: u64,
    pub publishers: String,
    pub age_days: Option<i64>,
    pub age_weeks: Option<f64>,
    pub total_reviews: u64,
    pub review_ratio: f64,
    pub reviews_per_day: Option<f64>,
    pub publisher_canonical: PublisherTokens,
    pub has_publisher: PublisherConfidence,
}

impl GameRecord {
    pub fn store_url(&self) -> String {
        steam_app_url(self.app_id)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// Counters describing what the enricher kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub dropped_no_genre: usize,
    pub dropped_bad_app_id: usize,
    pub dropped_duplicate_app_id: usize,
    pub unparsed_release_dates: usize,
    pub future_release_dates: usize,
    pub distinct_publisher_inputs: usize,
    /// Kept text cells whose invalid UTF-8 bytes were replaced.
    pub lossy_text_cells: usize,
}

/// The enriched, read-only catalog built once per load.
#[derive(Debug, Clone)]
pub struct EnrichedCatalog {
    pub(crate) games: Vec<GameRecord>,
    pub(crate) frequencies: PublisherFrequencyTable,
    pub(crate) genre_options: IndexSet<String>,
    pub(crate) publisher_tag_options: IndexSet<PublisherConfidence>,
    pub(crate) stats: LoadStats,
    pub(crate) today: NaiveDate,
}

impl EnrichedCatalog {
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, app_id: u64) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.app_id == app_id)
    }

    /// Catalog-wide publisher token counts.
    pub fn frequencies(&self) -> &PublisherFrequencyTable {
        &self.frequencies
    }

    /// Distinct genres in first-seen order.
    pub fn genre_options(&self) -> &IndexSet<String> {
        &self.genre_options
    }

    /// Distinct publisher-confidence labels in first-seen order.
    pub fn publisher_tag_options(&self) -> &IndexSet<PublisherConfidence> {
        &self.publisher_tag_options
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// The reference date ages were computed against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}
