//! Query surface handed to the presentation layer.
//!
//! The enriched catalog is held behind `RwLock<Arc<_>>`. Queries clone the
//! `Arc` and read without holding the lock; a reload builds a complete new
//! catalog first and only then swaps the reference, so readers never see a
//! half-built table.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{load_catalog, steam_app_url, EnrichedCatalog, GameRecord, LoadOptions};
use crate::error::CatalogError;
use crate::filter::{filter_games, FilterCriteria};
use crate::insight::{select_insights, InsightKind};
use crate::normalization::PublisherConfidence;

/// Choices a filter UI can offer, fixed at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub publisher_tags: Vec<PublisherConfidence>,
}

impl FilterOptions {
    pub fn from_catalog(catalog: &EnrichedCatalog) -> Self {
        Self {
            genres: catalog.genre_options().iter().cloned().collect(),
            publisher_tags: catalog.publisher_tag_options().iter().copied().collect(),
        }
    }
}

/// A highlighted game plus its store link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightCard {
    pub insight: InsightKind,
    pub app_id: u64,
    pub name: String,
    pub review_ratio: f64,
    pub total_reviews: u64,
    pub reviews_per_day: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub has_publisher: PublisherConfidence,
    pub link: String,
}

impl InsightCard {
    pub fn new(insight: InsightKind, game: &GameRecord) -> Self {
        Self {
            insight,
            app_id: game.app_id,
            name: game.name.clone(),
            review_ratio: game.review_ratio,
            total_reviews: game.total_reviews,
            reviews_per_day: game.reviews_per_day,
            release_date: game.release_date,
            has_publisher: game.has_publisher,
            link: steam_app_url(game.app_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub total: usize,
    pub rows: Vec<GameRecord>,
    pub options: FilterOptions,
    pub brightest_star: Option<InsightCard>,
    pub underdog: Option<InsightCard>,
}

/// Filter `catalog` and pick insights from the result.
pub fn run_query(catalog: &EnrichedCatalog, criteria: &FilterCriteria) -> QueryResult {
    let rows = filter_games(catalog.games(), criteria);
    let insights = select_insights(&rows);
    QueryResult {
        total: rows.len(),
        brightest_star: insights
            .brightest_star
            .map(|g| InsightCard::new(InsightKind::BrightestStar, g)),
        underdog: insights
            .underdog
            .map(|g| InsightCard::new(InsightKind::Underdog, g)),
        rows: rows.into_iter().cloned().collect(),
        options: FilterOptions::from_catalog(catalog),
    }
}

#[derive(Debug)]
pub struct CatalogService {
    current: RwLock<Arc<EnrichedCatalog>>,
    load_options: LoadOptions,
}

impl CatalogService {
    pub fn from_catalog(catalog: EnrichedCatalog, load_options: LoadOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
            load_options,
        }
    }

    pub fn load(path: &Path, load_options: LoadOptions) -> Result<Self, CatalogError> {
        let catalog = load_catalog(path, &load_options)?;
        Ok(Self::from_catalog(catalog, load_options))
    }

    /// The catalog currently being served.
    pub fn snapshot(&self) -> Arc<EnrichedCatalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuild from `path` with ages measured from today and swap it in. On
    /// failure the current catalog stays.
    pub fn reload(&self, path: &Path) -> Result<Arc<EnrichedCatalog>, CatalogError> {
        self.reload_as_of(path, Utc::now().date_naive())
    }

    /// Like [`reload`](Self::reload), with ages measured from `today`. Thresholds
    /// and the clamp setting carry over from the service's load options.
    pub fn reload_as_of(
        &self,
        path: &Path,
        today: NaiveDate,
    ) -> Result<Arc<EnrichedCatalog>, CatalogError> {
        let opts = LoadOptions {
            today,
            ..self.load_options.clone()
        };
        let fresh = Arc::new(load_catalog(path, &opts)?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&fresh);
        info!(target = "service", games = fresh.len(), "catalog swapped");
        Ok(fresh)
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_catalog(&self.snapshot())
    }

    pub fn query(&self, criteria: &FilterCriteria) -> QueryResult {
        run_query(&self.snapshot(), criteria)
    }
}
