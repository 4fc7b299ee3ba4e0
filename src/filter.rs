//! Conjunctive row filters over the enriched catalog.
//!
//! Every criterion is optional; an absent criterion does not constrain. Present
//! criteria are AND-combined and each is a pure per-row predicate, so the order
//! they are checked in never changes the result. Inverted ranges (`min > max`)
//! are not rejected; they simply match nothing.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::GameRecord;
use crate::normalization::PublisherConfidence;

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Keep rows whose label is in the set. An empty set matches nothing.
    #[serde(default)]
    pub publisher_tags: Option<BTreeSet<PublisherConfidence>>,
    /// Keep rows carrying at least one of these genres. An empty set matches
    /// nothing; leave this `None` for "any genre" (e.g. an empty multiselect).
    #[serde(default)]
    pub genres: Option<BTreeSet<String>>,
    /// Release date window; rows without a release date never match.
    #[serde(default)]
    pub date_range: Option<Bounds<NaiveDate>>,
    #[serde(default)]
    pub price_range: Option<Bounds<f64>>,
    /// Applied to `total_reviews`.
    #[serde(default)]
    pub review_count_range: Option<Bounds<u64>>,
}

impl FilterCriteria {
    /// No constraints at all.
    pub fn any() -> Self {
        Self::default()
    }

    /// The scouting preset: unbacked games released 2000-2030, priced up to
    /// $100, with 10 to 10,000 reviews, any genre.
    pub fn scout_defaults() -> Self {
        let date_range = NaiveDate::from_ymd_opt(2000, 1, 1)
            .zip(NaiveDate::from_ymd_opt(2030, 12, 31))
            .map(|(min, max)| Bounds::new(min, max));
        Self {
            publisher_tags: Some(BTreeSet::from([PublisherConfidence::Unlikely])),
            genres: None,
            date_range,
            price_range: Some(Bounds::new(0.0, 100.0)),
            review_count_range: Some(Bounds::new(10, 10_000)),
        }
    }

    pub fn with_publisher_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = PublisherConfidence>,
    {
        self.publisher_tags = Some(tags.into_iter().collect());
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_range(mut self, min: NaiveDate, max: NaiveDate) -> Self {
        self.date_range = Some(Bounds::new(min, max));
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(Bounds::new(min, max));
        self
    }

    pub fn with_review_count_range(mut self, min: u64, max: u64) -> Self {
        self.review_count_range = Some(Bounds::new(min, max));
        self
    }

    /// Whether a single row satisfies every present criterion.
    pub fn matches(&self, game: &GameRecord) -> bool {
        if let Some(tags) = &self.publisher_tags {
            if !tags.contains(&game.has_publisher) {
                return false;
            }
        }
        if let Some(genres) = &self.genres {
            if !game.genres.iter().any(|g| genres.contains(g)) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            match game.release_date {
                Some(date) if range.contains(&date) => {}
                _ => return false,
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(&game.price) {
                return false;
            }
        }
        if let Some(range) = &self.review_count_range {
            if !range.contains(&game.total_reviews) {
                return false;
            }
        }
        true
    }
}

/// Rows of `games` matching `criteria`, in catalog order. Never mutates the input.
pub fn filter_games<'a>(games: &'a [GameRecord], criteria: &FilterCriteria) -> Vec<&'a GameRecord> {
    let out: Vec<&GameRecord> = games.iter().filter(|g| criteria.matches(g)).collect();
    debug!(
        target = "filter",
        input = games.len(),
        matched = out.len(),
        "filter applied"
    );
    out
}
