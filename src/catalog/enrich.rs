use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use super::metrics::{age_metrics, parse_release_date, review_metrics};
use super::{EnrichedCatalog, GameRecord, LoadStats, RawGame};
use crate::normalization::{
    ConfidenceThresholds, PublisherClassifier, PublisherConfidence, PublisherFrequencyTable,
    PublisherNormalizer,
};

/// Knobs for a single catalog load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Reference date for `age_days`.
    pub today: NaiveDate,
    pub thresholds: ConfidenceThresholds,
    /// Floor negative ages at zero when computing `reviews_per_day`.
    pub clamp_future_releases: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl LoadOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            thresholds: ConfidenceThresholds::default(),
            clamp_future_releases: false,
        }
    }

    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_clamp_future_releases(mut self, clamp: bool) -> Self {
        self.clamp_future_releases = clamp;
        self
    }
}

/// Split a genre cell on commas, trimming and skipping empty entries.
pub fn split_genres(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for genre in raw.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        if !out.iter().any(|g| g == genre) {
            out.push(genre.to_string());
        }
    }
    out
}

/// Turn raw rows into the enriched catalog.
///
/// Rows without genres and repeated AppIDs are dropped. Publisher slates are
/// normalized row by row, counted across every kept row, then classified.
pub fn enrich<I>(raws: I, opts: &LoadOptions) -> EnrichedCatalog
where
    I: IntoIterator<Item = RawGame>,
{
    let mut stats = LoadStats::default();
    let mut normalizer = PublisherNormalizer::new();
    let mut seen_ids: HashSet<u64> = HashSet::new();
    let mut games: Vec<GameRecord> = Vec::new();

    for raw in raws {
        stats.rows_read += 1;

        let genres = raw.genres.as_deref().map(split_genres).unwrap_or_default();
        if genres.is_empty() {
            stats.dropped_no_genre += 1;
            continue;
        }
        if !seen_ids.insert(raw.app_id) {
            debug!(target = "catalog", app_id = raw.app_id, "duplicate AppID dropped");
            stats.dropped_duplicate_app_id += 1;
            continue;
        }

        let release_date = raw.release_date.as_deref().and_then(parse_release_date);
        if release_date.is_none() {
            stats.unparsed_release_dates += 1;
        } else if release_date.is_some_and(|d| d > opts.today) {
            stats.future_release_dates += 1;
        }

        let reviews = review_metrics(raw.positive, raw.negative);
        let age = age_metrics(
            release_date,
            opts.today,
            reviews.total_reviews,
            opts.clamp_future_releases,
        );
        let canonical = normalizer.normalize(raw.publishers.as_deref());

        games.push(GameRecord {
            app_id: raw.app_id,
            name: raw.name,
            genres,
            price: raw.price,
            release_date,
            positive: raw.positive,
            negative: raw.negative,
            publishers: raw.publishers.unwrap_or_default(),
            age_days: age.age_days,
            age_weeks: age.age_weeks,
            total_reviews: reviews.total_reviews,
            review_ratio: reviews.review_ratio,
            reviews_per_day: age.reviews_per_day,
            publisher_canonical: (*canonical).clone(),
            // Assigned below once catalog-wide counts exist.
            has_publisher: PublisherConfidence::Unlikely,
        });
    }
    stats.distinct_publisher_inputs = normalizer.distinct_inputs();

    let frequencies = PublisherFrequencyTable::build(games.iter().map(|g| &g.publisher_canonical));
    let classifier = PublisherClassifier::new(opts.thresholds);
    for game in &mut games {
        game.has_publisher = classifier.classify(&game.publisher_canonical, &frequencies);
    }

    let genre_options: IndexSet<String> = games
        .iter()
        .flat_map(|g| g.genres.iter().cloned())
        .collect();
    let publisher_tag_options: IndexSet<PublisherConfidence> =
        games.iter().map(|g| g.has_publisher).collect();

    if stats.future_release_dates > 0 && !opts.clamp_future_releases {
        warn!(
            target = "catalog",
            count = stats.future_release_dates,
            "future release dates present; reviews_per_day is negative for those rows"
        );
    }
    info!(
        target = "catalog",
        rows = stats.rows_read,
        kept = games.len(),
        dropped_no_genre = stats.dropped_no_genre,
        dropped_duplicates = stats.dropped_duplicate_app_id,
        unparsed_dates = stats.unparsed_release_dates,
        publisher_tokens = frequencies.len(),
        normalizer_cache_hits = normalizer.cache_hits(),
        "catalog enriched"
    );

    EnrichedCatalog {
        games,
        frequencies,
        genre_options,
        publisher_tag_options,
        stats,
        today: opts.today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(app_id: u64, genres: Option<&str>, publishers: Option<&str>) -> RawGame {
        RawGame {
            app_id,
            name: format!("Game {app_id}"),
            release_date: Some("Jan 1, 2024".into()),
            price: 9.99,
            genres: genres.map(Into::into),
            positive: 10,
            negative: 0,
            publishers: publishers.map(Into::into),
        }
    }

    #[test]
    fn splits_and_dedupes_genres() {
        assert_eq!(
            split_genres("Action, Indie,Action , ,RPG"),
            vec!["Action", "Indie", "RPG"]
        );
        assert!(split_genres(" , ").is_empty());
    }

    #[test]
    fn drops_genreless_rows_and_duplicates() {
        let rows = vec![
            raw(1, Some("Action"), None),
            raw(2, None, None),
            raw(3, Some("  "), None),
            raw(1, Some("Puzzle"), None),
            raw(4, Some("Puzzle,Indie"), None),
        ];
        let catalog = enrich(rows, &LoadOptions::new(ymd(2024, 6, 1)));
        let ids: Vec<u64> = catalog.games().iter().map(|g| g.app_id).collect();
        assert_eq!(ids, vec![1, 4]);
        let stats = catalog.stats();
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.dropped_no_genre, 2);
        assert_eq!(stats.dropped_duplicate_app_id, 1);
        assert_eq!(
            catalog.genre_options().iter().collect::<Vec<_>>(),
            vec!["Action", "Puzzle", "Indie"]
        );
    }

    #[test]
    fn unparseable_dates_become_null() {
        let mut row = raw(7, Some("Action"), None);
        row.release_date = Some("Coming soon".into());
        let catalog = enrich(vec![row], &LoadOptions::new(ymd(2024, 6, 1)));
        let game = &catalog.games()[0];
        assert_eq!(game.release_date, None);
        assert_eq!(game.age_days, None);
        assert_eq!(game.reviews_per_day, None);
        assert_eq!(catalog.stats().unparsed_release_dates, 1);
    }

    #[test]
    fn frequencies_span_the_whole_catalog() {
        let mut rows: Vec<RawGame> = (1..=9)
            .map(|id| raw(id, Some("Action"), Some("Megacorp Inc.")))
            .collect();
        rows.extend((10..=14).map(|id| raw(id, Some("Puzzle"), Some("Mid Label"))));
        rows.push(raw(15, Some("Puzzle"), Some("Mid Label, Megacorp")));
        rows.push(raw(16, Some("Puzzle"), Some("Tiny Studio")));
        rows.push(raw(17, Some("Puzzle"), Some("Indie")));

        let catalog = enrich(rows, &LoadOptions::new(ymd(2024, 6, 1)));
        assert_eq!(catalog.frequencies().count("megacorp"), 10);
        assert_eq!(catalog.frequencies().count("mid label"), 6);
        assert!(catalog.frequencies().total() >= catalog.len());

        let label = |id: u64| catalog.get(id).map(|g| g.has_publisher);
        assert_eq!(label(1), Some(PublisherConfidence::Likely));
        assert_eq!(label(10), Some(PublisherConfidence::Uncertain));
        assert_eq!(label(15), Some(PublisherConfidence::Likely));
        assert_eq!(label(16), Some(PublisherConfidence::Unlikely));
        assert_eq!(label(17), Some(PublisherConfidence::Unlikely));
        assert_eq!(
            catalog.publisher_tag_options().iter().copied().collect::<Vec<_>>(),
            vec![
                PublisherConfidence::Likely,
                PublisherConfidence::Uncertain,
                PublisherConfidence::Unlikely
            ]
        );
    }

    #[test]
    fn thresholds_come_from_options() {
        let rows = vec![
            raw(1, Some("Action"), Some("Duo")),
            raw(2, Some("Action"), Some("Duo")),
        ];
        let opts = LoadOptions::new(ymd(2024, 6, 1)).with_thresholds(ConfidenceThresholds {
            uncertain_above: 0,
            likely_above: 1,
        });
        let catalog = enrich(rows, &opts);
        assert!(catalog
            .games()
            .iter()
            .all(|g| g.has_publisher == PublisherConfidence::Likely));
    }

    #[test]
    fn clamp_option_changes_only_the_rate() {
        let mut row = raw(1, Some("Action"), None);
        row.release_date = Some("2024-07-01".into());
        let today = ymd(2024, 6, 1);

        let unguarded = enrich(vec![row.clone()], &LoadOptions::new(today));
        let clamped = enrich(
            vec![row],
            &LoadOptions::new(today).with_clamp_future_releases(true),
        );
        let (a, b) = (&unguarded.games()[0], &clamped.games()[0]);
        assert_eq!(a.age_days, Some(-30));
        assert_eq!(b.age_days, Some(-30));
        assert!(a.reviews_per_day.unwrap() < 0.0);
        assert!(b.reviews_per_day.unwrap() > 0.0);
        assert_eq!(unguarded.stats().future_release_dates, 1);
    }
}
