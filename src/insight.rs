//! "Brightest Star" and "Underdog" picks over a filtered view.
//!
//! Both picks only look at the rows they are given. The underdog's averages
//! are taken over the current filter result, never the full catalog, so the
//! definition moves with the query.

use std::fmt;

use serde::Serialize;

use crate::catalog::GameRecord;

/// Minimum review ratio for a Brightest Star candidate.
pub const BRIGHTEST_STAR_MIN_RATIO: f64 = 0.9;
/// Minimum review ratio for an Underdog candidate.
pub const UNDERDOG_MIN_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    BrightestStar,
    Underdog,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::BrightestStar => f.write_str("Brightest Star"),
            InsightKind::Underdog => f.write_str("Underdog"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insights<'a> {
    pub brightest_star: Option<&'a GameRecord>,
    pub underdog: Option<&'a GameRecord>,
}

impl<'a> Insights<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (InsightKind, &'a GameRecord)> {
        [
            (InsightKind::BrightestStar, self.brightest_star),
            (InsightKind::Underdog, self.underdog),
        ]
        .into_iter()
        .filter_map(|(kind, game)| game.map(|g| (kind, g)))
    }
}

/// Pick both insights from a filtered view.
pub fn select_insights<'a>(rows: &[&'a GameRecord]) -> Insights<'a> {
    Insights {
        brightest_star: brightest_star(rows),
        underdog: underdog(rows),
    }
}

/// Most-reviewed row with `review_ratio >= 0.9`; the earliest row wins ties.
pub fn brightest_star<'a>(rows: &[&'a GameRecord]) -> Option<&'a GameRecord> {
    first_max_by(
        rows.iter()
            .copied()
            .filter(|g| g.review_ratio >= BRIGHTEST_STAR_MIN_RATIO),
        |g| g.total_reviews as f64,
    )
}

/// Fastest-reviewed row among well-rated games that are both less reviewed and
/// younger than the view's averages; the earliest row wins ties.
///
/// Rows without a release date are left out of the age average and never
/// qualify. No pick when the view is empty or no row has an age.
pub fn underdog<'a>(rows: &[&'a GameRecord]) -> Option<&'a GameRecord> {
    let mean_reviews = mean(rows.iter().map(|g| g.total_reviews as f64))?;
    let mean_age = mean(rows.iter().filter_map(|g| g.age_days).map(|d| d as f64))?;

    first_max_by(
        rows.iter().copied().filter(|g| {
            g.review_ratio >= UNDERDOG_MIN_RATIO
                && (g.total_reviews as f64) < mean_reviews
                && g.age_days.is_some_and(|d| (d as f64) < mean_age)
        }),
        |g| g.reviews_per_day.unwrap_or(f64::NEG_INFINITY),
    )
}

fn mean<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Stable arg-max: only a strictly greater key replaces the current pick.
fn first_max_by<'a, I, F>(candidates: I, key: F) -> Option<&'a GameRecord>
where
    I: Iterator<Item = &'a GameRecord>,
    F: Fn(&GameRecord) -> f64,
{
    let mut best: Option<(&GameRecord, f64)> = None;
    for game in candidates {
        let k = key(game);
        match best {
            Some((_, best_k)) if k <= best_k => {}
            _ => best = Some((game, k)),
        }
    }
    best.map(|(g, _)| g)
}
