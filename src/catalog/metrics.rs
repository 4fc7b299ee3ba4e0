use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Guard added to denominators so ratios and rates never divide by zero.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Parse the release date formats seen in Steam catalog exports.
///
/// Accepts `Oct 21, 2008`, `21 Oct, 2008`, `Oct 2008` (first of the month),
/// ISO dates and ISO date-times. Anything else is `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%b %d, %Y", "%d %b, %Y", "%d %b %Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(t, fmt) {
            return Some(date);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {t}"), "%d %b %Y") {
        return Some(date);
    }
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }
    None
}

/// Review-derived metrics for one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewMetrics {
    pub total_reviews: u64,
    /// `positive / (total + ε)`: in `[0, 1)`, zero when there are no reviews.
    pub review_ratio: f64,
}

pub fn review_metrics(positive: u64, negative: u64) -> ReviewMetrics {
    let total_reviews = positive.saturating_add(negative);
    ReviewMetrics {
        total_reviews,
        review_ratio: positive as f64 / (total_reviews as f64 + RATIO_EPSILON),
    }
}

/// Age-derived metrics for one game. All `None` when the release date is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeMetrics {
    pub age_days: Option<i64>,
    pub age_weeks: Option<f64>,
    pub reviews_per_day: Option<f64>,
}

/// Compute age metrics relative to `today`.
///
/// Future release dates give a negative `age_days`. By default the review rate
/// is left unguarded in that case (negative or huge); with
/// `clamp_future_releases` the age used for the rate is floored at zero.
/// `age_days` itself is never clamped.
pub fn age_metrics(
    release_date: Option<NaiveDate>,
    today: NaiveDate,
    total_reviews: u64,
    clamp_future_releases: bool,
) -> AgeMetrics {
    let Some(released) = release_date else {
        return AgeMetrics {
            age_days: None,
            age_weeks: None,
            reviews_per_day: None,
        };
    };
    let age_days = (today - released).num_days();
    let rate_age = if clamp_future_releases {
        age_days.max(0)
    } else {
        age_days
    };
    AgeMetrics {
        age_days: Some(age_days),
        age_weeks: Some(age_days as f64 / 7.0),
        reviews_per_day: Some(total_reviews as f64 / (rate_age as f64 + RATIO_EPSILON)),
    }
}
