use std::path::PathBuf;

use chrono::Utc;

use crate::catalog::LoadOptions;
use crate::normalization::ConfidenceThresholds;
use crate::util::env::{env_flag, env_opt, env_parse};

pub const ENV_CATALOG_PATH: &str = "SCOUT_CATALOG_PATH";
pub const ENV_UNCERTAIN_ABOVE: &str = "SCOUT_PUBLISHER_UNCERTAIN_ABOVE";
pub const ENV_LIKELY_ABOVE: &str = "SCOUT_PUBLISHER_LIKELY_ABOVE";
pub const ENV_CLAMP_FUTURE: &str = "SCOUT_CLAMP_FUTURE_RELEASES";
pub const ENV_LOG: &str = "SCOUT_LOG";

const DEFAULT_CATALOG_PATH: &str = "games.csv";
const DEFAULT_LOG_FILTER: &str = "info";

/// Process-level settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub catalog_path: PathBuf,
    pub thresholds: ConfidenceThresholds,
    pub clamp_future_releases: bool,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            thresholds: ConfidenceThresholds::default(),
            clamp_future_releases: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ScoutConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_path: env_opt(ENV_CATALOG_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            thresholds: ConfidenceThresholds {
                uncertain_above: env_parse(
                    ENV_UNCERTAIN_ABOVE,
                    defaults.thresholds.uncertain_above,
                ),
                likely_above: env_parse(ENV_LIKELY_ABOVE, defaults.thresholds.likely_above),
            },
            clamp_future_releases: env_flag(ENV_CLAMP_FUTURE, defaults.clamp_future_releases),
            log_filter: env_opt(ENV_LOG).unwrap_or(defaults.log_filter),
        }
    }

    /// Load options for a run starting today.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new(Utc::now().date_naive())
            .with_thresholds(self.thresholds)
            .with_clamp_future_releases(self.clamp_future_releases)
    }
}
