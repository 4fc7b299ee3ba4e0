use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::publisher::PublisherTokens;

/// Tokens that never count as evidence of an established publisher.
///
/// Entries are stored in normalized spelling; membership is an exact match
/// against normalizer output.
pub const DEFAULT_WHITELIST: [&str; 6] = [
    "tbd",
    "none",
    "self published",
    "independent",
    "indie",
    "",
];

/// How confident we are that a game already has publisher backing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherConfidence {
    Likely,
    Uncertain,
    Unlikely,
}

impl PublisherConfidence {
    pub const ALL: [PublisherConfidence; 3] = [Self::Likely, Self::Uncertain, Self::Unlikely];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublisherConfidence::Likely => "likely",
            PublisherConfidence::Uncertain => "uncertain",
            PublisherConfidence::Unlikely => "unlikely",
        }
    }
}

impl fmt::Display for PublisherConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublisherConfidence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "likely" => Ok(Self::Likely),
            "uncertain" => Ok(Self::Uncertain),
            "unlikely" => Ok(Self::Unlikely),
            other => Err(anyhow::anyhow!(
                "unknown publisher tag {other:?} (expected likely, uncertain or unlikely)"
            )),
        }
    }
}

/// Global count of games per normalized publisher token.
///
/// Built once over the whole catalog and never updated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PublisherFrequencyTable {
    counts: HashMap<String, usize>,
}

impl PublisherFrequencyTable {
    /// Count, for each token, how many games carry it. A game contributes at
    /// most once per distinct token.
    pub fn build<'a, I>(slates: I) -> Self
    where
        I: IntoIterator<Item = &'a PublisherTokens>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for tokens in slates {
            for token in tokens {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all token counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Count thresholds separating the three confidence labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceThresholds {
    /// Counts strictly above this (and up to `likely_above`) are `uncertain`.
    pub uncertain_above: usize,
    /// Counts strictly above this are `likely`.
    pub likely_above: usize,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            uncertain_above: 3,
            likely_above: 7,
        }
    }
}

/// Labels a game's publisher slate against catalog-wide token counts.
#[derive(Debug, Clone)]
pub struct PublisherClassifier {
    thresholds: ConfidenceThresholds,
    whitelist: BTreeSet<String>,
}

impl Default for PublisherClassifier {
    fn default() -> Self {
        Self::new(ConfidenceThresholds::default())
    }
}

impl PublisherClassifier {
    pub fn new(thresholds: ConfidenceThresholds) -> Self {
        Self {
            thresholds,
            whitelist: DEFAULT_WHITELIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn thresholds(&self) -> ConfidenceThresholds {
        self.thresholds
    }

    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.whitelist.contains(token)
    }

    /// `likely` if any non-whitelisted token clears `likely_above`; otherwise
    /// `uncertain` if any clears `uncertain_above`; otherwise `unlikely`.
    pub fn classify(
        &self,
        tokens: &PublisherTokens,
        frequencies: &PublisherFrequencyTable,
    ) -> PublisherConfidence {
        let mut has_uncertain = false;
        for token in tokens.iter().filter(|t| !self.is_whitelisted(t)) {
            let count = frequencies.count(token);
            if count > self.thresholds.likely_above {
                return PublisherConfidence::Likely;
            }
            if count > self.thresholds.uncertain_above {
                has_uncertain = true;
            }
        }
        if has_uncertain {
            PublisherConfidence::Uncertain
        } else {
            PublisherConfidence::Unlikely
        }
    }
}
