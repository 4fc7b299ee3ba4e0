use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use regex::Regex;

/// Canonical token set for one raw publisher string.
pub type PublisherTokens = BTreeSet<String>;

/// Standalone corporate suffix words, with an optional trailing period.
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(inc|llc|ltd|co|corp|corporation|gmbh)\b\.?").expect("valid regex")
});

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters a raw publisher field is split on.
pub const PUBLISHER_DELIMITERS: [char; 5] = [';', ',', '/', '&', '|'];

/// Normalize a raw publisher field into its set of comparable tokens.
///
/// Normalization steps, per delimited part:
/// - lowercase and trim
/// - drop standalone corporate suffixes (`inc`, `llc`, `ltd`, `co`, `corp`,
///   `corporation`, `gmbh`, optional trailing period)
/// - keep only `a-z`, `0-9` and whitespace, collapse whitespace, trim
///
/// Blank input and parts that clean down to nothing yield the `""` token.
pub fn normalize_publishers(raw: Option<&str>) -> PublisherTokens {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return BTreeSet::from([String::new()]),
    };

    raw.split(&PUBLISHER_DELIMITERS[..]).map(clean_part).collect()
}

fn clean_part(part: &str) -> String {
    let lowered = part.trim().to_lowercase();
    let without_suffix = SUFFIX_RE.replace_all(&lowered, "");
    let alnum = DISALLOWED_RE.replace_all(&without_suffix, "");
    let collapsed = collapse_whitespace(&alnum);
    // Stripping punctuation can expose a suffix word ("in'c"); a second pass keeps
    // every output token a fixed point of normalization.
    let exposed = SUFFIX_RE.replace_all(&collapsed, "");
    collapse_whitespace(&exposed)
}

fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RE.replace_all(input, " ").trim().to_string()
}

/// Memoizing front for [`normalize_publishers`], scoped to a single catalog load.
///
/// Steam exports repeat the same publisher strings thousands of times, so the
/// cache is keyed on the raw field text and dropped together with the loader.
#[derive(Debug, Default)]
pub struct PublisherNormalizer {
    cache: HashMap<String, Arc<PublisherTokens>>,
    hits: u64,
}

impl PublisherNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw`, reusing a previously computed token set for the same text.
    pub fn normalize(&mut self, raw: Option<&str>) -> Arc<PublisherTokens> {
        let key = raw.unwrap_or_default();
        if let Some(found) = self.cache.get(key) {
            self.hits += 1;
            return Arc::clone(found);
        }
        let tokens = Arc::new(normalize_publishers(raw));
        self.cache.insert(key.to_string(), Arc::clone(&tokens));
        tokens
    }

    /// Number of distinct raw strings normalized so far.
    pub fn distinct_inputs(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> u64 {
        self.hits
    }
}
