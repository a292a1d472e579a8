//! The learned preference profile — per-tag and per-tag-pair weights.
//!
//! Weights are written by the vote endpoint (see `selvedge-api`) and read in
//! one batch per scoring pass. Every lookup fails open to a default, so an
//! empty profile is always a valid profile.

use std::collections::HashMap;

/// Default weight for a tag with no learned entry.
pub const DEFAULT_TAG_WEIGHT: f64 = 1.0;
/// Default weight for a tag pair with no learned entry.
pub const DEFAULT_PAIR_WEIGHT: f64 = 0.5;

/// Weight delta applied to each tag of a kept item.
pub const KEEP_TAG_DELTA: f64 = 0.2;
/// Weight delta applied to each tag pair of a kept item.
pub const KEEP_PAIR_DELTA: f64 = 0.3;
/// Weight delta applied to each tag of a skipped item (pairs are untouched).
pub const SKIP_TAG_DELTA: f64 = -0.1;

/// Canonical key for an unordered tag pair: lexicographically sorted, so
/// `(a, b)` and `(b, a)` never produce distinct entries.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
  if a <= b {
    (a.to_owned(), b.to_owned())
  } else {
    (b.to_owned(), a.to_owned())
  }
}

/// A read-only snapshot of the learned weights, fetched once per scoring
/// batch. If the store is unreachable, callers substitute
/// [`TagProfile::default`] and every lookup falls back to its default.
#[derive(Debug, Clone, Default)]
pub struct TagProfile {
  pub tag_weights:  HashMap<String, f64>,
  pub pair_weights: HashMap<(String, String), f64>,
}

impl TagProfile {
  pub fn tag_weight(&self, tag: &str) -> f64 {
    self.tag_weights.get(tag).copied().unwrap_or(DEFAULT_TAG_WEIGHT)
  }

  pub fn pair_weight(&self, a: &str, b: &str) -> f64 {
    self
      .pair_weights
      .get(&pair_key(a, b))
      .copied()
      .unwrap_or(DEFAULT_PAIR_WEIGHT)
  }
}
