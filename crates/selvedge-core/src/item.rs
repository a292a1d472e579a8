//! Item — a piece of discovered content.
//!
//! Items are created by the ingestion pipeline and are read-only thereafter.
//! The personalized score and explanation are computed transiently at
//! feed-build time and never written back onto the stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summaries longer than this are truncated at ingestion time.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// A stored content item. Identity is the `url`: the store never holds two
/// items with the same url, so re-running ingestion is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub item_id:       Uuid,
  /// Unique identity key; checked for existence before every insert.
  pub url:           String,
  pub title:         String,
  /// Name of the feed this item came from.
  pub source:        String,
  pub image_url:     String,
  /// Truncated to [`SUMMARY_MAX_CHARS`] characters.
  pub summary:       String,
  /// The entry's published/updated time, or ingestion time if the feed
  /// provided none.
  pub pub_date:      DateTime<Utc>,
  /// Matched cluster tags — sorted and deduplicated, so equal tag sets
  /// compare equal regardless of match order.
  pub tags:          Vec<String>,
  /// Count of distinct cluster tags matched at ingestion time.
  pub cluster_score: u32,
}

/// Input to [`crate::store::TrendStore::insert_item`].
/// The `item_id` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewItem {
  pub url:           String,
  pub title:         String,
  pub source:        String,
  pub image_url:     String,
  pub summary:       String,
  pub pub_date:      DateTime<Utc>,
  pub tags:          Vec<String>,
  pub cluster_score: u32,
}

/// An item with its transient personalization fields attached — the unit of
/// the daily feed snapshot. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
  #[serde(flatten)]
  pub item:               Item,
  pub personalized_score: f64,
  pub explanation:        String,
}

/// Truncate `s` to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((idx, _)) => s[..idx].to_owned(),
    None => s.to_owned(),
  }
}
