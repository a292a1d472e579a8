//! Output snapshot artifacts.
//!
//! The daily snapshot is a plain ranked list of [`ScoredItem`]s; the weekly
//! snapshot bundles the mined patterns and generated concepts. Both are
//! written as JSON files into the data directory and served verbatim by the
//! API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{concept::Concept, item::ScoredItem, trend::Pattern};

/// File name of the daily ranked feed within the data directory.
pub const FEED_SNAPSHOT: &str = "feed.json";
/// File name of the weekly intelligence snapshot within the data directory.
pub const WEEKLY_SNAPSHOT: &str = "weekly.json";

/// The daily ranked feed: up to 100 items, best first.
pub type DailySnapshot = Vec<ScoredItem>;

/// The combined weekly artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySnapshot {
  /// Up to 3 qualifying patterns.
  pub patterns:     Vec<Pattern>,
  /// Up to 10 generated concepts.
  pub concepts:     Vec<Concept>,
  pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::concept::concept_for;

  #[test]
  fn weekly_snapshot_round_trips_through_json() {
    let snapshot = WeeklySnapshot {
      patterns:     Vec::new(),
      concepts:     vec![concept_for("motorsport", "washed_black", 1)],
      generated_at: Utc::now(),
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: WeeklySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.generated_at, snapshot.generated_at);
    assert_eq!(back.concepts[0].concept_name, "Motorsport x Washed Black #1");
  }
}
