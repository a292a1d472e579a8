//! The weekly pattern miner: keep-rate statistics over a trailing window and
//! co-occurrence evidence for the tags that stand out.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Item;

/// A tag needs at least this many keeps in the window to qualify.
const MIN_KEEPS: u32 = 3;
/// ...and a keep-rate strictly above this.
const MIN_KEEP_RATE: f64 = 0.3;
/// Patterns surfaced per weekly run.
const MAX_PATTERNS: usize = 3;

/// Per-cluster concrete design actions. Clusters absent from this table get
/// a generic templated phrase.
const ACTION_PHRASES: &[(&str, &str)] = &[
  (
    "motorsport",
    "Oversized racing graphics on washed black tees with checkered flags",
  ),
  ("metal", "Distressed band-style typography with skull motifs"),
  ("western", "Outlaw dagger and barbed wire back prints"),
  (
    "tattoo_flash",
    "Classic flash sheet layouts: eagle, snake, skull cluster",
  ),
  ("washed_black", "Acid-washed black bases with high-contrast prints"),
  ("oversized_graphic", "Statement back hits, minimal front chest logo"),
  ("grunge", "Raw edge graphics, cracked screen print effect"),
  ("gym", "Performance-inspired typography with athletic motifs"),
];

/// A weekly finding: a tag whose keep-rate and volume cleared the
/// qualification bar, with its supporting evidence. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
  pub tag:           String,
  pub keep_count:    u32,
  pub seen_count:    u32,
  pub keep_rate:     f64,
  /// Top two tags co-occurring with `tag` among kept items.
  pub co_tags:       Vec<String>,
  /// Top three (source, kept-count) pairs among kept items in the window.
  pub sources:       Vec<(String, u32)>,
  pub pattern_title: String,
  pub direction:     String,
  pub action:        String,
}

/// Replace underscores with spaces: `washed_black` → `washed black`.
pub fn humanize(tag: &str) -> String {
  tag.replace('_', " ")
}

/// Underscores to spaces, then uppercase the first letter of each word:
/// `washed_black` → `Washed Black`.
pub fn title_case(tag: &str) -> String {
  humanize(tag)
    .split(' ')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// The concrete design action for a pattern: the per-cluster phrase (or a
/// generic fallback), with the top co-tag appended when one exists.
fn action_for(tag: &str, co_tags: &[String]) -> String {
  let mut action = ACTION_PHRASES
    .iter()
    .find(|(t, _)| *t == tag)
    .map(|(_, phrase)| (*phrase).to_owned())
    .unwrap_or_else(|| format!("Focus on {} aesthetic", humanize(tag)));

  if let Some(top_co) = co_tags.first() {
    action.push_str(&format!(" combined with {} elements", humanize(top_co)));
  }

  action
}

/// Mine the weekly patterns from the window's items and the set of
/// keep-voted item ids.
///
/// For every item, every tag increments a seen counter; kept items also
/// increment the tag's kept counter and the item's source counter (the
/// source counter is shared across all patterns of the run). A tag
/// qualifies with at least [`MIN_KEEPS`] keeps and a keep-rate above
/// [`MIN_KEEP_RATE`]; the top [`MAX_PATTERNS`] by keep-rate are returned.
///
/// Deterministic: counters are `BTreeMap`s and every sort breaks ties by
/// name, so identical inputs always yield identical output.
pub fn mine_patterns(items: &[Item], kept_ids: &HashSet<Uuid>) -> Vec<Pattern> {
  let mut tags_seen: BTreeMap<&str, u32> = BTreeMap::new();
  let mut tags_kept: BTreeMap<&str, u32> = BTreeMap::new();
  let mut kept_sources: BTreeMap<&str, u32> = BTreeMap::new();

  for item in items {
    let kept = kept_ids.contains(&item.item_id);
    for tag in &item.tags {
      *tags_seen.entry(tag).or_default() += 1;
      if kept {
        *tags_kept.entry(tag).or_default() += 1;
        *kept_sources.entry(&item.source).or_default() += 1;
      }
    }
  }

  // Qualification. Kept implies seen, but guard the division anyway.
  let mut candidates: Vec<(&str, u32, u32, f64)> = tags_kept
    .iter()
    .filter_map(|(&tag, &kept)| {
      let seen = tags_seen.get(tag).copied().unwrap_or(0);
      if seen == 0 {
        return None;
      }
      let rate = f64::from(kept) / f64::from(seen);
      (kept >= MIN_KEEPS && rate > MIN_KEEP_RATE)
        .then_some((tag, kept, seen, rate))
    })
    .collect();

  // Stable sort over the name-ordered candidates: rate ties resolve to the
  // lexicographically smaller tag.
  candidates
    .sort_by(|a, b| b.3.partial_cmp(&a.3).unwrap_or(std::cmp::Ordering::Equal));

  let top_sources: Vec<(String, u32)> = top_n(&kept_sources, 3);

  candidates
    .into_iter()
    .take(MAX_PATTERNS)
    .map(|(tag, keep_count, seen_count, keep_rate)| {
      // Co-occurrence: other tags on kept items that carry `tag`.
      let mut co_counts: BTreeMap<&str, u32> = BTreeMap::new();
      for item in items {
        if kept_ids.contains(&item.item_id)
          && item.tags.iter().any(|t| t == tag)
        {
          for other in item.tags.iter().filter(|t| t.as_str() != tag) {
            *co_counts.entry(other).or_default() += 1;
          }
        }
      }
      let co_tags: Vec<String> =
        top_n(&co_counts, 2).into_iter().map(|(t, _)| t).collect();

      let direction = format!(
        "Strong preference for {} combined with {}",
        humanize(tag),
        co_tags.iter().map(|t| humanize(t)).collect::<Vec<_>>().join(", ")
      );

      Pattern {
        tag: tag.to_owned(),
        keep_count,
        seen_count,
        keep_rate,
        co_tags: co_tags.clone(),
        sources: top_sources.clone(),
        pattern_title: format!("High engagement with {}", title_case(tag)),
        direction,
        action: action_for(tag, &co_tags),
      }
    })
    .collect()
}

/// The `n` highest-count entries, count descending with name-order
/// tie-breaking (inherited from the `BTreeMap` iteration order).
fn top_n(counts: &BTreeMap<&str, u32>, n: usize) -> Vec<(String, u32)> {
  let mut entries: Vec<(String, u32)> =
    counts.iter().map(|(&k, &v)| (k.to_owned(), v)).collect();
  entries.sort_by(|a, b| b.1.cmp(&a.1));
  entries.truncate(n);
  entries
}
