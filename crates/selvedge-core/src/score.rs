//! The personalization engine: numeric scoring and the human-readable
//! "why you're seeing this" rationale.

use crate::{item::Item, profile::TagProfile};

/// Tags with a learned weight above this threshold are called out by name in
/// the explanation.
const HIGH_WEIGHT_THRESHOLD: f64 = 1.2;

/// Compute an item's personalized score:
///
/// `cluster_score + Σ tag weights + Σ pair weights`
///
/// where pairs range over all 2-combinations of the item's tag set and every
/// missing weight falls back to its default. With non-negative weights the
/// score is monotone in the tag set — adding a tag never lowers it.
pub fn personalized_score(item: &Item, profile: &TagProfile) -> f64 {
  let mut score = f64::from(item.cluster_score);

  for tag in &item.tags {
    score += profile.tag_weight(tag);
  }

  for (i, tag_a) in item.tags.iter().enumerate() {
    for tag_b in &item.tags[i + 1..] {
      score += profile.pair_weight(tag_a, tag_b);
    }
  }

  score
}

/// Build the explanation string shown next to a feed tile.
///
/// Clauses, in order of preference:
/// - high-weight tags the user has been keeping,
/// - a multi-cluster match note,
/// - a plain tag listing as the fallback.
///
/// Joined with `". "`; always ends with a period, and is non-empty whenever
/// the item has at least one tag.
pub fn explain(item: &Item, profile: &TagProfile) -> String {
  let mut clauses: Vec<String> = Vec::new();

  let high_weight: Vec<&str> = item
    .tags
    .iter()
    .filter(|t| profile.tag_weight(t) > HIGH_WEIGHT_THRESHOLD)
    .map(String::as_str)
    .collect();

  if !high_weight.is_empty() {
    clauses
      .push(format!("You've kept {} items recently", high_weight.join(", ")));
  }

  if item.tags.len() >= 2 {
    clauses.push(format!(
      "Matches {} clusters: {}",
      item.tags.len(),
      item.tags.join(", ")
    ));
  }

  if clauses.is_empty() {
    clauses.push(format!("Matches: {}", item.tags.join(", ")));
  }

  format!("{}.", clauses.join(". "))
}
