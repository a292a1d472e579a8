//! Tag classification and the ingestion quality gate.
//!
//! The cluster vocabulary is behaviour-defining static data, not a tunable
//! default: changing a keyword changes which items enter the store.

use std::collections::BTreeSet;

/// The fixed cluster vocabulary: cluster tag → keyword phrases. A cluster
/// matches when any of its keywords appears as a substring of the
/// lower-cased input text.
pub const CLUSTER_TAGS: &[(&str, &[&str])] = &[
  ("motorsport", &[
    "racing", "motorsport", "moto", "speedway", "drag", "nascar", "f1",
    "rally", "checkered",
  ]),
  ("metal", &["metal", "hardcore", "metalcore", "punk", "grunge", "rock"]),
  ("western", &[
    "western", "outlaw", "cowboy", "rodeo", "frontier", "americana",
  ]),
  ("tattoo_flash", &[
    "skull", "dagger", "snake", "barbed wire", "tattoo", "flash", "rose",
    "eagle",
  ]),
  ("washed_black", &[
    "washed", "vintage wash", "distressed", "faded", "acid wash",
    "stone wash",
  ]),
  ("oversized_graphic", &[
    "oversized", "back print", "back hit", "large graphic",
    "statement graphic",
  ]),
  ("grunge", &["grunge", "street", "urban", "raw", "edgy"]),
  ("gym", &[
    "gym", "training", "workout", "athletic", "performance", "activewear",
    "sportswear",
  ]),
];

/// Secondary quality-signal keywords. Currently unused by [`admit`]: the
/// original pipeline defined a stricter single-tag check against this list
/// but short-circuited before reaching it. Kept as-is pending a product
/// decision on whether that filter was meant to be live.
pub const QUALITY_SIGNALS: &[&str] = &[
  "tee", "t-shirt", "graphic", "print", "typography", "back print",
  "oversized graphic",
];

/// Match cluster tags in `text`. Case-insensitive; a cluster matches on its
/// first keyword hit. Returns the matched cluster names sorted and
/// deduplicated.
pub fn classify(text: &str) -> Vec<String> {
  let lower = text.to_lowercase();
  let mut matched = BTreeSet::new();

  for (cluster, keywords) in CLUSTER_TAGS {
    if keywords.iter().any(|kw| lower.contains(kw)) {
      matched.insert((*cluster).to_owned());
    }
  }

  matched.into_iter().collect()
}

/// The ingestion quality gate: admit any item that matched at least one
/// cluster.
pub fn admit(_text: &str, tags: &[String]) -> bool {
  !tags.is_empty()
}
