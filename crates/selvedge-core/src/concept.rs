//! The weekly concept generator: deterministic design-concept derivation
//! from the most frequently co-kept tag pairs.
//!
//! Every textual field is a pure function of the pair's text, selected from
//! a fixed candidate list via a stable hash — the same pair always yields
//! the same concept, across runs and across machines. (The original relied
//! on the host language's string hash, which is salted per process; we use
//! SHA-256 instead.)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{item::Item, trend::{humanize, title_case}};

/// Concepts surfaced per weekly run.
const MAX_CONCEPTS: usize = 10;

const FRONT_PLACEMENTS: &[&str] = &[
  "Small left chest logo",
  "Center chest wordmark",
  "Minimal script placement",
  "Upper chest icon",
  "Left chest badge",
];

const SLEEVE_DETAILS: &[&str] = &[
  "Barbed wire sleeve stripe",
  "Racing stripe detail",
  "Distressed flag patch",
  "Minimal skull icon",
  "None (oversized silhouette focus)",
];

const PRINT_STYLES: &[&str] = &[
  "Distressed screen print with cracked ink effect",
  "Halftone gradient with vintage grain overlay",
  "Puff print detail on washed base",
  "High-density discharge print on acid wash",
  "Cracked plastisol with intentional aging",
];

const SLOGAN_SETS: &[[&str; 4]] = &[
  ["SPEED KILLS", "NO LIMITS", "FULL THROTTLE", "REDLINE"],
  ["OUTLAW CULTURE", "RIDE OR DIE", "FREEDOM OR DEATH", "UNTAMED"],
  ["HEAVY DUTY", "IRON WILL", "RELENTLESS", "NO SURRENDER"],
  ["LEGENDS NEVER DIE", "BUILT TO LAST", "FOREVER WILD", "UNBROKEN"],
];

/// Per-cluster motif vocabularies; unknown clusters get the generic fillers
/// in [`motifs_for`].
const MOTIF_TABLE: &[(&str, &str)] = &[
  ("motorsport", "checkered flags, racing numbers, speed lines, drag strip"),
  ("metal", "skulls, chains, pentagrams, gothic lettering"),
  ("western", "daggers, revolvers, barbed wire, outlaw stars"),
  ("tattoo_flash", "rose and dagger, eagle and snake, skull and crossbones"),
  ("washed_black", "distressed textures, vintage grain, cracked effects"),
  ("oversized_graphic", "bold scale, statement imagery, dominant placement"),
  ("grunge", "splatter, rough edges, hand-drawn style"),
  ("gym", "athletic icons, performance numbers, training symbolism"),
];

/// Not tag-dependent: the line's base palette is a constant.
const COLORWAYS: &str =
  "Washed black primary, vintage charcoal, acid wash black, stone grey";

/// A generated design idea, keyed by a tag pair and its 1-based rank within
/// the weekly run. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
  pub concept_name:    String,
  pub front_placement: String,
  pub back_placement:  String,
  pub sleeve_detail:   String,
  pub motifs:          String,
  /// Always exactly four.
  pub slogans:         Vec<String>,
  pub print_style:     String,
  pub colorways:       String,
}

/// Stable selection index: SHA-256 of `key`, first 8 bytes big-endian,
/// modulo `len`.
fn stable_pick(key: &str, len: usize) -> usize {
  let digest = Sha256::digest(key.as_bytes());
  let mut bytes = [0u8; 8];
  bytes.copy_from_slice(&digest[..8]);
  (u64::from_be_bytes(bytes) % len as u64) as usize
}

fn back_placement(tag_a: &str, tag_b: &str) -> String {
  let a = humanize(tag_a);
  let b = humanize(tag_b);
  match stable_pick(&format!("{tag_a}{tag_b}"), 5) {
    0 => format!("Oversized {a} graphic with {b} elements"),
    1 => format!("Large back hit: {a} motif over {b} typography"),
    2 => format!("Full back print: {a} and {b} split composition"),
    3 => format!("Statement back graphic: {a} icon, {b} frame"),
    _ => format!("Vertical back spine: {a} imagery, {b} accents"),
  }
}

fn motifs_for(tag_a: &str, tag_b: &str) -> String {
  let lookup = |tag: &str, fallback: &str| {
    MOTIF_TABLE
      .iter()
      .find(|(t, _)| *t == tag)
      .map(|(_, m)| (*m).to_owned())
      .unwrap_or_else(|| fallback.to_owned())
  };
  format!(
    "{}, {}",
    lookup(tag_a, "bold graphics"),
    lookup(tag_b, "strong symbolism")
  )
}

/// Derive the full concept for the pair `(tag_a, tag_b)` at 1-based `rank`.
pub fn concept_for(tag_a: &str, tag_b: &str, rank: usize) -> Concept {
  let joint = format!("{tag_a}{tag_b}");

  Concept {
    concept_name:    format!(
      "{} x {} #{}",
      title_case(tag_a),
      title_case(tag_b),
      rank
    ),
    front_placement: FRONT_PLACEMENTS
      [stable_pick(&joint, FRONT_PLACEMENTS.len())]
    .to_owned(),
    back_placement:  back_placement(tag_a, tag_b),
    sleeve_detail:   SLEEVE_DETAILS[stable_pick(tag_a, SLEEVE_DETAILS.len())]
      .to_owned(),
    motifs:          motifs_for(tag_a, tag_b),
    slogans:         SLOGAN_SETS[stable_pick(&joint, SLOGAN_SETS.len())]
      .iter()
      .map(|s| (*s).to_owned())
      .collect(),
    print_style:     PRINT_STYLES[stable_pick(tag_a, PRINT_STYLES.len())]
      .to_owned(),
    colorways:       COLORWAYS.to_owned(),
  }
}

/// Generate up to [`MAX_CONCEPTS`] concepts from the sample of recently kept
/// items. Items with fewer than two tags are ignored; the pair is the first
/// two tags of the item's (sorted) tag list, counted across the sample and
/// ranked by frequency, ties broken lexicographically.
pub fn generate_concepts(kept_items: &[Item]) -> Vec<Concept> {
  let mut pair_counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();

  for item in kept_items {
    if let [tag_a, tag_b, ..] = item.tags.as_slice() {
      // Tags are stored sorted, so (tag_a, tag_b) is already canonical.
      *pair_counts.entry((tag_a, tag_b)).or_default() += 1;
    }
  }

  let mut ranked: Vec<((&str, &str), u32)> = pair_counts.into_iter().collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1));

  ranked
    .into_iter()
    .take(MAX_CONCEPTS)
    .enumerate()
    .map(|(i, ((tag_a, tag_b), _))| concept_for(tag_a, tag_b, i + 1))
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn kept_item(tags: &[&str]) -> Item {
    Item {
      item_id:       Uuid::new_v4(),
      url:           format!("https://example.com/{}", Uuid::new_v4()),
      title:         "tee".into(),
      source:        "heddels".into(),
      image_url:     "https://example.com/i.jpg".into(),
      summary:       String::new(),
      pub_date:      Utc::now(),
      tags:          tags.iter().map(|t| (*t).to_owned()).collect(),
      cluster_score: tags.len() as u32,
    }
  }

  #[test]
  fn generation_is_deterministic() {
    let sample: Vec<Item> = (0..30)
      .map(|i| {
        if i % 2 == 0 {
          kept_item(&["metal", "washed_black"])
        } else {
          kept_item(&["motorsport", "oversized_graphic"])
        }
      })
      .collect();

    let first = generate_concepts(&sample);
    let second = generate_concepts(&sample);
    assert_eq!(
      serde_json::to_string(&first).unwrap(),
      serde_json::to_string(&second).unwrap()
    );
  }

  #[test]
  fn single_tag_items_are_ignored() {
    let sample = vec![kept_item(&["metal"]), kept_item(&["gym"])];
    assert!(generate_concepts(&sample).is_empty());
  }

  #[test]
  fn pairs_rank_by_frequency() {
    let mut sample = vec![kept_item(&["motorsport", "washed_black"])];
    for _ in 0..3 {
      sample.push(kept_item(&["grunge", "metal"]));
    }

    let concepts = generate_concepts(&sample);
    assert_eq!(concepts.len(), 2);
    assert_eq!(concepts[0].concept_name, "Grunge x Metal #1");
    assert_eq!(concepts[1].concept_name, "Motorsport x Washed Black #2");
  }

  #[test]
  fn pair_uses_first_two_of_sorted_tags() {
    let sample = vec![kept_item(&["grunge", "metal", "washed_black"])];
    let concepts = generate_concepts(&sample);
    assert_eq!(concepts[0].concept_name, "Grunge x Metal #1");
  }

  #[test]
  fn concept_fields_are_fully_populated() {
    let c = concept_for("motorsport", "washed_black", 1);
    assert_eq!(c.concept_name, "Motorsport x Washed Black #1");
    assert!(FRONT_PLACEMENTS.contains(&c.front_placement.as_str()));
    assert!(c.back_placement.contains("motorsport"));
    assert!(c.back_placement.contains("washed black"));
    assert!(SLEEVE_DETAILS.contains(&c.sleeve_detail.as_str()));
    assert_eq!(
      c.motifs,
      "checkered flags, racing numbers, speed lines, drag strip, \
       distressed textures, vintage grain, cracked effects"
    );
    assert_eq!(c.slogans.len(), 4);
    assert!(PRINT_STYLES.contains(&c.print_style.as_str()));
    assert_eq!(c.colorways, COLORWAYS);
  }

  #[test]
  fn sleeve_and_print_style_depend_only_on_first_tag() {
    let a = concept_for("western", "metal", 1);
    let b = concept_for("western", "gym", 2);
    assert_eq!(a.sleeve_detail, b.sleeve_detail);
    assert_eq!(a.print_style, b.print_style);
  }

  #[test]
  fn stable_pick_is_in_range() {
    for key in ["metal", "western", "motorsportwashed_black", ""] {
      assert!(stable_pick(key, 5) < 5);
      assert!(stable_pick(key, 4) < 4);
    }
  }
}
