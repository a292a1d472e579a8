//! The weekly builder: mine the last seven days for kept-tag patterns,
//! generate design concepts from recent keeps, persist both, and write
//! `weekly.json`.
//!
//! Pattern mining and concept generation are independent stages — if one
//! fails its half of the snapshot is empty, the other half still ships.

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Duration, Utc};
use selvedge_core::{
  concept::{Concept, generate_concepts},
  snapshot::{WEEKLY_SNAPSHOT, WeeklySnapshot},
  store::TrendStore,
  trend::{Pattern, mine_patterns},
  vote::VoteKind,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::snapshot::write_snapshot;

/// The mining window.
const WINDOW_DAYS: i64 = 7;
/// How many recent keeps seed concept generation.
const KEPT_SAMPLE: usize = 30;

/// Run the full weekly pass and write `weekly.json`.
pub async fn run<S: TrendStore>(store: &S, data_dir: &Path) {
  let now = Utc::now();
  let week_start = (now - Duration::days(WINDOW_DAYS)).date_naive();

  let patterns = match mine_window(store, now).await {
    Ok(patterns) => patterns,
    Err(e) => {
      error!("failed to mine weekly patterns: {e}");
      Vec::new()
    }
  };
  for pattern in &patterns {
    if let Err(e) = store.insert_pattern(week_start, pattern.clone()).await {
      warn!("failed to persist pattern for {}: {e}", pattern.tag);
    }
  }

  let concepts = match concepts_from_recent_keeps(store).await {
    Ok(concepts) => concepts,
    Err(e) => {
      error!("failed to generate concepts: {e}");
      Vec::new()
    }
  };
  for concept in &concepts {
    if let Err(e) = store.insert_concept(week_start, concept.clone()).await {
      warn!("failed to persist concept {}: {e}", concept.concept_name);
    }
  }

  let snapshot =
    WeeklySnapshot { patterns, concepts, generated_at: now };
  match write_snapshot(data_dir, WEEKLY_SNAPSHOT, &snapshot).await {
    Ok(()) => info!(
      "wrote weekly snapshot ({} patterns, {} concepts)",
      snapshot.patterns.len(),
      snapshot.concepts.len()
    ),
    Err(e) => error!("failed to write weekly snapshot: {e:#}"),
  }
}

/// Mine patterns from the items and keep votes of the trailing window.
pub async fn mine_window<S: TrendStore>(
  store: &S,
  now: DateTime<Utc>,
) -> Result<Vec<Pattern>, S::Error> {
  let window_start = now - Duration::days(WINDOW_DAYS);
  let items = store.items_since(window_start).await?;
  let keeps = store.votes_of_kind(VoteKind::Keep, Some(window_start)).await?;
  let kept_ids: HashSet<Uuid> = keeps.iter().map(|v| v.item_id).collect();
  Ok(mine_patterns(&items, &kept_ids))
}

/// Generate concepts from the items behind the most recent keep votes.
pub async fn concepts_from_recent_keeps<S: TrendStore>(
  store: &S,
) -> Result<Vec<Concept>, S::Error> {
  let keeps = store.recent_votes(VoteKind::Keep, KEPT_SAMPLE).await?;
  let ids: Vec<Uuid> = keeps.iter().map(|v| v.item_id).collect();
  let kept_items = store.items_by_ids(&ids).await?;
  Ok(generate_concepts(&kept_items))
}

#[cfg(test)]
mod tests {
  use selvedge_core::{item::NewItem, vote::NewVote};
  use selvedge_store_sqlite::SqliteStore;

  use super::*;

  fn candidate(url: &str, tags: &[&str], age_hours: i64) -> NewItem {
    NewItem {
      url:           url.to_owned(),
      title:         format!("item {url}"),
      source:        "heddels".to_owned(),
      image_url:     "https://example.com/i.jpg".to_owned(),
      summary:       String::new(),
      pub_date:      Utc::now() - Duration::hours(age_hours),
      tags:          tags.iter().map(|t| (*t).to_owned()).collect(),
      cluster_score: tags.len() as u32,
    }
  }

  async fn insert_and_keep(
    store: &SqliteStore,
    url: &str,
    tags: &[&str],
  ) -> Uuid {
    let item = store.insert_item(candidate(url, tags, 1)).await.unwrap();
    store
      .record_vote(NewVote { item_id: item.item_id, kind: VoteKind::Keep })
      .await
      .unwrap();
    item.item_id
  }

  #[tokio::test]
  async fn window_mining_finds_a_qualifying_pattern() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    // 3 keeps out of 5 motorsport sightings: rate 0.6 qualifies.
    for i in 0..3 {
      insert_and_keep(
        &store,
        &format!("https://example.com/keep{i}"),
        &["motorsport"],
      )
      .await;
    }
    for i in 0..2 {
      store
        .insert_item(candidate(
          &format!("https://example.com/seen{i}"),
          &["motorsport"],
          2,
        ))
        .await
        .unwrap();
    }

    let patterns = mine_window(&store, Utc::now()).await.unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].tag, "motorsport");
    assert_eq!(patterns[0].keep_count, 3);
    assert_eq!(patterns[0].seen_count, 5);
  }

  #[tokio::test]
  async fn old_items_fall_outside_the_window() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    // Well past the 7-day window.
    let old = store
      .insert_item(candidate("https://example.com/old", &["grunge"], 24 * 30))
      .await
      .unwrap();
    store
      .record_vote(NewVote { item_id: old.item_id, kind: VoteKind::Keep })
      .await
      .unwrap();

    // The item is invisible to mining; its keep vote is recent but finds
    // no matching item in the window.
    let patterns = mine_window(&store, Utc::now()).await.unwrap();
    assert!(patterns.is_empty());
  }

  #[tokio::test]
  async fn concepts_come_from_kept_pairs() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    for i in 0..3 {
      insert_and_keep(
        &store,
        &format!("https://example.com/k{i}"),
        &["grunge", "motorsport"],
      )
      .await;
    }

    let concepts = concepts_from_recent_keeps(&store).await.unwrap();
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].concept_name, "Grunge x Motorsport #1");
  }

  #[tokio::test]
  async fn single_tag_keeps_generate_no_concepts() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    insert_and_keep(&store, "https://example.com/k", &["grunge"]).await;

    let concepts = concepts_from_recent_keeps(&store).await.unwrap();
    assert!(concepts.is_empty());
  }
}
