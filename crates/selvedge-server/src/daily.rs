//! The daily builder: poll every configured feed, persist new candidates,
//! then rebuild the ranked feed snapshot.
//!
//! Ingestion and ranking are independent stages. A feed that fails to fetch
//! skips only that feed; a ranking failure leaves the previous `feed.json`
//! in place. Either way the items that were already committed stay
//! committed.

use std::{collections::HashSet, path::Path};

use reqwest::Client;
use selvedge_core::{
  item::{NewItem, ScoredItem},
  profile::TagProfile,
  score::{explain, personalized_score},
  snapshot::{DailySnapshot, FEED_SNAPSHOT},
  store::TrendStore,
  vote::VoteKind,
};
use selvedge_ingest::{FeedConfig, process_feed};
use tracing::{error, info, warn};

use crate::snapshot::write_snapshot;

/// How many recent items the ranking pass considers.
const RECENT_WINDOW: usize = 200;
/// How many ranked items make it into the snapshot.
const SNAPSHOT_SIZE: usize = 100;

/// Run the full daily pass: ingest, rank, write `feed.json`.
pub async fn run<S: TrendStore>(
  store: &S,
  client: &Client,
  feeds: &[FeedConfig],
  data_dir: &Path,
) {
  ingest(store, client, feeds).await;

  match build_ranked_feed(store).await {
    Ok(snapshot) => {
      let count = snapshot.len();
      match write_snapshot(data_dir, FEED_SNAPSHOT, &snapshot).await {
        Ok(()) => info!("wrote daily feed snapshot ({count} items)"),
        Err(e) => error!("failed to write daily feed snapshot: {e:#}"),
      }
    }
    Err(e) => error!("failed to build daily feed: {e}"),
  }
}

/// Poll every feed and insert the candidates that aren't stored yet.
pub async fn ingest<S: TrendStore>(
  store: &S,
  client: &Client,
  feeds: &[FeedConfig],
) {
  let mut inserted = 0usize;
  for feed in feeds {
    match process_feed(client, feed).await {
      Ok(candidates) => {
        inserted += insert_candidates(store, candidates).await;
      }
      Err(e) => warn!("skipping feed {}: {e}", feed.name),
    }
  }
  info!("ingestion pass complete: {inserted} new items");
}

/// Insert candidates whose url is not already stored. Returns the number
/// actually inserted; a failed insert loses that one candidate (the next
/// run will see it again).
pub async fn insert_candidates<S: TrendStore>(
  store: &S,
  candidates: Vec<NewItem>,
) -> usize {
  let mut inserted = 0usize;
  for candidate in candidates {
    match store.item_exists(&candidate.url).await {
      Ok(true) => {}
      Ok(false) => match store.insert_item(candidate).await {
        Ok(_) => inserted += 1,
        Err(e) => warn!("failed to insert item: {e}"),
      },
      Err(e) => warn!("failed existence check: {e}"),
    }
  }
  inserted
}

/// Score and rank the recent items into a snapshot: newest 200 items, minus
/// anything the user has skipped, best score first, top 100.
pub async fn build_ranked_feed<S: TrendStore>(
  store: &S,
) -> Result<DailySnapshot, S::Error> {
  let items = store.recent_items(RECENT_WINDOW).await?;

  // Skips suppress by url, so a re-ingested duplicate stays suppressed.
  let mut skipped_urls = HashSet::new();
  for vote in store.votes_of_kind(VoteKind::Skip, None).await? {
    if let Some(url) = store.item_url(vote.item_id).await? {
      skipped_urls.insert(url);
    }
  }

  let profile = load_profile(store).await;

  let mut ranked: Vec<ScoredItem> = items
    .into_iter()
    .filter(|item| !skipped_urls.contains(&item.url))
    .map(|item| ScoredItem {
      personalized_score: personalized_score(&item, &profile),
      explanation: explain(&item, &profile),
      item,
    })
    .collect();

  ranked.sort_by(|a, b| {
    b.personalized_score
      .partial_cmp(&a.personalized_score)
      .unwrap_or(std::cmp::Ordering::Equal)
  });
  ranked.truncate(SNAPSHOT_SIZE);

  Ok(ranked)
}

/// Fetch the learned weights in one batch. Failures degrade to the default
/// profile, where every lookup falls back to its base weight.
pub async fn load_profile<S: TrendStore>(store: &S) -> TagProfile {
  let tag_weights = match store.tag_weights().await {
    Ok(weights) => weights,
    Err(e) => {
      warn!("failed to load tag weights, using defaults: {e}");
      return TagProfile::default();
    }
  };
  let pair_weights = match store.pair_weights().await {
    Ok(weights) => weights,
    Err(e) => {
      warn!("failed to load pair weights, using defaults: {e}");
      return TagProfile::default();
    }
  };
  TagProfile { tag_weights, pair_weights }
}
