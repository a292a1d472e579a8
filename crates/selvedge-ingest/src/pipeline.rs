//! Feed-to-candidate processing.
//!
//! One feed in, zero or more normalized [`NewItem`] candidates out. Entries
//! that fail the quality gate or resolve no preview image are dropped
//! silently (counted in the logs, never raised); a feed that fails to fetch
//! or parse skips only that feed.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use selvedge_core::{
  classify::{admit, classify},
  item::{NewItem, SUMMARY_MAX_CHARS, truncate_chars},
};

use crate::{
  Result,
  feed::{FeedEntry, parse_feed},
  image::resolve_image,
};

/// At most this many entries are considered per feed per run.
const MAX_ENTRIES: usize = 50;
/// Bound on every network call the pipeline makes.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Some feed hosts reject clients without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; selvedge/0.1)";

/// One configured feed: a human-readable source name and the feed URL.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  pub name: String,
  pub url:  String,
}

/// Build the HTTP client shared by feed fetches and image fallbacks.
pub fn http_client() -> reqwest::Result<Client> {
  Client::builder()
    .timeout(FETCH_TIMEOUT)
    .user_agent(USER_AGENT)
    .build()
}

/// Classify, gate, and normalize one entry. `None` when the entry has no
/// link or matches no cluster. Image resolution is the caller's problem —
/// it needs the network, this doesn't.
pub fn build_candidate(
  entry: &FeedEntry,
  source: &str,
  image_url: String,
) -> Option<NewItem> {
  let link = entry.link.clone()?;

  let text = format!(
    "{} {}",
    entry.title.as_deref().unwrap_or(""),
    entry.summary.as_deref().unwrap_or("")
  );
  let tags = classify(&text);
  if !admit(&text, &tags) {
    return None;
  }

  Some(NewItem {
    url: link,
    title: entry.title.clone().unwrap_or_else(|| "Untitled".to_owned()),
    source: source.to_owned(),
    image_url,
    summary: truncate_chars(
      entry.summary.as_deref().unwrap_or(""),
      SUMMARY_MAX_CHARS,
    ),
    pub_date: entry.published.unwrap_or_else(Utc::now),
    cluster_score: tags.len() as u32,
    tags,
  })
}

/// Fetch and process one feed into candidate items.
///
/// Errors here are feed-level (fetch or parse); the caller logs them and
/// moves on to the next feed.
pub async fn process_feed(
  client: &Client,
  feed: &FeedConfig,
) -> Result<Vec<NewItem>> {
  info!("processing feed {}", feed.name);

  let body = client
    .get(&feed.url)
    .send()
    .await?
    .error_for_status()?
    .text()
    .await?;
  let entries = parse_feed(&body)?;

  let mut items = Vec::new();
  let mut dropped_untagged = 0usize;
  let mut dropped_imageless = 0usize;

  for entry in entries.iter().take(MAX_ENTRIES) {
    // Gate before touching the network: most entries die here.
    let text = format!(
      "{} {}",
      entry.title.as_deref().unwrap_or(""),
      entry.summary.as_deref().unwrap_or("")
    );
    let tags = classify(&text);
    if entry.link.is_none() || !admit(&text, &tags) {
      dropped_untagged += 1;
      continue;
    }

    // Text-only items are dropped: the consuming feed is image tiles.
    let Some(image_url) = resolve_image(client, entry).await else {
      debug!("no image resolved for {:?}", entry.link);
      dropped_imageless += 1;
      continue;
    };

    if let Some(item) = build_candidate(entry, &feed.name, image_url) {
      items.push(item);
    }
  }

  info!(
    "feed {}: {} candidates ({dropped_untagged} untagged, \
     {dropped_imageless} imageless)",
    feed.name,
    items.len()
  );
  Ok(items)
}
