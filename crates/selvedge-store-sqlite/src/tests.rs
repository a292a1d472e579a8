//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use selvedge_core::{
  concept::concept_for,
  item::NewItem,
  store::TrendStore,
  trend::Pattern,
  vote::{NewVote, VoteKind},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn tee_item(url: &str, tags: &[&str]) -> NewItem {
  NewItem {
    url:           url.into(),
    title:         "Washed black racing tee".into(),
    source:        "heddels".into(),
    image_url:     "https://example.com/tee.jpg".into(),
    summary:       "A washed black tee with oversized racing graphics".into(),
    pub_date:      Utc::now(),
    tags:          tags.iter().map(|t| (*t).to_owned()).collect(),
    cluster_score: tags.len() as u32,
  }
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_item() {
  let s = store().await;

  let item = s
    .insert_item(tee_item("https://example.com/a", &[
      "motorsport",
      "washed_black",
    ]))
    .await
    .unwrap();

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(fetched.url, "https://example.com/a");
  assert_eq!(fetched.tags, vec!["motorsport", "washed_black"]);
  assert_eq!(fetched.cluster_score, 2);
}

#[tokio::test]
async fn get_item_missing_returns_none() {
  let s = store().await;
  assert!(s.get_item(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn item_exists_by_url() {
  let s = store().await;
  s.insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();

  assert!(s.item_exists("https://example.com/a").await.unwrap());
  assert!(!s.item_exists("https://example.com/b").await.unwrap());
}

#[tokio::test]
async fn duplicate_url_insert_is_rejected() {
  // Idempotency belongs to the caller (exists-then-insert), but the UNIQUE
  // constraint backstops a race.
  let s = store().await;
  s.insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();

  let second = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await;
  assert!(second.is_err());
}

#[tokio::test]
async fn recent_items_orders_by_pub_date_desc() {
  let s = store().await;
  let base = Utc::now();

  for (i, url) in ["one", "two", "three"].iter().enumerate() {
    let mut item = tee_item(&format!("https://example.com/{url}"), &["gym"]);
    item.pub_date = base - Duration::days(i as i64);
    s.insert_item(item).await.unwrap();
  }

  let recent = s.recent_items(2).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].url, "https://example.com/one");
  assert_eq!(recent[1].url, "https://example.com/two");
}

#[tokio::test]
async fn items_since_filters_on_pub_date() {
  let s = store().await;
  let now = Utc::now();

  let mut fresh = tee_item("https://example.com/fresh", &["gym"]);
  fresh.pub_date = now - Duration::days(2);
  s.insert_item(fresh).await.unwrap();

  let mut stale = tee_item("https://example.com/stale", &["gym"]);
  stale.pub_date = now - Duration::days(30);
  s.insert_item(stale).await.unwrap();

  let window = s.items_since(now - Duration::days(7)).await.unwrap();
  assert_eq!(window.len(), 1);
  assert_eq!(window[0].url, "https://example.com/fresh");
}

#[tokio::test]
async fn items_by_ids_skips_unknown_ids() {
  let s = store().await;
  let a = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();
  let b = s
    .insert_item(tee_item("https://example.com/b", &["western"]))
    .await
    .unwrap();

  let found = s
    .items_by_ids(&[a.item_id, Uuid::new_v4(), b.item_id])
    .await
    .unwrap();
  assert_eq!(found.len(), 2);

  let none = s.items_by_ids(&[]).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn item_url_resolves_id() {
  let s = store().await;
  let item = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();

  assert_eq!(
    s.item_url(item.item_id).await.unwrap().as_deref(),
    Some("https://example.com/a")
  );
  assert!(s.item_url(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_query_votes() {
  let s = store().await;
  let item = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();

  let vote = s
    .record_vote(NewVote { item_id: item.item_id, kind: VoteKind::Keep })
    .await
    .unwrap();
  assert_eq!(vote.kind, VoteKind::Keep);
  s.record_vote(NewVote { item_id: item.item_id, kind: VoteKind::Skip })
    .await
    .unwrap();

  let keeps = s.votes_of_kind(VoteKind::Keep, None).await.unwrap();
  assert_eq!(keeps.len(), 1);
  assert_eq!(keeps[0].item_id, item.item_id);

  let skips = s.votes_of_kind(VoteKind::Skip, None).await.unwrap();
  assert_eq!(skips.len(), 1);
}

#[tokio::test]
async fn votes_of_kind_honours_since() {
  let s = store().await;
  let item = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();
  s.record_vote(NewVote { item_id: item.item_id, kind: VoteKind::Keep })
    .await
    .unwrap();

  let future = Utc::now() + Duration::hours(1);
  assert!(
    s.votes_of_kind(VoteKind::Keep, Some(future))
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn recent_votes_respects_limit() {
  let s = store().await;
  let item = s
    .insert_item(tee_item("https://example.com/a", &["metal"]))
    .await
    .unwrap();

  for _ in 0..5 {
    s.record_vote(NewVote { item_id: item.item_id, kind: VoteKind::Keep })
      .await
      .unwrap();
  }

  let recent = s.recent_votes(VoteKind::Keep, 3).await.unwrap();
  assert_eq!(recent.len(), 3);
}

// ─── Weights ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bump_tag_weight_creates_then_accumulates() {
  let s = store().await;

  // First keep: base 1.0 + 0.2.
  s.bump_tag_weight("motorsport", 0.2).await.unwrap();
  let weights = s.tag_weights().await.unwrap();
  assert!((weights["motorsport"] - 1.2).abs() < 1e-9);

  s.bump_tag_weight("motorsport", 0.2).await.unwrap();
  let weights = s.tag_weights().await.unwrap();
  assert!((weights["motorsport"] - 1.4).abs() < 1e-9);
}

#[tokio::test]
async fn tag_weight_is_floored_at_zero() {
  let s = store().await;

  for _ in 0..20 {
    s.bump_tag_weight("gym", -0.1).await.unwrap();
  }
  let weights = s.tag_weights().await.unwrap();
  assert!(weights["gym"] >= 0.0);
}

#[tokio::test]
async fn pair_weight_key_is_canonical() {
  let s = store().await;

  // Both orders must hit the same row: base 0.5 + 0.3 + 0.3.
  s.bump_pair_weight("western", "metal", 0.3).await.unwrap();
  s.bump_pair_weight("metal", "western", 0.3).await.unwrap();

  let pairs = s.pair_weights().await.unwrap();
  assert_eq!(pairs.len(), 1);
  let w = pairs[&("metal".to_owned(), "western".to_owned())];
  assert!((w - 1.1).abs() < 1e-9);
}

#[tokio::test]
async fn empty_weight_maps_on_fresh_store() {
  let s = store().await;
  assert!(s.tag_weights().await.unwrap().is_empty());
  assert!(s.pair_weights().await.unwrap().is_empty());
}

// ─── Weekly artifacts ────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_weekly_artifacts() {
  let s = store().await;
  let week = NaiveDate::from_ymd_opt(2026, 8, 17).unwrap();

  let pattern = Pattern {
    tag:           "motorsport".into(),
    keep_count:    4,
    seen_count:    10,
    keep_rate:     0.4,
    co_tags:       vec!["washed_black".into()],
    sources:       vec![("heddels".into(), 4)],
    pattern_title: "High engagement with Motorsport".into(),
    direction:     "Strong preference for motorsport combined with washed \
                    black"
      .into(),
    action:        "Oversized racing graphics on washed black tees with \
                    checkered flags combined with washed black elements"
      .into(),
  };
  s.insert_pattern(week, pattern).await.unwrap();

  let concept = concept_for("motorsport", "washed_black", 1);
  s.insert_concept(week, concept).await.unwrap();
}
