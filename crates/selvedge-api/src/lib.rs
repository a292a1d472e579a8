//! JSON API for Selvedge.
//!
//! Exposes an axum [`Router`] backed by any
//! [`selvedge_core::store::TrendStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! The snapshot endpoints (`/feed`, `/weekly`) serve the JSON artifacts the
//! builders wrote into the data directory; the vote endpoint records
//! feedback and applies the preference-learning deltas inline.

pub mod error;
pub mod snapshots;
pub mod votes;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use selvedge_core::store::TrendStore;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  /// Where the builders leave `feed.json` and `weekly.json`.
  pub data_dir: PathBuf,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), data_dir: self.data_dir.clone() }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, data_dir: PathBuf) -> Router<()>
where
  S: TrendStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Snapshots
    .route("/feed", get(snapshots::daily::<S>))
    .route("/weekly", get(snapshots::weekly::<S>))
    // Votes
    .route("/votes", post(votes::create::<S>))
    .route("/saved", get(votes::saved::<S>))
    .with_state(ApiState { store, data_dir })
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use chrono::Utc;
  use selvedge_core::{item::NewItem, store::TrendStore};
  use selvedge_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  fn test_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("selvedge-api-test-{}", Uuid::new_v4()))
  }

  async fn oneshot(
    store: Arc<SqliteStore>,
    data_dir: PathBuf,
    method: &str,
    uri: &str,
    body: &str,
  ) -> axum::response::Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    api_router(store, data_dir).oneshot(req).await.unwrap()
  }

  async fn insert_item(store: &SqliteStore, url: &str, tags: &[&str]) -> Uuid {
    store
      .insert_item(NewItem {
        url:           url.to_owned(),
        title:         "tee".to_owned(),
        source:        "heddels".to_owned(),
        image_url:     "https://example.com/i.jpg".to_owned(),
        summary:       String::new(),
        pub_date:      Utc::now(),
        tags:          tags.iter().map(|t| (*t).to_owned()).collect(),
        cluster_score: tags.len() as u32,
      })
      .await
      .unwrap()
      .item_id
  }

  async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Snapshots ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn feed_returns_404_before_first_build() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let resp = oneshot(store, test_data_dir(), "GET", "/feed", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn feed_serves_the_written_snapshot_verbatim() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let data_dir = test_data_dir();

    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("feed.json"), r#"[{"title":"tee"}]"#)
      .unwrap();

    let resp = oneshot(store, data_dir, "GET", "/feed", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      json_body(resp).await,
      serde_json::json!([{ "title": "tee" }])
    );
  }

  // ── Votes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn vote_on_unknown_item_returns_404() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let body = serde_json::json!({
      "item_id": Uuid::new_v4(),
      "kind":    "keep",
    })
    .to_string();
    let resp = oneshot(store, test_data_dir(), "POST", "/votes", &body).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn keep_vote_returns_201_and_learns_weights() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let id =
      insert_item(&store, "https://example.com/a", &["grunge", "motorsport"])
        .await;

    let body =
      serde_json::json!({ "item_id": id, "kind": "keep" }).to_string();
    let resp =
      oneshot(store.clone(), test_data_dir(), "POST", "/votes", &body).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Each tag got the keep delta on top of the default base.
    let weights = store.tag_weights().await.unwrap();
    assert_eq!(weights.get("grunge"), Some(&1.2));
    assert_eq!(weights.get("motorsport"), Some(&1.2));

    // So did the pair.
    let pairs = store.pair_weights().await.unwrap();
    assert_eq!(
      pairs.get(&("grunge".to_owned(), "motorsport".to_owned())),
      Some(&0.8)
    );
  }

  #[tokio::test]
  async fn skip_vote_weakens_tags_but_not_pairs() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let id =
      insert_item(&store, "https://example.com/a", &["grunge", "motorsport"])
        .await;

    let body =
      serde_json::json!({ "item_id": id, "kind": "skip" }).to_string();
    let resp =
      oneshot(store.clone(), test_data_dir(), "POST", "/votes", &body).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let weights = store.tag_weights().await.unwrap();
    assert_eq!(weights.get("grunge"), Some(&0.9));
    assert!(store.pair_weights().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn saved_lists_each_kept_item_once() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let id = insert_item(&store, "https://example.com/a", &["grunge"]).await;

    // Two keeps on the same item.
    for _ in 0..2 {
      let body =
        serde_json::json!({ "item_id": id, "kind": "keep" }).to_string();
      oneshot(store.clone(), test_data_dir(), "POST", "/votes", &body).await;
    }

    let resp =
      oneshot(store.clone(), test_data_dir(), "GET", "/saved", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let saved = json_body(resp).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["url"], "https://example.com/a");
  }
}
