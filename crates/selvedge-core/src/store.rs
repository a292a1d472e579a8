//! The `TrendStore` trait — the narrow storage contract the engine needs.
//!
//! The trait is implemented by storage backends (e.g.
//! `selvedge-store-sqlite`). Higher layers (the builders, the API) depend on
//! this abstraction, not on any concrete backend.
//!
//! Callers are expected to degrade on failure rather than crash: a failed
//! record-level call loses that record, a failed batch-level call aborts the
//! dependent computation step, and both are logged rather than propagated
//! past the smallest enclosing unit of work.

use std::{collections::HashMap, future::Future};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  concept::Concept,
  item::{Item, NewItem},
  trend::Pattern,
  vote::{NewVote, Vote, VoteKind},
};

/// Abstraction over a Selvedge storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TrendStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Items ─────────────────────────────────────────────────────────────

  /// Persist a candidate item and return the stored [`Item`]. The `item_id`
  /// is assigned by the store. The caller has already checked
  /// [`item_exists`](Self::item_exists) for the url.
  fn insert_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  /// Whether an item with this url is already stored. The existence check
  /// that makes re-ingestion idempotent.
  fn item_exists<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve an item by id. Returns `None` if not found.
  fn get_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// The most recent `limit` items, ordered by `pub_date` descending.
  fn recent_items(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  /// All items with `pub_date >= start`.
  fn items_since(
    &self,
    start: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  /// Resolve a batch of item ids. Ids with no stored item are silently
  /// absent from the result.
  fn items_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + 'a;

  /// Resolve an item id to its url. Returns `None` if not found.
  fn item_url(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Record a vote. `vote_id` and `voted_at` are assigned by the store.
  fn record_vote(
    &self,
    input: NewVote,
  ) -> impl Future<Output = Result<Vote, Self::Error>> + Send + '_;

  /// All votes of `kind`, optionally restricted to `voted_at >= since`.
  fn votes_of_kind(
    &self,
    kind: VoteKind,
    since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + '_;

  /// The most recent `limit` votes of `kind`, ordered by `voted_at`
  /// descending.
  fn recent_votes(
    &self,
    kind: VoteKind,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + '_;

  // ── Learned weights ───────────────────────────────────────────────────

  /// The full per-tag weight map. Missing tags default at the call site.
  fn tag_weights(
    &self,
  ) -> impl Future<Output = Result<HashMap<String, f64>, Self::Error>> + Send + '_;

  /// The full per-pair weight map, keyed by lexicographically sorted pairs.
  fn pair_weights(
    &self,
  ) -> impl Future<
    Output = Result<HashMap<(String, String), f64>, Self::Error>,
  > + Send
  + '_;

  /// Add `delta` to a tag's weight, creating the row at the default base
  /// weight if absent. Weights are floored at zero.
  fn bump_tag_weight<'a>(
    &'a self,
    tag: &'a str,
    delta: f64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Add `delta` to a pair's weight; same upsert semantics as
  /// [`bump_tag_weight`](Self::bump_tag_weight). The pair is canonicalised
  /// by the store.
  fn bump_pair_weight<'a>(
    &'a self,
    tag_a: &'a str,
    tag_b: &'a str,
    delta: f64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Weekly artifacts ──────────────────────────────────────────────────

  /// Persist one weekly pattern record. One record per run per qualifying
  /// tag; prior weeks are never merged or updated.
  fn insert_pattern(
    &self,
    week_start: NaiveDate,
    pattern: Pattern,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist one weekly concept record.
  fn insert_concept(
    &self,
    week_start: NaiveDate,
    concept: Concept,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
