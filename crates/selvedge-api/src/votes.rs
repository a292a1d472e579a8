//! Handlers for `/votes` and `/saved`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/votes` | Body: [`NewVoteBody`]; returns 201 + stored vote |
//! | `GET`  | `/saved` | All items with a keep vote |
//!
//! Recording a vote also applies the preference-learning deltas: a keep
//! strengthens each of the item's tag weights and pair weights, a skip
//! weakens the tag weights. Learning failures are logged and swallowed —
//! the vote itself has already been stored.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use selvedge_core::{
  item::Item,
  profile::{KEEP_PAIR_DELTA, KEEP_TAG_DELTA, SKIP_TAG_DELTA},
  store::TrendStore,
  vote::{NewVote, Vote, VoteKind},
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /votes`.
#[derive(Debug, Deserialize)]
pub struct NewVoteBody {
  pub item_id: Uuid,
  pub kind:    VoteKind,
}

/// `POST /votes` — returns 201 + the stored [`Vote`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewVoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrendStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let item = state
    .store
    .get_item(body.item_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("item {} not found", body.item_id)))?;

  let vote = state
    .store
    .record_vote(NewVote { item_id: body.item_id, kind: body.kind })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  apply_learning(state.store.as_ref(), &item, body.kind).await;

  Ok((StatusCode::CREATED, Json(vote)))
}

/// Apply the weight deltas for a vote. Record-level failures degrade to a
/// warning; the next vote on the same tags will catch the weight up.
async fn apply_learning<S>(store: &S, item: &Item, kind: VoteKind)
where
  S: TrendStore,
{
  let tag_delta = match kind {
    VoteKind::Keep => KEEP_TAG_DELTA,
    VoteKind::Skip => SKIP_TAG_DELTA,
  };

  for tag in &item.tags {
    if let Err(e) = store.bump_tag_weight(tag, tag_delta).await {
      warn!("failed to bump weight for tag {tag}: {e}");
    }
  }

  // Pair reinforcement only happens on keeps.
  if kind == VoteKind::Keep {
    for (i, tag_a) in item.tags.iter().enumerate() {
      for tag_b in &item.tags[i + 1..] {
        if let Err(e) =
          store.bump_pair_weight(tag_a, tag_b, KEEP_PAIR_DELTA).await
        {
          warn!("failed to bump weight for pair ({tag_a}, {tag_b}): {e}");
        }
      }
    }
  }
}

// ─── Saved ───────────────────────────────────────────────────────────────────

/// `GET /saved` — the items the user has kept.
pub async fn saved<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Item>>, ApiError>
where
  S: TrendStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let keeps = state
    .store
    .votes_of_kind(VoteKind::Keep, None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut ids: Vec<Uuid> = keeps.iter().map(|v| v.item_id).collect();
  ids.sort_unstable();
  ids.dedup();

  let items = state
    .store
    .items_by_ids(&ids)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(items))
}
