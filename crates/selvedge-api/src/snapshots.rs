//! Handlers serving the builder-written snapshot files.
//!
//! | Method | Path      | Notes |
//! |--------|-----------|-------|
//! | `GET`  | `/feed`   | Latest daily ranked feed (`feed.json`) |
//! | `GET`  | `/weekly` | Latest weekly intelligence (`weekly.json`) |
//!
//! Snapshots are served verbatim — the builders already produced final JSON,
//! so the handlers only validate that it still parses.

use axum::{Json, extract::State};
use selvedge_core::{
  snapshot::{FEED_SNAPSHOT, WEEKLY_SNAPSHOT},
  store::TrendStore,
};

use crate::{ApiState, error::ApiError};

async fn read_snapshot(
  state: &ApiState<impl TrendStore>,
  file_name: &str,
) -> Result<Json<serde_json::Value>, ApiError> {
  let path = state.data_dir.join(file_name);
  let raw = tokio::fs::read_to_string(&path).await.map_err(|_| {
    ApiError::NotFound(format!("snapshot {file_name} not generated yet"))
  })?;
  let value: serde_json::Value = serde_json::from_str(&raw)
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(value))
}

/// `GET /feed`
pub async fn daily<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: TrendStore,
{
  read_snapshot(&state, FEED_SNAPSHOT).await
}

/// `GET /weekly`
pub async fn weekly<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: TrendStore,
{
  read_snapshot(&state, WEEKLY_SNAPSHOT).await
}
