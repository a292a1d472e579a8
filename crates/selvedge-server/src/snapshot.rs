//! Snapshot file writer shared by the builders.

use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

/// Serialise `value` and write it to `data_dir/file_name`, creating the
/// data directory if needed. The write replaces the previous snapshot
/// wholesale.
pub async fn write_snapshot<T: Serialize>(
  data_dir: &Path,
  file_name: &str,
  value: &T,
) -> anyhow::Result<()> {
  tokio::fs::create_dir_all(data_dir)
    .await
    .with_context(|| format!("failed to create data dir {data_dir:?}"))?;

  let json = serde_json::to_string_pretty(value)
    .context("failed to serialise snapshot")?;

  let path = data_dir.join(file_name);
  tokio::fs::write(&path, json)
    .await
    .with_context(|| format!("failed to write snapshot {path:?}"))?;

  Ok(())
}
