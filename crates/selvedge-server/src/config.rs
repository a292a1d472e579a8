//! Runtime configuration, deserialised from `config.toml` and the
//! `SELVEDGE_*` environment.

use std::path::PathBuf;

use selvedge_ingest::FeedConfig;
use serde::Deserialize;

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

/// Top-level configuration for all subcommands.
///
/// `store_path`, `data_dir`, and `feeds` have no defaults: a config file
/// that omits them fails deserialisation and the process exits non-zero
/// before touching the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,

  /// Path to the SQLite database file.
  pub store_path: PathBuf,
  /// Directory the builders write `feed.json` and `weekly.json` into.
  pub data_dir:   PathBuf,
  /// The feeds the daily builder polls.
  pub feeds:      Vec<FeedConfig>,
}
