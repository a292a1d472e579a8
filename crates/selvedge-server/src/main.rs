//! Selvedge server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and runs one of three subcommands:
//!
//! - `daily`: poll every configured feed and rebuild the ranked feed
//!   snapshot. Run it from cron, once a day.
//! - `weekly`: mine the last seven days for patterns, generate design
//!   concepts, and rebuild the weekly snapshot.
//! - `serve`: serve the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use selvedge_server::{config::ServerConfig, daily, weekly};
use selvedge_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Selvedge trend curation engine")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest all configured feeds and rebuild the daily ranked feed.
  Daily,
  /// Mine weekly patterns, generate concepts, rebuild the weekly snapshot.
  Weekly,
  /// Serve the JSON API.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SELVEDGE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let data_dir = expand_tilde(&server_cfg.data_dir);

  match cli.command {
    Command::Daily => {
      anyhow::ensure!(
        !server_cfg.feeds.is_empty(),
        "no feeds configured; add a [[feeds]] entry to config.toml"
      );
      let client =
        selvedge_ingest::http_client().context("failed to build HTTP client")?;
      daily::run(&store, &client, &server_cfg.feeds, &data_dir).await;
    }

    Command::Weekly => {
      weekly::run(&store, &data_dir).await;
    }

    Command::Serve => {
      let app = selvedge_api::api_router(Arc::new(store), data_dir)
        .layer(TraceLayer::new_for_http());
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
