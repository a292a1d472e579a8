//! Error type for `selvedge-ingest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("xml error: {0}")]
  Xml(String),

  #[error("feed parse error: {0}")]
  FeedParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
