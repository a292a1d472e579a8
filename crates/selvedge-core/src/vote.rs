//! Vote — binary keep/skip feedback on an item.
//!
//! A vote holds a weak reference to its item: it never owns or extends the
//! lifetime of the referenced record. Votes are created by the consumer
//! application and are read-only input to the scoring and mining stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The two feedback signals the consumer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
  Keep,
  Skip,
}

impl VoteKind {
  /// The string stored in the `vote_kind` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Keep => "keep",
      Self::Skip => "skip",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "keep" => Ok(Self::Keep),
      "skip" => Ok(Self::Skip),
      other => Err(Error::UnknownVoteKind(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub vote_id:  Uuid,
  /// The voted item. Many votes may reference one item.
  pub item_id:  Uuid,
  pub kind:     VoteKind,
  pub voted_at: DateTime<Utc>,
}

/// Input to [`crate::store::TrendStore::record_vote`].
/// `vote_id` and `voted_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVote {
  pub item_id: Uuid,
  pub kind:    VoteKind,
}
