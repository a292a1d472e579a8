//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which sort correctly as
//! text for UTC values). List-shaped fields (tags, co_tags, sources,
//! slogans) are stored as compact JSON. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use selvedge_core::{
  item::Item,
  vote::{Vote, VoteKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `items` row.
pub struct RawItem {
  pub item_id:       String,
  pub url:           String,
  pub title:         String,
  pub source:        String,
  pub image_url:     String,
  pub summary:       String,
  pub pub_date:      String,
  pub tags:          String,
  pub cluster_score: i64,
}

impl RawItem {
  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      item_id:       decode_uuid(&self.item_id)?,
      url:           self.url,
      title:         self.title,
      source:        self.source,
      image_url:     self.image_url,
      summary:       self.summary,
      pub_date:      decode_dt(&self.pub_date)?,
      tags:          decode_tags(&self.tags)?,
      cluster_score: self.cluster_score as u32,
    })
  }
}

/// Raw strings read directly from a `votes` row.
pub struct RawVote {
  pub vote_id:   String,
  pub item_id:   String,
  pub vote_kind: String,
  pub voted_at:  String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      vote_id:  decode_uuid(&self.vote_id)?,
      item_id:  decode_uuid(&self.item_id)?,
      kind:     VoteKind::parse(&self.vote_kind).map_err(Error::Core)?,
      voted_at: decode_dt(&self.voted_at)?,
    })
  }
}
