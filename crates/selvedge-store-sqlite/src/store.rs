//! [`SqliteStore`] — the SQLite implementation of [`TrendStore`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use selvedge_core::{
  concept::Concept,
  item::{Item, NewItem},
  profile::{DEFAULT_PAIR_WEIGHT, DEFAULT_TAG_WEIGHT, pair_key},
  store::TrendStore,
  trend::Pattern,
  vote::{NewVote, Vote, VoteKind},
};

use crate::{
  encode::{
    RawItem, RawVote, encode_date, encode_dt, encode_tags, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

const ITEM_COLUMNS: &str =
  "item_id, url, title, source, image_url, summary, pub_date, tags, \
   cluster_score";

fn raw_item(row: &rusqlite::Row) -> rusqlite::Result<RawItem> {
  Ok(RawItem {
    item_id:       row.get(0)?,
    url:           row.get(1)?,
    title:         row.get(2)?,
    source:        row.get(3)?,
    image_url:     row.get(4)?,
    summary:       row.get(5)?,
    pub_date:      row.get(6)?,
    tags:          row.get(7)?,
    cluster_score: row.get(8)?,
  })
}

fn raw_vote(row: &rusqlite::Row) -> rusqlite::Result<RawVote> {
  Ok(RawVote {
    vote_id:   row.get(0)?,
    item_id:   row.get(1)?,
    vote_kind: row.get(2)?,
    voted_at:  row.get(3)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Selvedge trend store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_items(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Item>> {
    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), raw_item)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }
}

// ─── TrendStore impl ─────────────────────────────────────────────────────────

impl TrendStore for SqliteStore {
  type Error = Error;

  // ── Items ─────────────────────────────────────────────────────────────────

  async fn insert_item(&self, input: NewItem) -> Result<Item> {
    let item = Item {
      item_id:       Uuid::new_v4(),
      url:           input.url,
      title:         input.title,
      source:        input.source,
      image_url:     input.image_url,
      summary:       input.summary,
      pub_date:      input.pub_date,
      tags:          input.tags,
      cluster_score: input.cluster_score,
    };

    let item_id_str  = encode_uuid(item.item_id);
    let url          = item.url.clone();
    let title        = item.title.clone();
    let source       = item.source.clone();
    let image_url    = item.image_url.clone();
    let summary      = item.summary.clone();
    let pub_date_str = encode_dt(item.pub_date);
    let tags_str     = encode_tags(&item.tags)?;
    let score        = i64::from(item.cluster_score);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO items (
             item_id, url, title, source, image_url, summary, pub_date,
             tags, cluster_score
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            item_id_str,
            url,
            title,
            source,
            image_url,
            summary,
            pub_date_str,
            tags_str,
            score,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn item_exists(&self, url: &str) -> Result<bool> {
    let url = url.to_owned();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM items WHERE url = ?1",
              rusqlite::params![url],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = ?1"),
              rusqlite::params![id_str],
              raw_item,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn recent_items(&self, limit: usize) -> Result<Vec<Item>> {
    // `limit` comes from code, never from user input.
    self
      .query_items(
        format!(
          "SELECT {ITEM_COLUMNS} FROM items ORDER BY pub_date DESC \
           LIMIT {limit}"
        ),
        Vec::new(),
      )
      .await
  }

  async fn items_since(&self, start: DateTime<Utc>) -> Result<Vec<Item>> {
    self
      .query_items(
        format!("SELECT {ITEM_COLUMNS} FROM items WHERE pub_date >= ?1"),
        vec![encode_dt(start)],
      )
      .await
  }

  async fn items_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Item>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let placeholders: Vec<String> =
      (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
      "SELECT {ITEM_COLUMNS} FROM items WHERE item_id IN ({})",
      placeholders.join(", ")
    );
    let params: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    self.query_items(sql, params).await
  }

  async fn item_url(&self, id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let url = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT url FROM items WHERE item_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(url)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn record_vote(&self, input: NewVote) -> Result<Vote> {
    let vote = Vote {
      vote_id:  Uuid::new_v4(),
      item_id:  input.item_id,
      kind:     input.kind,
      voted_at: Utc::now(),
    };

    let vote_id_str = encode_uuid(vote.vote_id);
    let item_id_str = encode_uuid(vote.item_id);
    let kind_str    = vote.kind.as_str().to_owned();
    let at_str      = encode_dt(vote.voted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO votes (vote_id, item_id, vote_kind, voted_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![vote_id_str, item_id_str, kind_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(vote)
  }

  async fn votes_of_kind(
    &self,
    kind: VoteKind,
    since: Option<DateTime<Utc>>,
  ) -> Result<Vec<Vote>> {
    let kind_str = kind.as_str().to_owned();
    let since_str = since.map(encode_dt);

    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(since) = since_str {
          let mut stmt = conn.prepare(
            "SELECT vote_id, item_id, vote_kind, voted_at FROM votes
             WHERE vote_kind = ?1 AND voted_at >= ?2",
          )?;
          stmt
            .query_map(rusqlite::params![kind_str, since], raw_vote)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT vote_id, item_id, vote_kind, voted_at FROM votes
             WHERE vote_kind = ?1",
          )?;
          stmt
            .query_map(rusqlite::params![kind_str], raw_vote)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  async fn recent_votes(
    &self,
    kind: VoteKind,
    limit: usize,
  ) -> Result<Vec<Vote>> {
    let kind_str = kind.as_str().to_owned();
    let limit = limit as i64;

    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT vote_id, item_id, vote_kind, voted_at FROM votes
           WHERE vote_kind = ?1 ORDER BY voted_at DESC LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, limit], raw_vote)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  // ── Learned weights ───────────────────────────────────────────────────────

  async fn tag_weights(&self) -> Result<HashMap<String, f64>> {
    let rows: Vec<(String, f64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT tag, weight FROM tag_weights")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().collect())
  }

  async fn pair_weights(&self) -> Result<HashMap<(String, String), f64>> {
    let rows: Vec<(String, String, f64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT tag_a, tag_b, weight FROM tag_pair_weights")?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().map(|(a, b, w)| ((a, b), w)).collect())
  }

  async fn bump_tag_weight(&self, tag: &str, delta: f64) -> Result<()> {
    let tag = tag.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tag_weights (tag, weight)
           VALUES (?1, MAX(0.0, ?2 + ?3))
           ON CONFLICT(tag) DO UPDATE SET weight = MAX(0.0, weight + ?3)",
          rusqlite::params![tag, DEFAULT_TAG_WEIGHT, delta],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn bump_pair_weight(
    &self,
    tag_a: &str,
    tag_b: &str,
    delta: f64,
  ) -> Result<()> {
    let (a, b) = pair_key(tag_a, tag_b);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tag_pair_weights (tag_a, tag_b, weight)
           VALUES (?1, ?2, MAX(0.0, ?3 + ?4))
           ON CONFLICT(tag_a, tag_b)
           DO UPDATE SET weight = MAX(0.0, weight + ?4)",
          rusqlite::params![a, b, DEFAULT_PAIR_WEIGHT, delta],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Weekly artifacts ──────────────────────────────────────────────────────

  async fn insert_pattern(
    &self,
    week_start: NaiveDate,
    pattern: Pattern,
  ) -> Result<()> {
    let pattern_id_str = encode_uuid(Uuid::new_v4());
    let week_str       = encode_date(week_start);
    let co_tags_str    = serde_json::to_string(&pattern.co_tags)?;
    let sources_str    = serde_json::to_string(&pattern.sources)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO weekly_patterns (
             pattern_id, week_start, tag, keep_count, seen_count, keep_rate,
             co_tags, sources, pattern_title, direction, action
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            pattern_id_str,
            week_str,
            pattern.tag,
            i64::from(pattern.keep_count),
            i64::from(pattern.seen_count),
            pattern.keep_rate,
            co_tags_str,
            sources_str,
            pattern.pattern_title,
            pattern.direction,
            pattern.action,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_concept(
    &self,
    week_start: NaiveDate,
    concept: Concept,
  ) -> Result<()> {
    let concept_id_str = encode_uuid(Uuid::new_v4());
    let week_str       = encode_date(week_start);
    let slogans_str    = serde_json::to_string(&concept.slogans)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO weekly_concepts (
             concept_id, week_start, concept_name, front_placement,
             back_placement, sleeve_detail, motifs, slogans, print_style,
             colorways
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            concept_id_str,
            week_str,
            concept.concept_name,
            concept.front_placement,
            concept.back_placement,
            concept.sleeve_detail,
            concept.motifs,
            slogans_str,
            concept.print_style,
            concept.colorways,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
