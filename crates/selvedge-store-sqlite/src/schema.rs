//! SQL schema for the Selvedge SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per discovered item; url is the identity key, so ingestion
-- re-runs cannot create duplicates.
CREATE TABLE IF NOT EXISTS items (
    item_id       TEXT PRIMARY KEY,
    url           TEXT NOT NULL UNIQUE,
    title         TEXT NOT NULL,
    source        TEXT NOT NULL,
    image_url     TEXT NOT NULL,
    summary       TEXT NOT NULL,
    pub_date      TEXT NOT NULL,   -- ISO 8601 UTC
    tags          TEXT NOT NULL DEFAULT '[]',   -- JSON array, sorted
    cluster_score INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    vote_id   TEXT PRIMARY KEY,
    item_id   TEXT NOT NULL REFERENCES items(item_id),
    vote_kind TEXT NOT NULL,       -- 'keep' | 'skip'
    voted_at  TEXT NOT NULL        -- ISO 8601 UTC; server-assigned
);

-- Learned single-tag preference weights. Rows are created lazily at the
-- default base weight on the first delta.
CREATE TABLE IF NOT EXISTS tag_weights (
    tag    TEXT PRIMARY KEY,
    weight REAL NOT NULL
);

-- Learned pair weights; (tag_a, tag_b) is always lexicographically sorted.
CREATE TABLE IF NOT EXISTS tag_pair_weights (
    tag_a  TEXT NOT NULL,
    tag_b  TEXT NOT NULL,
    weight REAL NOT NULL,
    PRIMARY KEY (tag_a, tag_b),
    CHECK (tag_a <= tag_b)
);

-- Weekly artifacts are append-only: one row per run per finding, prior
-- weeks are never merged or updated.
CREATE TABLE IF NOT EXISTS weekly_patterns (
    pattern_id    TEXT PRIMARY KEY,
    week_start    TEXT NOT NULL,   -- ISO 8601 date
    tag           TEXT NOT NULL,
    keep_count    INTEGER NOT NULL,
    seen_count    INTEGER NOT NULL,
    keep_rate     REAL NOT NULL,
    co_tags       TEXT NOT NULL DEFAULT '[]',   -- JSON array
    sources       TEXT NOT NULL DEFAULT '[]',   -- JSON [source, count] pairs
    pattern_title TEXT NOT NULL,
    direction     TEXT NOT NULL,
    action        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weekly_concepts (
    concept_id      TEXT PRIMARY KEY,
    week_start      TEXT NOT NULL, -- ISO 8601 date
    concept_name    TEXT NOT NULL,
    front_placement TEXT NOT NULL,
    back_placement  TEXT NOT NULL,
    sleeve_detail   TEXT NOT NULL,
    motifs          TEXT NOT NULL,
    slogans         TEXT NOT NULL DEFAULT '[]', -- JSON array of 4
    print_style     TEXT NOT NULL,
    colorways       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS items_pub_date_idx ON items(pub_date);
CREATE INDEX IF NOT EXISTS votes_kind_idx     ON votes(vote_kind);
CREATE INDEX IF NOT EXISTS votes_voted_idx    ON votes(voted_at);

PRAGMA user_version = 1;
";
