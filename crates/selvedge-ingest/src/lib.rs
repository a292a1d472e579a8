//! The Selvedge ingestion pipeline.
//!
//! Per configured feed: fetch the feed XML, parse it (RSS 2.0 and Atom),
//! classify and gate each entry, resolve a preview image through the ordered
//! fallback chain, and emit normalized [`NewItem`](selvedge_core::item::NewItem)
//! candidates. Feeds are processed one at a time, entries one at a time; all
//! network calls carry a bounded timeout and degrade rather than block.
//!
//! Failure policy follows the smallest enclosing unit: a bad entry skips that
//! entry, a bad feed skips that feed, and nothing here is ever fatal.

pub mod error;
pub mod feed;
pub mod image;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{FeedConfig, http_client, process_feed};
