//! Syndication feed parsing.
//!
//! A hand-written `quick-xml` event-loop reader covering the subset of
//! RSS 2.0 and Atom the pipeline needs: entry link, title, summary,
//! published/updated timestamp, and media/enclosure descriptors. Unknown
//! elements are ignored rather than rejected — real-world feeds are messy.

use chrono::{DateTime, Utc};
use quick_xml::{Reader, events::Event};

use crate::{Error, Result};

// ─── Entry model ─────────────────────────────────────────────────────────────

/// Where a media descriptor came from; the image fallback chain checks them
/// in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
  /// `<media:content url="..."/>`
  Content,
  /// `<media:thumbnail url="..."/>`
  Thumbnail,
  /// `<enclosure url="..." type="..."/>`
  Enclosure { mime: String },
}

#[derive(Debug, Clone)]
pub struct MediaRef {
  pub url:  String,
  pub kind: MediaKind,
}

/// One feed entry, normalized across RSS and Atom.
#[derive(Debug, Clone, Default)]
pub struct FeedEntry {
  /// Required downstream; entries without a link are dropped by the
  /// pipeline.
  pub link:      Option<String>,
  pub title:     Option<String>,
  pub summary:   Option<String>,
  /// The entry's published timestamp, falling back to its updated
  /// timestamp. `None` if the feed provided neither.
  pub published: Option<DateTime<Utc>>,
  pub media:     Vec<MediaRef>,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Which text-bearing element we are currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
  Title,
  Link,
  Summary,
  Published,
  Updated,
}

/// Accept RFC 2822 (RSS `pubDate`) and RFC 3339 (Atom) timestamps.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc2822(s)
    .or_else(|_| DateTime::parse_from_rfc3339(s))
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

fn attr_value(
  e: &quick_xml::events::BytesStart<'_>,
  name: &[u8],
) -> Result<Option<String>> {
  for attr in e.attributes() {
    let attr =
      attr.map_err(|err| Error::FeedParse(format!("bad attribute: {err}")))?;
    if attr.key.as_ref() == name {
      let value = attr
        .unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
      return Ok(Some(value));
    }
  }
  Ok(None)
}

/// Parse a feed document into its entries. Channel-level elements (feed
/// title, channel link, ...) are skipped; only `<item>`/`<entry>` content is
/// collected.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
  let mut reader = Reader::from_str(xml);
  reader.config_mut().trim_text(true);

  let mut entries: Vec<FeedEntry> = Vec::new();
  let mut current: Option<FeedEntry> = None;
  let mut updated: Option<DateTime<Utc>> = None;
  let mut field: Option<Field> = None;

  loop {
    match reader.read_event() {
      Err(e) => return Err(Error::Xml(e.to_string())),
      Ok(Event::Eof) => break,

      Ok(Event::Start(e) | Event::Empty(e)) => {
        let name = e.name();
        match name.as_ref() {
          b"item" | b"entry" => {
            current = Some(FeedEntry::default());
            updated = None;
          }

          _ if current.is_none() => {}

          b"title" => field = Some(Field::Title),
          b"description" | b"summary" => field = Some(Field::Summary),
          b"pubDate" | b"published" => field = Some(Field::Published),
          b"updated" => field = Some(Field::Updated),

          b"link" => {
            // Atom links carry an href attribute; RSS links carry text.
            if let Some(href) = attr_value(&e, b"href")? {
              let rel = attr_value(&e, b"rel")?;
              if rel.as_deref().is_none_or(|r| r == "alternate")
                && let Some(entry) = current.as_mut()
              {
                entry.link = Some(href);
              }
            } else {
              field = Some(Field::Link);
            }
          }

          b"media:content" | b"media:thumbnail" => {
            if let Some(url) = attr_value(&e, b"url")?
              && let Some(entry) = current.as_mut()
            {
              let kind = if name.as_ref() == b"media:content" {
                MediaKind::Content
              } else {
                MediaKind::Thumbnail
              };
              entry.media.push(MediaRef { url, kind });
            }
          }

          b"enclosure" => {
            if let Some(url) = attr_value(&e, b"url")?
              && let Some(entry) = current.as_mut()
            {
              let mime = attr_value(&e, b"type")?.unwrap_or_default();
              entry
                .media
                .push(MediaRef { url, kind: MediaKind::Enclosure { mime } });
            }
          }

          _ => {}
        }
      }

      Ok(Event::Text(t)) => {
        if let (Some(entry), Some(f)) = (current.as_mut(), field) {
          let text = t.unescape().unwrap_or_default().into_owned();
          assign(entry, &mut updated, f, &text);
        }
      }

      Ok(Event::CData(t)) => {
        if let (Some(entry), Some(f)) = (current.as_mut(), field) {
          let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
          assign(entry, &mut updated, f, &text);
        }
      }

      Ok(Event::End(e)) => match e.name().as_ref() {
        b"item" | b"entry" => {
          if let Some(mut entry) = current.take() {
            // Prefer published; fall back to updated.
            entry.published = entry.published.or(updated.take());
            entries.push(entry);
          }
          field = None;
        }
        _ => field = None,
      },

      Ok(_) => {}
    }
  }

  Ok(entries)
}

fn assign(
  entry: &mut FeedEntry,
  updated: &mut Option<DateTime<Utc>>,
  field: Field,
  text: &str,
) {
  match field {
    Field::Title => entry.title = Some(text.to_owned()),
    Field::Link => entry.link = Some(text.to_owned()),
    Field::Summary => entry.summary = Some(text.to_owned()),
    Field::Published => entry.published = parse_date(text),
    Field::Updated => *updated = parse_date(text),
  }
}
