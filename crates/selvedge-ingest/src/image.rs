//! Preview-image resolution.
//!
//! An ordered chain of fallible lookups, short-circuiting on the first hit:
//! `media:content` → `media:thumbnail` → image-typed enclosure → the linked
//! page's `og:image` meta tag → its `twitter:image` meta tag. The page fetch
//! is best-effort: any failure is logged at debug level and treated as
//! "no image found", never propagated.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::feed::{FeedEntry, MediaKind};

/// Pick an image straight from the entry's media descriptors, in fallback
/// order. Non-image enclosures (podcast audio, etc.) are passed over.
pub fn entry_image(entry: &FeedEntry) -> Option<String> {
  let by_kind = |pred: &dyn Fn(&MediaKind) -> bool| {
    entry
      .media
      .iter()
      .find(|m| pred(&m.kind))
      .map(|m| m.url.clone())
  };

  by_kind(&|k| *k == MediaKind::Content)
    .or_else(|| by_kind(&|k| *k == MediaKind::Thumbnail))
    .or_else(|| {
      by_kind(&|k| {
        matches!(k, MediaKind::Enclosure { mime } if mime.contains("image"))
      })
    })
}

/// Extract a preview image from a fetched page: `og:image` first, then
/// `twitter:image`.
pub fn meta_image(html: &str) -> Option<String> {
  let document = Html::parse_document(html);

  let og = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
  if let Some(content) =
    document.select(&og).next().and_then(|el| el.value().attr("content"))
  {
    return Some(content.to_owned());
  }

  let twitter = Selector::parse(r#"meta[name="twitter:image"]"#).ok()?;
  document
    .select(&twitter)
    .next()
    .and_then(|el| el.value().attr("content"))
    .map(str::to_owned)
}

/// Run the full fallback chain for an entry. Returns `None` when no image
/// can be resolved — the pipeline drops such entries.
pub async fn resolve_image(
  client: &Client,
  entry: &FeedEntry,
) -> Option<String> {
  if let Some(url) = entry_image(entry) {
    return Some(url);
  }

  let link = entry.link.as_deref()?;
  match fetch_page(client, link).await {
    Ok(html) => meta_image(&html),
    Err(e) => {
      debug!("image fallback fetch failed for {link}: {e}");
      None
    }
  }
}

async fn fetch_page(client: &Client, url: &str) -> reqwest::Result<String> {
  client.get(url).send().await?.error_for_status()?.text().await
}
