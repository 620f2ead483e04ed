//! PaymentsDive RSS feed reader.
//!
//! Fetches the news feed and turns its `channel/item` elements into
//! [`ArticleEntry`] records for the digest generator.
//!
//! Only the first `max_items` items are considered; items whose cleaned
//! title or link is empty are dropped afterwards, so a digest may hold fewer.

use crate::models::ArticleEntry;
use crate::utils::clean_text;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default news feed location.
pub const FEED_URL: &str = "https://www.paymentsdive.com/feeds/news/";
/// How many feed items are considered for one digest.
pub const DEFAULT_MAX_ITEMS: usize = 8;

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields collected from one `<item>` before cleaning.
#[derive(Debug, Default)]
struct RawItem {
    title: String,
    link: String,
    description: String,
    pub_date: String,
}

impl RawItem {
    fn field_mut(&mut self, name: &[u8]) -> Option<&mut String> {
        match name {
            b"title" => Some(&mut self.title),
            b"link" => Some(&mut self.link),
            b"description" => Some(&mut self.description),
            b"pubDate" => Some(&mut self.pub_date),
            _ => None,
        }
    }

    fn into_entry(self) -> Option<ArticleEntry> {
        let title = clean_text(&self.title);
        let link = clean_text(&self.link);
        if title.is_empty() || link.is_empty() {
            return None;
        }
        Some(ArticleEntry {
            title: Some(title),
            link: Some(link),
            description: Some(clean_text(&self.description)),
            published: Some(clean_text(&self.pub_date)),
        })
    }
}

/// Download the feed body.
#[instrument(level = "info")]
pub async fn fetch_feed(feed_url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let client = reqwest::Client::builder().timeout(FEED_TIMEOUT).build()?;
    let body = client
        .get(feed_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    info!(bytes = body.len(), "Fetched feed");
    Ok(body.to_vec())
}

/// Parse an RSS 2.0 document into article entries.
///
/// Reads `title`, `link`, `description` and `pubDate` directly under each
/// `rss/channel/item`. Entity references are decoded and CDATA sections are
/// taken verbatim; markup left inside a field is removed by cleaning.
pub fn parse_items(xml: &[u8], max_items: usize) -> Result<Vec<ArticleEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    // Element names from the document root down to the current element.
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut items: Vec<RawItem> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"item" && is_channel(&path) && items.len() < max_items {
                    current = Some(RawItem::default());
                }
                path.push(name);
            }
            Event::End(_) => {
                let closed = path.pop();
                if closed.as_deref() == Some(b"item".as_slice()) && is_channel(&path) {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(field) = item_field(&mut current, &path) {
                    field.push_str(&t.decode()?);
                }
            }
            Event::GeneralRef(r) => {
                let resolved = resolve_reference(&r)?;
                if let Some(field) = item_field(&mut current, &path) {
                    field.push_str(&resolved);
                }
            }
            Event::CData(c) => {
                if let Some(field) = item_field(&mut current, &path) {
                    field.push_str(&c.decode()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(raw_items = items.len(), "Parsed feed items");
    Ok(items.into_iter().filter_map(RawItem::into_entry).collect())
}

/// Fetch and parse the feed in one step.
#[instrument(level = "info")]
pub async fn fetch_articles(
    feed_url: &str,
    max_items: usize,
) -> Result<Vec<ArticleEntry>, Box<dyn Error>> {
    let body = fetch_feed(feed_url).await?;
    let articles = parse_items(&body, max_items)?;
    info!(count = articles.len(), "Collected feed articles");
    Ok(articles)
}

fn is_channel(path: &[Vec<u8>]) -> bool {
    path.last().map(|n| n.as_slice()) == Some(b"channel".as_slice())
}

/// The field of the open item that text at `path` belongs to, if any.
fn item_field<'a>(current: &'a mut Option<RawItem>, path: &[Vec<u8>]) -> Option<&'a mut String> {
    let item = current.as_mut()?;
    match path {
        [.., parent, field] if parent.as_slice() == b"item" => item.field_mut(field),
        _ => None,
    }
}

/// Expand a character reference or one of the predefined XML entities.
///
/// Entities the document never declares are an error, as in any conforming
/// XML parser.
fn resolve_reference(r: &BytesRef<'_>) -> Result<String, Box<dyn Error>> {
    if let Some(c) = r.resolve_char_ref()? {
        return Ok(c.to_string());
    }
    let name = r.decode()?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("undefined entity &{name};").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rss(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>Payments Dive - Latest News</title>
<link>https://www.paymentsdive.com/</link>
{items}
</channel></rss>"#
        )
    }

    fn item(title: &str, link: &str, description: &str) -> String {
        format!(
            "<item><title>{title}</title><link>{link}</link><description>{description}</description><pubDate>Tue, 06 May 2025 12:00:00 -0400</pubDate></item>"
        )
    }

    #[test]
    fn test_parse_basic_items() {
        let xml = rss(&[
            item("First", "https://x/1", "One"),
            item("Second", "https://x/2", "Two"),
        ]
        .concat());

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("First"));
        assert_eq!(articles[0].link.as_deref(), Some("https://x/1"));
        assert_eq!(articles[0].description.as_deref(), Some("One"));
        assert_eq!(
            articles[0].published.as_deref(),
            Some("Tue, 06 May 2025 12:00:00 -0400")
        );
        assert_eq!(articles[1].title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_channel_title_is_not_an_item() {
        let xml = rss("");
        assert!(parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap().is_empty());
    }

    #[test]
    fn test_escaped_markup_in_description_is_cleaned() {
        let xml = rss(&item(
            "Banks &amp; fintechs",
            "https://x/1",
            "&lt;p&gt;Card   fraud &lt;b&gt;rises&lt;/b&gt;&lt;/p&gt; &#8220;again&#8221;",
        ));

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles[0].title.as_deref(), Some("Banks & fintechs"));
        assert_eq!(
            articles[0].description.as_deref(),
            Some("Card fraud rises \u{201c}again\u{201d}")
        );
    }

    #[test]
    fn test_cdata_description() {
        let xml = rss(&item(
            "T",
            "https://x/1",
            "<![CDATA[<img src=\"a.png\"/> Instant payments grow]]>",
        ));

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles[0].description.as_deref(), Some("Instant payments grow"));
    }

    #[test]
    fn test_items_without_title_or_link_are_dropped() {
        let xml = rss(&[
            item("", "https://x/1", "no title"),
            item("No link", "   ", "d"),
            item("Kept", "https://x/3", ""),
        ]
        .concat());

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title.as_deref(), Some("Kept"));
        assert_eq!(articles[0].description.as_deref(), Some(""));
    }

    #[test]
    fn test_only_first_items_are_considered() {
        let mut items: Vec<String> = (1..=10)
            .map(|i| item(&format!("Story {i}"), &format!("https://x/{i}"), "d"))
            .collect();
        // An unusable item inside the window still counts against it.
        items[0] = item("", "https://x/1", "d");
        let xml = rss(&items.concat());

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles.len(), 7);
        assert_eq!(articles[0].title.as_deref(), Some("Story 2"));
        assert_eq!(articles[6].title.as_deref(), Some("Story 8"));
    }

    #[test]
    fn test_numeric_references_are_decoded() {
        let xml = rss(&item("Caf&#233; &#x2014; pay", "https://x/1", "&#169;2025"));

        let articles = parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).unwrap();
        assert_eq!(articles[0].title.as_deref(), Some("Caf\u{e9} \u{2014} pay"));
        assert_eq!(articles[0].description.as_deref(), Some("\u{a9}2025"));
    }

    #[test]
    fn test_undefined_entity_is_an_error() {
        let xml = rss(&item("Fees&nbsp;rise", "https://x/1", "d"));
        assert!(parse_items(xml.as_bytes(), DEFAULT_MAX_ITEMS).is_err());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_items(b"<rss><channel><item></channel>", DEFAULT_MAX_ITEMS).is_err());
    }
}
