//! Newsletter loader: fetch the published digest and render it into the page.
//!
//! One invocation issues exactly one GET for
//! `./data/paymentsdive-newsletter.json?ts=<epoch millis>` relative to the
//! page, parses the body, and then synchronizes the three host regions:
//!
//! | Region | Populated | Unavailable |
//! |--------|-----------|-------------|
//! | `newsletterDate` | `generated_date` or "Today" | "Unavailable" |
//! | `newsletterSummary` | `summary` or default recap | fixed apology |
//! | `newsletterList` | one `<li>` per article | empty |
//!
//! Every failure (transport, non-2xx status, unparsable body) collapses into
//! the same unavailable rendering and never escapes [`NewsletterLoader::load_newsletter`].
//! The digest is fully parsed before any region is touched, so a page never
//! shows half of one state and half of the other.

use crate::dom::{DATE_REGION, Element, LIST_REGION, Page, SUMMARY_REGION};
use crate::models::NewsletterDigest;
use crate::utils::truncate_for_log;
use chrono::Utc;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Location of the published digest, relative to the host page.
pub const DIGEST_PATH: &str = "./data/paymentsdive-newsletter.json";

/// Date label shown when the digest cannot be loaded.
pub const UNAVAILABLE_DATE_LABEL: &str = "Unavailable";
/// Summary text shown when the digest cannot be loaded.
pub const UNAVAILABLE_SUMMARY: &str = "Could not load today’s recap.";

/// Why a digest could not be loaded.
///
/// The variants exist for log messages only; the page shows the same
/// unavailable state for all of them.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("invalid digest URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("digest request returned HTTP {0}")]
    Status(u16),

    #[error("digest body is not a valid newsletter: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw result of a GET: status code and body bytes.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Same test browsers apply for `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can GET a URL.
pub trait Transport {
    async fn get(&self, url: &Url) -> Result<FetchedResource, DigestError>;
}

/// [`Transport`] backed by `reqwest` for `http(s)` and the filesystem for `file` URLs.
///
/// No timeout is configured; the platform defaults apply.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &Url) -> Result<FetchedResource, DigestError> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| DigestError::Transport(format!("not a local path: {url}")))?;
            let body = tokio::fs::read(&path)
                .await
                .map_err(|e| DigestError::Transport(format!("{}: {e}", path.display())))?;
            return Ok(FetchedResource { status: 200, body });
        }

        let res = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DigestError::Transport(e.to_string()))?;
        let status = res.status().as_u16();
        let body = res
            .bytes()
            .await
            .map_err(|e| DigestError::Transport(e.to_string()))?
            .to_vec();
        debug!(status, bytes = body.len(), "Fetched digest resource");
        Ok(FetchedResource { status, body })
    }
}

/// Resolve the digest location against `base` and stamp it with `ts`.
///
/// The timestamp defeats intermediary caches so each load sees the latest
/// published digest.
pub fn digest_url(base: &Url, ts_millis: i64) -> Result<Url, DigestError> {
    let mut url = base.join(DIGEST_PATH)?;
    url.query_pairs_mut()
        .clear()
        .append_pair("ts", &ts_millis.to_string());
    Ok(url)
}

/// Renders the newsletter digest into a [`Page`].
pub struct NewsletterLoader<T> {
    transport: T,
}

impl<T> fmt::Debug for NewsletterLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsletterLoader").finish_non_exhaustive()
    }
}

impl<T: Transport> NewsletterLoader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch and parse the digest for a page rooted at `base`.
    ///
    /// This is the only suspension point of a load; the page is not borrowed
    /// while it runs.
    #[instrument(level = "info", skip_all, fields(base = %base))]
    pub async fn fetch_digest(&self, base: &Url) -> Result<NewsletterDigest, DigestError> {
        let url = digest_url(base, Utc::now().timestamp_millis())?;
        let res = self.transport.get(&url).await?;
        if !res.is_success() {
            return Err(DigestError::Status(res.status));
        }
        serde_json::from_slice(&res.body)
            .and_then(NewsletterDigest::from_json)
            .map_err(|e| {
                debug!(
                    body_preview = %truncate_for_log(&String::from_utf8_lossy(&res.body), 200),
                    "Digest body rejected"
                );
                DigestError::Parse(e)
            })
    }

    /// Fetch the digest and render it, or the unavailable state, into `page`.
    ///
    /// Always completes; errors are logged and rendered, never returned.
    #[instrument(level = "info", skip_all)]
    pub async fn load_newsletter(&self, page: &mut Page) {
        let base = page.base_url().clone();
        match self.fetch_digest(&base).await {
            Ok(digest) => {
                render_digest(page, &digest);
                info!(articles = digest.entries().len(), "Rendered newsletter digest");
            }
            Err(e) => {
                warn!(error = %e, "Newsletter digest unavailable");
                render_unavailable(page);
            }
        }
    }
}

/// Populate the three regions from a parsed digest.
pub fn render_digest(page: &mut Page, digest: &NewsletterDigest) {
    set_region_text(page, DATE_REGION, digest.date_label());
    set_region_text(page, SUMMARY_REGION, digest.summary_text());

    let Some(list) = region(page, LIST_REGION) else {
        return;
    };
    list.clear();
    for entry in digest.entries() {
        let mut link = Element::new("a");
        if let Some(href) = entry.link.as_deref() {
            link.set_attribute("href", href);
        }
        link.set_attribute("target", "_blank");
        link.set_attribute("rel", "noopener noreferrer");
        link.set_text_content(entry.title_text());

        let summary = Element::new("p")
            .with_attribute("class", "article-summary")
            .with_text(entry.description_text());

        list.append_child(Element::new("li").with_child(link).with_child(summary));
    }
}

/// Put the three regions into the fixed unavailable state.
pub fn render_unavailable(page: &mut Page) {
    set_region_text(page, DATE_REGION, UNAVAILABLE_DATE_LABEL);
    set_region_text(page, SUMMARY_REGION, UNAVAILABLE_SUMMARY);
    if let Some(list) = region(page, LIST_REGION) {
        list.clear();
    }
}

fn set_region_text(page: &mut Page, id: &str, text: &str) {
    if let Some(el) = region(page, id) {
        el.set_text_content(text);
    }
}

fn region<'a>(page: &'a mut Page, id: &str) -> Option<&'a mut Element> {
    let el = page.element_by_id_mut(id);
    if el.is_none() {
        warn!(id, "Host page has no such region; skipping");
    }
    el
}
