//! Digest generation pipeline.
//!
//! 1. **Fetching**: Download the RSS feed
//! 2. **Cleaning**: Keep the first items that carry a title and link
//! 3. **Summarizing**: Derive the thematic recap line
//! 4. **Output**: Write the digest JSON the page loader reads

use crate::feed;
use crate::models::{ArticleEntry, NewsletterDigest};
use crate::outputs::json;
use crate::summary::make_summary;
use chrono::{DateTime, SecondsFormat, Utc};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Assemble a digest from cleaned articles at instant `now`.
pub fn build_digest(
    source: &str,
    articles: Vec<ArticleEntry>,
    now: DateTime<Utc>,
) -> NewsletterDigest {
    NewsletterDigest {
        source: Some(source.to_string()),
        generated_at: Some(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
        generated_date: Some(now.format("%Y-%m-%d").to_string()),
        summary: Some(make_summary(&articles)),
        articles: Some(articles),
    }
}

/// Fetch the feed, build the digest and write it to `output`.
#[instrument(level = "info", skip(output), fields(output = %output.display()))]
pub async fn generate(
    feed_url: &str,
    output: &Path,
    max_items: usize,
) -> Result<NewsletterDigest, Box<dyn Error>> {
    let articles = feed::fetch_articles(feed_url, max_items).await?;
    let digest = build_digest(feed_url, articles, Utc::now());
    json::write_digest(&digest, output).await?;
    info!(
        path = %output.display(),
        articles = digest.entries().len(),
        "Generated newsletter digest"
    );
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DATE_REGION, LIST_REGION, Page, SUMMARY_REGION};
    use crate::loader::{HttpTransport, NewsletterLoader};
    use chrono::TimeZone;
    use url::Url;

    fn sample_articles() -> Vec<ArticleEntry> {
        vec![ArticleEntry {
            title: Some("Fraud rings target P2P".to_string()),
            link: Some("https://www.paymentsdive.com/news/1".to_string()),
            description: Some("Banks respond".to_string()),
            published: Some("Tue, 06 May 2025 12:00:00 -0400".to_string()),
        }]
    }

    #[test]
    fn test_build_digest_stamps_dates() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 13, 4, 5).unwrap();
        let digest = build_digest(feed::FEED_URL, sample_articles(), now);

        assert_eq!(digest.source.as_deref(), Some(feed::FEED_URL));
        assert_eq!(digest.generated_date.as_deref(), Some("2025-05-06"));
        assert_eq!(
            digest.generated_at.as_deref(),
            Some("2025-05-06T13:04:05.000000Z")
        );
        assert_eq!(
            digest.summary.as_deref(),
            Some("Today’s PaymentsDive recap: 1 new stories, with focus on fraud/security.")
        );
        assert_eq!(digest.entries().len(), 1);
    }

    #[test]
    fn test_build_digest_without_articles() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap();
        let digest = build_digest(feed::FEED_URL, vec![], now);
        assert_eq!(digest.summary.as_deref(), Some("No new articles found today."));
        assert_eq!(digest.articles, Some(vec![]));
    }

    #[tokio::test]
    async fn test_generated_digest_loads_into_page() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 9, 0, 0).unwrap();
        let digest = build_digest(feed::FEED_URL, sample_articles(), now);
        json::write_digest(&digest, &dir.path().join(json::DEFAULT_OUTPUT))
            .await
            .unwrap();

        let mut page = Page::newsletter_host(Url::from_directory_path(dir.path()).unwrap());
        NewsletterLoader::new(HttpTransport::new())
            .load_newsletter(&mut page)
            .await;

        let text = |id: &str| page.element_by_id(id).unwrap().text_content();
        assert_eq!(text(DATE_REGION), "2025-05-06");
        assert_eq!(text(SUMMARY_REGION), digest.summary_text());
        let items = page.element_by_id(LIST_REGION).unwrap().children();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].children()[0].attribute("href"),
            Some("https://www.paymentsdive.com/news/1")
        );
    }
}
