//! One-line thematic recap for a digest.
//!
//! Themes are detected by plain substring matches over the lowercased titles
//! and descriptions of all articles, checked in a fixed order. At most the
//! first two matching themes are named.

use crate::models::ArticleEntry;

/// Recap used when the feed yielded no usable articles.
pub const EMPTY_RECAP: &str = "No new articles found today.";

const FALLBACK_THEME: &str = "payments industry updates";

const THEMES: &[(&str, &[&str])] = &[
    ("fraud/security", &["fraud", "scam", "security", "breach"]),
    ("regulation", &["regulation", "cfpb", "fed", "law", "compliance"]),
    (
        "product + fintech innovation",
        &["ai", "fintech", "wallet", "real-time", "instant"],
    ),
];

/// Themes present in the articles, in detection order.
pub fn detect_themes(articles: &[ArticleEntry]) -> Vec<&'static str> {
    let haystack = articles
        .iter()
        .map(|a| {
            format!(
                "{} {}",
                a.title.as_deref().unwrap_or_default(),
                a.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut themes: Vec<&'static str> = THEMES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(theme, _)| *theme)
        .collect();
    if themes.is_empty() {
        themes.push(FALLBACK_THEME);
    }
    themes
}

/// Build the recap line shown in the summary region.
pub fn make_summary(articles: &[ArticleEntry]) -> String {
    if articles.is_empty() {
        return EMPTY_RECAP.to_string();
    }
    let themes = detect_themes(articles);
    let focus = themes.iter().take(2).copied().collect::<Vec<_>>().join(", ");
    format!(
        "Today’s PaymentsDive recap: {} new stories, with focus on {}.",
        articles.len(),
        focus
    )
}
