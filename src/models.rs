//! Data models for the newsletter digest.
//!
//! This module defines the JSON document exchanged between the generator and
//! the loader:
//! - [`NewsletterDigest`]: One snapshot of the newsletter (date, recap, articles)
//! - [`ArticleEntry`]: A single headline record within the digest
//!
//! Every field is optional on the wire and read the way the page script reads
//! it. Labels with a default (`generated_date`, `summary`, `description`) use
//! the default for any falsy value (`null`, `false`, `0`, `""`) and show any
//! other value as its text. A falsy `articles` reads as an empty list. Only a
//! `null` digest, a `null` article entry or a truthy non-list `articles` fail
//! to parse.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label shown in the date region when the digest carries no date.
pub const DEFAULT_DATE_LABEL: &str = "Today";
/// Text shown in the summary region when the digest carries no recap.
pub const DEFAULT_SUMMARY: &str = "Latest PaymentsDive headlines.";
/// Text shown under an article that has no description.
pub const DEFAULT_DESCRIPTION: &str = "No summary available.";

/// A newsletter snapshot as published to `data/paymentsdive-newsletter.json`.
///
/// The generator fills in every field. The loader only reads
/// `generated_date`, `summary` and `articles`; `source` and `generated_at`
/// are carried for consumers that want provenance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsletterDigest {
    /// Feed URL the digest was built from.
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Generation instant in RFC 3339 (UTC, `Z` suffix).
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Human-facing date label, `YYYY-MM-DD` when produced by the generator.
    #[serde(default, deserialize_with = "truthy_text")]
    pub generated_date: Option<String>,
    /// One-line thematic recap.
    #[serde(default, deserialize_with = "truthy_text")]
    pub summary: Option<String>,
    /// Headlines in feed order.
    #[serde(default, deserialize_with = "article_list")]
    pub articles: Option<Vec<ArticleEntry>>,
}

impl NewsletterDigest {
    /// Read a digest from an already parsed JSON document.
    ///
    /// `null` is rejected. Any other non-object document has none of the
    /// digest's fields and reads as an empty digest.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Err(serde_json::Error::custom("digest is null")),
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    /// Text for the date region, falling back to [`DEFAULT_DATE_LABEL`].
    pub fn date_label(&self) -> &str {
        non_empty(&self.generated_date).unwrap_or(DEFAULT_DATE_LABEL)
    }

    /// Text for the summary region, falling back to [`DEFAULT_SUMMARY`].
    pub fn summary_text(&self) -> &str {
        non_empty(&self.summary).unwrap_or(DEFAULT_SUMMARY)
    }

    /// Articles in input order; an absent list reads as empty.
    pub fn entries(&self) -> &[ArticleEntry] {
        self.articles.as_deref().unwrap_or_default()
    }
}

/// One headline in the digest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleEntry {
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    /// Link target; `null` or missing leaves the anchor without an `href`.
    #[serde(default, deserialize_with = "text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "truthy_text")]
    pub description: Option<String>,
    /// Publication date as the feed states it (RFC 822 for RSS).
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl ArticleEntry {
    /// The title as text; a missing or `null` title renders as empty text.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Description text, falling back to [`DEFAULT_DESCRIPTION`].
    pub fn description_text(&self) -> &str {
        non_empty(&self.description).unwrap_or(DEFAULT_DESCRIPTION)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// `false`, `0`, `""` and `null` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String conversion as a page script would display the value.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Any value as text; `null` reads as absent.
fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok((!value.is_null()).then(|| display_text(&value)))
}

/// Truthy values as text; falsy ones read as absent.
fn truthy_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(is_truthy(&value).then(|| display_text(&value)))
}

/// A falsy list reads as absent. A `null` entry or a truthy non-list is an
/// error; entries that are not objects carry no fields.
fn article_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<ArticleEntry>>, D::Error> {
    let value = Value::deserialize(d)?;
    if !is_truthy(&value) {
        return Ok(None);
    }
    let Value::Array(items) = value else {
        return Err(D::Error::custom("articles is not a list"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Null => Err(D::Error::custom("article entry is null")),
            Value::Object(_) => serde_json::from_value(item).map_err(D::Error::custom),
            _ => Ok(ArticleEntry::default()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
