//! Small helpers shared by the generator and the loader.
//!
//! - Feed text cleanup (tag stripping, whitespace collapsing)
//! - String truncation for log previews
//! - Output directory preparation

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

/// Strip markup tags, collapse whitespace runs to one space, and trim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("<p>Hello\n  <b>world</b></p>"), "Hello world");
/// ```
pub fn clean_text(s: &str) -> String {
    let without_tags = TAG_RE.replace_all(s, "");
    SPACE_RE.replace_all(&without_tags, " ").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings keep their first `max` bytes (rounded down to a character
/// boundary) followed by an ellipsis and the number of dropped bytes.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the parent directory of `path` if it has one.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
        debug!(parent = %parent.display(), "Output directory ready");
    }
    Ok(())
}
