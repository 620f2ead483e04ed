//! JSON output for the published digest.
//!
//! The loader fetches this file relative to the page, so the generator writes
//! it to `data/paymentsdive-newsletter.json` next to the page by default.
//! Output is pretty-printed with two-space indentation.

use crate::models::NewsletterDigest;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "data/paymentsdive-newsletter.json";

/// Write `digest` to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_digest(digest: &NewsletterDigest, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create output directory");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!(
        articles = digest.entries().len(),
        "Wrote newsletter digest"
    );
    Ok(())
}
