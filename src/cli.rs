//! Command-line interface definitions.
//!
//! Running without a subcommand performs one newsletter load against the
//! current directory, the same as `load` with its defaults. Options may also
//! be provided through environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::feed::{DEFAULT_MAX_ITEMS, FEED_URL};
use crate::outputs::json::DEFAULT_OUTPUT;

/// Command-line arguments for the newsletter tool.
///
/// # Examples
///
/// ```sh
/// # Render the digest published next to the current directory
/// paymentsdive_newsletter
///
/// # Render a hosted page's digest
/// paymentsdive_newsletter load --base-url https://example.com/news/
///
/// # Refresh data/paymentsdive-newsletter.json from the feed
/// paymentsdive_newsletter generate
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the published digest and print the rendered page regions
    Load(LoadArgs),
    /// Build the digest from the RSS feed and write it as JSON
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// URL of the host page; the digest is resolved relative to it
    /// (defaults to the current directory)
    #[arg(short, long, env = "NEWSLETTER_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// RSS feed to read
    #[arg(short, long, env = "NEWSLETTER_FEED_URL", default_value = FEED_URL)]
    pub feed_url: String,

    /// Where to write the digest JSON
    #[arg(short, long, env = "NEWSLETTER_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of feed items considered
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
    pub max_items: usize,
}

impl Cli {
    /// The subcommand to run; no subcommand means a default load.
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Load(LoadArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_load() {
        let cli = Cli::parse_from(["paymentsdive_newsletter"]);
        assert!(matches!(cli.command(), Command::Load(_)));
    }

    #[test]
    fn test_load_base_url() {
        let cli = Cli::parse_from([
            "paymentsdive_newsletter",
            "load",
            "--base-url",
            "https://example.com/news/",
        ]);
        match cli.command() {
            Command::Load(args) => {
                assert_eq!(args.base_url.as_deref(), Some("https://example.com/news/"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_short_flags() {
        let cli = Cli::parse_from([
            "paymentsdive_newsletter",
            "generate",
            "-f",
            "https://feed.example/rss",
            "-o",
            "/tmp/out.json",
            "--max-items",
            "3",
        ]);
        match cli.command() {
            Command::Generate(args) => {
                assert_eq!(args.feed_url, "https://feed.example/rss");
                assert_eq!(args.output, PathBuf::from("/tmp/out.json"));
                assert_eq!(args.max_items, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
