//! # PaymentsDive Newsletter
//!
//! Produces and renders a daily digest of PaymentsDive headlines.
//!
//! ## Features
//!
//! - Reads the PaymentsDive RSS feed and writes a cleaned JSON digest with a
//!   one-line thematic recap
//! - Loads the published digest the way the site's newsletter widget does and
//!   renders its date, recap and article list regions
//! - Any load failure renders a fixed "Unavailable" state instead of an error
//!
//! ## Usage
//!
//! ```sh
//! paymentsdive_newsletter generate -o ./site/data/paymentsdive-newsletter.json
//! paymentsdive_newsletter load --base-url file:///srv/site/
//! ```
//!
//! Logs go to stderr; `load` prints the rendered regions as HTML on stdout.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod dom;
mod feed;
mod generator;
mod loader;
mod models;
mod outputs;
mod summary;
mod utils;

use cli::{Cli, Command, GenerateArgs, LoadArgs};
use dom::Page;
use loader::{HttpTransport, NewsletterLoader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let command = Cli::parse().command();
    debug!(?command, "Parsed CLI arguments");

    match command {
        Command::Load(args) => run_load(args).await?,
        Command::Generate(args) => run_generate(args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

async fn run_load(args: LoadArgs) -> Result<(), Box<dyn Error>> {
    let base = match args.base_url {
        Some(raw) => Url::parse(&raw)?,
        None => {
            let cwd = std::env::current_dir()?;
            Url::from_directory_path(&cwd)
                .map_err(|_| format!("cannot express {} as a URL", cwd.display()))?
        }
    };
    info!(%base, "Loading newsletter");

    let mut page = Page::newsletter_host(base);
    NewsletterLoader::new(HttpTransport::new())
        .load_newsletter(&mut page)
        .await;

    print!("{}", page.to_html());
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let digest = generator::generate(&args.feed_url, &args.output, args.max_items).await?;
    println!(
        "Wrote {} with {} articles",
        args.output.display(),
        digest.entries().len()
    );
    Ok(())
}
