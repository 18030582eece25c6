//! `starmine`: mines forum threads and daily site stats into two TSV files.
//!
//! # Usage
//!
//! ```text
//! starmine 96000 54            # posts 1..=96000, 54 months of stats
//! starmine 96000 54 95000      # posts 95000..=96000
//! starmine --config ./starmine.toml 96000 1
//! ```
//!
//! Diagnostics go to stderr (`RUST_LOG` adjusts the level); the data goes
//! to `<YYYYMMDD>_crawled.tsv` and `<YYYYMMDD>_api.tsv` in the configured
//! output directory.

mod crawl;
mod emit;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Local;
use clap::Parser;
use starmine_api::{HttpFetcher, day_offsets};
use starmine_core::fetch::Endpoints;
use starmine_scrape::Selectors;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{emit::TsvLog, settings::RunConfig};

const AFTER_HELP: &str = "\
Output (date matches the invocation):
  <date>_crawled.tsv : data mined from crawling over posts
  <date>_api.tsv     : data extracted from the stats API

Example: mining Biostars in March 2014:
  starmine 96000 54";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "starmine",
  version,
  about = "Mine forum threads and daily site stats into TSV files",
  after_help = AFTER_HELP
)]
struct Cli {
  /// Highest post id to mine; posts min_id..=max_id are crawled.
  max_id: u64,

  /// How many months back the stats API is queried (1 month = 30 days).
  months_look_back: u32,

  /// Lowest post id to mine.
  #[arg(default_value_t = 1)]
  min_id: u64,

  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "starmine.toml")]
  config: PathBuf,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = RunConfig::load(&cli.config)?;

  let fetcher = HttpFetcher::new(&settings.client())
    .context("failed to build HTTP client")?;
  let endpoints = Endpoints::new(&settings.base_url);
  let selectors = Selectors::biostars().context("compiling selectors")?;

  let stamp = Local::now().format("%Y%m%d").to_string();
  let crawled_path = settings.output_dir.join(format!("{stamp}_crawled.tsv"));
  let api_path = settings.output_dir.join(format!("{stamp}_api.tsv"));
  let mut crawled = TsvLog::create(&crawled_path)
    .with_context(|| format!("failed to create {}", crawled_path.display()))?;
  let mut api = TsvLog::create(&api_path)
    .with_context(|| format!("failed to create {}", api_path.display()))?;

  info!(
    min_id = cli.min_id,
    max_id = cli.max_id,
    base_url = %settings.base_url,
    "crawling threads"
  );
  let threads = crawl::crawl_threads(
    &fetcher,
    &endpoints,
    &selectors,
    cli.min_id..=cli.max_id,
    &mut crawled,
  )
  .await
  .with_context(|| format!("writing {}", crawled_path.display()))?;
  info!(
    emitted = threads.emitted,
    skipped = threads.skipped,
    records = threads.records,
    "threads done"
  );

  info!(months = cli.months_look_back, "walking daily stats");
  let history = crawl::crawl_history(
    &fetcher,
    &endpoints,
    day_offsets(cli.months_look_back),
    &mut api,
  )
  .await
  .with_context(|| format!("writing {}", api_path.display()))?;
  info!(
    written = history.written,
    skipped = history.skipped,
    "history done"
  );

  crawled.finish().context("closing thread output")?;
  api.finish().context("closing stats output")?;
  Ok(())
}
