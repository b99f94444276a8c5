//! Anime Harvester
//!
//! Main entry point: crawls every listing page and writes one JSON record
//! per line to the output file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anime_harvester::config::Config;
use anime_harvester::crawler::Crawler;
use anime_harvester::error::AppResult;
use anime_harvester::scraper::{Scraper, ScraperConfig};
use anime_harvester::sink::{drain, JsonLinesWriter};

/// Harvest anime metadata from the anime-planet listing
#[derive(Debug, Parser)]
#[command(name = "anime-harvester", version)]
struct Cli {
    /// Listing page to start from (overrides BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Output file, one JSON record per line (overrides OUTPUT_PATH)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

async fn run(cli: Cli) -> AppResult<usize> {
    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let scraper = Scraper::with_config(ScraperConfig::from(&config))?;
    let crawler = Crawler::new(scraper, config.base_url.clone());
    let mut writer = JsonLinesWriter::create(&config.output_path).await?;

    info!(
        base_url = %config.base_url,
        output = %config.output_path.display(),
        "Starting harvest"
    );
    drain(crawler.run(), &mut writer).await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(count) => {
            info!(records = count, "Harvest finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Harvest aborted: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
