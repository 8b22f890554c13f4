//! edcrawler CLI
//!
//! Scrapes education data portal pages and aggregates the output into
//! crawl statistics.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use edcrawler::{
    error::Result,
    models::Config,
    pipeline::{self, Statistics},
    storage::LocalStorage,
};

/// edcrawler - Education Data Portal Crawler
#[derive(Parser, Debug)]
#[command(
    name = "edcrawler",
    version,
    about = "Education data portal crawler and statistics"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output root (overrides paths.output_dir)
    #[arg(short, long, env = "ED_OUTPUT_PATH", global = true)]
    output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch pages and store the datasets found on them
    Scrape {
        /// Scraper name; output goes to {output}/scrapers/{name}/
        #[arg(short, long)]
        scraper: String,

        /// File with one page URL per line
        #[arg(short, long)]
        urls: PathBuf,
    },

    /// Classify a saved HTML page and print the extracted dataset
    Parse {
        /// HTML file to parse
        file: PathBuf,

        /// URL the page was fetched from (used to resolve relative links)
        #[arg(long)]
        url: String,
    },

    /// Aggregate scraper output into statistics
    Stats {
        /// Keep grouping order instead of sorting by count
        #[arg(long)]
        unordered: bool,

        /// Delete the existing workbook before writing
        #[arg(long)]
        reset: bool,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(output) = cli.output {
        config.paths.output_dir = output;
    }
    log::debug!("Output root: {}", config.paths.output_dir);

    match cli.command {
        Command::Scrape { scraper, urls } => {
            let urls = pipeline::load_urls(&urls)?;
            let storage = LocalStorage::new(&config.paths.output_dir);
            let outcome = pipeline::run_scraper(&config, &storage, &scraper, &urls).await?;

            if outcome.datasets.is_empty() {
                log::warn!("No datasets found on {} pages", outcome.page_total);
            }
        }

        Command::Parse { file, url } => match pipeline::run_parse(&config, &file, &url)? {
            Some(dataset) => println!("{}", serde_json::to_string_pretty(&dataset)?),
            None => log::info!("No resources found on {} (or unknown layout)", url),
        },

        Command::Stats { unordered, reset } => {
            let stats = Statistics::from_config(&config);
            if reset {
                stats.workbook().reset()?;
            }

            let ordered = config.stats.ordered && !unordered;
            let report = stats.generate(&config, ordered)?;
            pipeline::log_report(&report);

            log::info!("Statistics written to {}", stats.workbook().path().display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            if let Err(e) = pipeline::build_dispatcher(&config) {
                log::error!("Resource rules are invalid: {}", e);
                return Err(e);
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
