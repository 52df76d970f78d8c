//! Outlet Pages CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use outlet_pages::{
    config::{Templates, load_all, public_dir},
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::HttpFetcher,
    storage::{LocalStorage, MappingStore},
    utils,
};

/// Outlet Pages - outlet event crawler and static site publisher
#[derive(Parser, Debug)]
#[command(
    name = "outlet-pages",
    version,
    about = "Crawls outlet events and publishes them as static pages"
)]
struct Cli {
    /// Working directory; templates and the public dir resolve against it
    #[arg(short, long, default_value = ".")]
    base: PathBuf,

    /// Path to the config file (default: {base}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every branch, publish pages and rebuild artifacts
    Crawl,

    /// Rebuild hub, sitemap, index and redirects from existing pages
    Build,

    /// Print URLs of recently published pages
    Recent {
        /// Look-back window in days
        #[arg(long, default_value_t = 7)]
        days: i64,

        /// Maximum number of URLs
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Sanity-check the generated site
    Check {
        /// Minimum number of page files expected
        #[arg(long, default_value_t = 100)]
        min_pages: usize,
    },

    /// Validate configuration and templates
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

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.base.join("config.toml"));

    let base = cli.base.clone();
    let open = || -> Result<(Config, Templates, LocalStorage)> {
        let (config, templates) = load_all(&base, &config_path)?;
        log::info!("Loaded configuration from {}", config_path.display());
        let storage = LocalStorage::new(public_dir(&base, &config));
        Ok((config, templates, storage))
    };
    let today = utils::today();

    match cli.command {
        Command::Crawl => {
            let (config, templates, storage) = open()?;
            let fetcher = Arc::new(HttpFetcher::new(&config.crawler)?);
            let report =
                pipeline::run_pipeline(&config, &templates, &storage, fetcher, today).await?;
            let published: usize = report.outcomes.iter().map(|o| o.published).sum();
            log::info!(
                "Published {published} pages across {} branches",
                report.outcomes.len()
            );
        }

        Command::Build => {
            let (config, templates, storage) = open()?;
            let mapping =
                MappingStore::load(storage.clone(), config.paths.mapping_file.clone()).await;
            pipeline::run_build(&storage, &config, &templates.index, &mapping, today).await?;
        }

        Command::Recent { days, limit } => {
            let (config, _, storage) = open()?;
            let urls = pipeline::recent_urls(&storage, &config, days, limit, Local::now()).await?;
            log::info!("{} URLs modified in the last {days} days", urls.len());
            for url in urls {
                println!("{url}");
            }
        }

        Command::Check { min_pages } => {
            let (config, _, storage) = open()?;
            let report = pipeline::run_check(&storage, &config, min_pages).await?;
            if !report.is_ok() {
                return Err(AppError::validation(report.problems.join("; ")));
            }
        }

        Command::Validate => {
            pipeline::run_validate(&cli.base, &config_path)?;
        }
    }

    log::info!("Done!");

    Ok(())
}
