mod digest;
mod scrape;

use clap::{Parser, Subcommand, ValueEnum};
use jobflow_scraper::ScrapeSource;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobflow")]
#[command(about = "JobFlow job ingestion and digest command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one job board and save the listings
    Scrape {
        /// Job board to scrape
        #[arg(value_enum)]
        source: SourceArg,
        /// Job titles to search for (defaults to every subscriber's titles)
        titles: Vec<String>,
        /// Maximum listings per title (defaults to JOBFLOW_DEFAULT_LIMIT_PER_TITLE)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Send today's digest email to every subscriber
    Digest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Linkedin,
    Monster,
}

impl From<SourceArg> for ScrapeSource {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Linkedin => Self::Linkedin,
            SourceArg::Monster => Self::Monster,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = jobflow_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Scrape {
            source,
            titles,
            limit,
        } => scrape::run_scrape(&config, source.into(), &titles, limit).await,
        Commands::Digest => digest::run_digest(&config).await,
    }
}
