//! `jobflow scrape`: fetch, normalize and save listings from one board.
//!
//! A failed title or a failed row is logged and skipped. Configuration,
//! title-lookup and run-submission failures abort with a non-zero exit.

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use jobflow_core::{dedupe_titles, AppConfig, CanonicalJob};
use jobflow_scraper::{
    normalize, ActorRunner, ApifyClient, PollPolicy, ScrapeSource, SkipReason, SourceAdapter,
    TitleResult,
};
use jobflow_store::{StoreClient, UpsertReport};

/// Counts for one ingestion run.
#[derive(Debug, Default)]
pub(crate) struct IngestSummary {
    pub(crate) titles: usize,
    pub(crate) listings: usize,
    pub(crate) skipped: Vec<(String, SkipReason)>,
    pub(crate) upsert: UpsertReport,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Titles searched: {}", self.titles)?;
        writeln!(f, "Listings found: {}", self.listings)?;
        writeln!(f, "New jobs saved: {}", self.upsert.inserted)?;
        write!(f, "Already present: {}", self.upsert.already_present)?;

        let failures = self.skipped.len() + self.upsert.failed.len();
        if failures > 0 {
            write!(f, "\nErrors: {failures}")?;
            for (title, reason) in &self.skipped {
                write!(f, "\n  - {title}: {reason}")?;
            }
            for failure in &self.upsert.failed {
                write!(f, "\n  - {}: {}", failure.external_id, failure.reason)?;
            }
        }
        Ok(())
    }
}

/// Entry point for `jobflow scrape`.
///
/// # Errors
///
/// Returns an error if the scrape token is missing, a client cannot be
/// built, stored titles cannot be read, or a run cannot be started.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    source: ScrapeSource,
    cli_titles: &[String],
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let token = config.apify_api_token()?;

    let store = StoreClient::new(
        &config.store_url,
        &config.store_service_key,
        config.request_timeout_secs,
    )
    .context("failed to build store client")?;

    let titles = resolve_titles(&store, cli_titles).await?;
    if titles.is_empty() {
        println!("No job titles to search for");
        return Ok(());
    }

    let runner = ApifyClient::new(token, config.request_timeout_secs)
        .context("failed to build scrape client")?;
    let policy = PollPolicy::new(
        config.poll_max_attempts,
        Duration::from_secs(config.poll_interval_secs),
    );
    let adapter = SourceAdapter::new(runner, source, &config.scrape_location, policy);
    let limit = limit.unwrap_or(config.default_limit_per_title);

    print_banner(&format!("{} Job Scraper", source.job_source().display_name()));
    println!("Searching for: {}", titles.join(", "));

    let summary = ingest(&adapter, &store, &titles, limit).await?;

    println!("{}", "-".repeat(50));
    println!("{summary}");
    println!("Completed at: {}", chrono::Local::now().to_rfc3339());
    Ok(())
}

/// CLI titles when given (trimmed and deduplicated), else every stored title.
async fn resolve_titles(
    store: &StoreClient,
    cli_titles: &[String],
) -> anyhow::Result<Vec<String>> {
    if !cli_titles.is_empty() {
        return Ok(dedupe_titles(cli_titles));
    }

    tracing::info!("no titles given, reading job titles from the store");
    let stored = store
        .fetch_search_titles(None)
        .await
        .context("failed to read job titles from the store")?;
    Ok(stored.into_iter().collect())
}

/// Fetches `titles` through `adapter`, normalizes every listing and upserts
/// the results.
///
/// # Errors
///
/// Returns an error only if a scrape run cannot be started.
pub(crate) async fn ingest<R: ActorRunner>(
    adapter: &SourceAdapter<R>,
    store: &StoreClient,
    titles: &[String],
    limit: u32,
) -> anyhow::Result<IngestSummary> {
    let report = adapter
        .fetch(titles, limit)
        .await
        .with_context(|| format!("failed to start {} scrape", adapter.source()))?;

    let job_source = adapter.source().job_source();
    let jobs: Vec<CanonicalJob> = report
        .listings
        .iter()
        .map(|listing| normalize(listing, &job_source))
        .collect();

    for outcome in &report.outcomes {
        if let TitleResult::Fetched { count } = outcome.result {
            println!("  {}: found {count} jobs", outcome.title);
        }
    }

    let upsert = store.upsert_jobs(&jobs).await;
    tracing::info!(
        inserted = upsert.inserted,
        already_present = upsert.already_present,
        failed = upsert.failed.len(),
        "saved jobs"
    );

    Ok(IngestSummary {
        titles: titles.len(),
        listings: jobs.len(),
        skipped: report
            .skipped()
            .map(|(title, reason)| (title.to_owned(), reason.clone()))
            .collect(),
        upsert,
    })
}

pub(crate) fn print_banner(name: &str) {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("{name}");
    println!("Started at: {}", chrono::Local::now().to_rfc3339());
    println!("{rule}");
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
