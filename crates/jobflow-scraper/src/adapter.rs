//! Multi-title scrape orchestration for one source.
//!
//! Titles are processed strictly one after another. A failure to *start* a
//! run aborts the whole fetch: nothing after it can be trusted to reach the
//! runner either. Everything after the start (polling, terminal failure,
//! dataset retrieval) is scoped to that title and recorded as a
//! [`TitleOutcome`].

use serde_json::Value;

use crate::client::ActorRunner;
use crate::error::ScraperError;
use crate::poll::{poll_until_settled, PollOutcome, PollPolicy};
use crate::sources::ScrapeSource;
use crate::types::{RawListing, RunData, RunStatus};

/// Why one title produced no listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The run was still in progress when the poll ceiling was reached.
    PollTimeout { polls: u32, waited_secs: u64 },
    /// The run settled with a status other than `SUCCEEDED`.
    TerminalStatus(RunStatus),
    /// A status read failed.
    PollFailed(String),
    /// The dataset read failed.
    RetrievalFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PollTimeout { polls, waited_secs } => {
                write!(f, "run still in progress after {polls} polls ({waited_secs}s)")
            }
            Self::TerminalStatus(status) => write!(f, "run ended with status {status}"),
            Self::PollFailed(e) => write!(f, "status poll failed: {e}"),
            Self::RetrievalFailed(e) => write!(f, "result retrieval failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleResult {
    Fetched { count: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleOutcome {
    pub title: String,
    pub result: TitleResult,
}

/// Everything one [`SourceAdapter::fetch`] call produced.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Listings from every successful title, in title order.
    pub listings: Vec<RawListing>,
    pub outcomes: Vec<TitleOutcome>,
}

impl FetchReport {
    /// Titles that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            TitleResult::Skipped(reason) => Some((o.title.as_str(), reason)),
            TitleResult::Fetched { .. } => None,
        })
    }
}

/// Scrapes one [`ScrapeSource`] through an [`ActorRunner`].
pub struct SourceAdapter<R> {
    runner: R,
    source: ScrapeSource,
    location: String,
    policy: PollPolicy,
}

impl<R: ActorRunner> SourceAdapter<R> {
    #[must_use]
    pub fn new(runner: R, source: ScrapeSource, location: &str, policy: PollPolicy) -> Self {
        Self {
            runner,
            source,
            location: location.to_owned(),
            policy,
        }
    }

    #[must_use]
    pub fn source(&self) -> ScrapeSource {
        self.source
    }

    /// Runs one scrape per title and collects the raw listings.
    ///
    /// # Errors
    ///
    /// Returns the [`ScraperError`] from the first run that could not be
    /// started. Per-title poll and retrieval failures are not errors; they
    /// appear as [`TitleResult::Skipped`] in the report.
    pub async fn fetch(
        &self,
        titles: &[String],
        limit_per_title: u32,
    ) -> Result<FetchReport, ScraperError> {
        let mut report = FetchReport::default();

        for title in titles {
            tracing::info!(source = %self.source, title = %title, "starting scrape run");

            let input = self
                .source
                .build_input(title, limit_per_title, &self.location);
            let run = self.runner.start_run(self.source.actor_id(), &input).await?;
            tracing::debug!(run_id = %run.id, status = %run.status, "scrape run started");

            let result = match self.collect_run(title, run).await {
                Ok(listings) => {
                    tracing::info!(title = %title, count = listings.len(), "found jobs");
                    let count = listings.len();
                    report.listings.extend(listings);
                    TitleResult::Fetched { count }
                }
                Err(reason) => {
                    tracing::warn!(title = %title, reason = %reason, "skipping title");
                    TitleResult::Skipped(reason)
                }
            };

            report.outcomes.push(TitleOutcome {
                title: title.clone(),
                result,
            });
        }

        Ok(report)
    }

    /// Polls a started run and, if it succeeds, pulls and tags its dataset.
    async fn collect_run(&self, title: &str, run: RunData) -> Result<Vec<RawListing>, SkipReason> {
        let run_id = run.id.clone();

        let settled = match poll_until_settled(&self.runner, run, &self.policy).await {
            Ok(PollOutcome::Settled { run, .. }) => run,
            Ok(PollOutcome::Exhausted { polls, .. }) => {
                return Err(SkipReason::PollTimeout {
                    polls,
                    waited_secs: self.policy.max_wait().as_secs(),
                });
            }
            Err(e) => return Err(SkipReason::PollFailed(e.to_string())),
        };

        if !settled.status.is_success() {
            return Err(SkipReason::TerminalStatus(settled.status));
        }

        let items = self
            .runner
            .run_dataset_items(&run_id)
            .await
            .map_err(|e| SkipReason::RetrievalFailed(e.to_string()))?;

        Ok(tag_items(items, title))
    }
}

/// Keeps object items and tags each with the originating search title.
fn tag_items(items: Vec<Value>, title: &str) -> Vec<RawListing> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(RawListing::new(fields, title)),
            other => {
                tracing::warn!(title, item = %other, "skipping non-object dataset item");
                None
            }
        })
        .collect()
}
