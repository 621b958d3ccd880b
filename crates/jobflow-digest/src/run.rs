//! The daily digest run over every subscriber.

use std::fmt;

use crate::builder::build_digest;
use crate::mailer::Mailer;
use crate::notifier::{deliver, DeliveryOutcome};
use crate::render::DigestRenderer;
use crate::store::DigestStore;

/// One subscriber that did not get their email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub email: String,
    pub reason: String,
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.email, self.reason)
    }
}

/// Counts for one [`run_daily_digest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestSummary {
    pub subscribers: usize,
    pub sent_with_jobs: usize,
    /// Total jobs across every digest sent.
    pub jobs_sent: usize,
    pub sent_empty: usize,
    pub skipped_no_preferences: usize,
    pub errors: Vec<DeliveryFailure>,
}

impl DigestSummary {
    fn record(&mut self, email: &str, outcome: DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::SentWithJobs(n) => {
                self.sent_with_jobs += 1;
                self.jobs_sent += n;
            }
            DeliveryOutcome::SentEmpty => self.sent_empty += 1,
            DeliveryOutcome::Failed(reason) => self.fail(email, reason),
        }
    }

    fn fail(&mut self, email: &str, reason: String) {
        self.errors.push(DeliveryFailure {
            email: email.to_owned(),
            reason,
        });
    }
}

impl fmt::Display for DigestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subscribers: {}", self.subscribers)?;
        writeln!(
            f,
            "Emails sent with jobs: {} ({} jobs)",
            self.sent_with_jobs, self.jobs_sent
        )?;
        writeln!(f, "Emails sent with no jobs: {}", self.sent_empty)?;
        write!(f, "Skipped (no job titles): {}", self.skipped_no_preferences)?;
        if !self.errors.is_empty() {
            write!(f, "\nErrors: {}", self.errors.len())?;
            for err in &self.errors {
                write!(f, "\n  - {err}")?;
            }
        }
        Ok(())
    }
}

/// Builds and sends every subscribed profile's digest, one at a time.
///
/// Never fails: a subscriber-list read failure, a per-subscriber read
/// failure, and a send failure all land in [`DigestSummary::errors`].
pub async fn run_daily_digest<S, M>(
    store: &S,
    mailer: &M,
    renderer: &DigestRenderer,
    job_limit: u32,
) -> DigestSummary
where
    S: DigestStore + ?Sized,
    M: Mailer + ?Sized,
{
    let mut summary = DigestSummary::default();

    let subscribers = match store.subscribers().await {
        Ok(subscribers) => subscribers,
        Err(e) => {
            tracing::error!(error = %e, "failed to load subscribers");
            summary.fail("(subscriber list)", e.to_string());
            return summary;
        }
    };
    summary.subscribers = subscribers.len();
    tracing::info!(count = subscribers.len(), "found subscribed users");

    for subscriber in &subscribers {
        let digest = match build_digest(store, subscriber, job_limit).await {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(email = %subscriber.email, error = %e, "failed to build digest");
                summary.fail(&subscriber.email, e.to_string());
                continue;
            }
        };

        match deliver(store, mailer, renderer, subscriber, &digest).await {
            None => {
                tracing::info!(email = %subscriber.email, "no job titles configured");
                summary.skipped_no_preferences += 1;
            }
            Some(outcome) => {
                match &outcome {
                    DeliveryOutcome::SentWithJobs(n) => {
                        tracing::info!(email = %subscriber.email, jobs = n, "sent digest");
                    }
                    DeliveryOutcome::SentEmpty => {
                        tracing::info!(email = %subscriber.email, "sent 'no jobs' email");
                    }
                    DeliveryOutcome::Failed(_) => {}
                }
                summary.record(&subscriber.email, outcome);
            }
        }
    }

    summary
}
