//! Fixed-interval run polling.
//!
//! [`poll_until_settled`] re-reads a run's status every
//! [`PollPolicy::interval`] while it is `READY` or `RUNNING`, giving up after
//! [`PollPolicy::max_polls`] reads. There is no backoff: the interval is
//! constant. Exhausting the ceiling is reported as [`PollOutcome::Exhausted`],
//! not as an error, so the caller can skip that run and move on.

use std::time::Duration;

use crate::client::ActorRunner;
use crate::error::ScraperError;
use crate::types::{RunData, RunStatus};

/// How long and how often to poll a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of status reads after the run was started.
    pub max_polls: u32,
    /// Wait before each status read.
    pub interval: Duration,
}

impl PollPolicy {
    #[must_use]
    pub const fn new(max_polls: u32, interval: Duration) -> Self {
        Self {
            max_polls,
            interval,
        }
    }

    /// Total time spent waiting if every poll is used.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_polls)
    }
}

impl Default for PollPolicy {
    /// 60 polls, 5 seconds apart: a 300 second ceiling.
    fn default() -> Self {
        Self::new(60, Duration::from_secs(5))
    }
}

/// Result of polling one run.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The run left the in-progress set. Its status may still be a failure.
    Settled { run: RunData, polls: u32 },
    /// The ceiling was hit while the run was still in progress.
    Exhausted { last_status: RunStatus, polls: u32 },
}

/// Polls `initial` until it settles or `policy` is exhausted.
///
/// If `initial` has already settled, returns immediately without polling.
///
/// # Errors
///
/// Propagates the first error returned by [`ActorRunner::get_run`].
pub async fn poll_until_settled<R>(
    runner: &R,
    initial: RunData,
    policy: &PollPolicy,
) -> Result<PollOutcome, ScraperError>
where
    R: ActorRunner + ?Sized,
{
    let run_id = initial.id.clone();
    let mut run = initial;
    let mut polls = 0u32;

    while run.status.is_in_progress() {
        if polls >= policy.max_polls {
            return Ok(PollOutcome::Exhausted {
                last_status: run.status,
                polls,
            });
        }

        if !policy.interval.is_zero() {
            tokio::time::sleep(policy.interval).await;
        }
        polls += 1;

        run = runner.get_run(&run_id).await?;
        tracing::info!(
            run_id = %run_id,
            status = %run.status,
            waited_secs = policy.interval.saturating_mul(polls).as_secs(),
            "polled scrape run"
        );
    }

    Ok(PollOutcome::Settled { run, polls })
}
