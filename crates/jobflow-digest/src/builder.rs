//! Per-subscriber digest selection.

use jobflow_core::{StoredJob, Subscriber};

use crate::error::DigestError;
use crate::store::DigestStore;

/// What one subscriber should receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Digest {
    /// The subscriber has no title preferences; send nothing at all.
    NoPreferences,
    /// Unsent matching jobs, newest first. May be empty.
    Jobs(Vec<StoredJob>),
}

/// Builds the digest for `subscriber`.
///
/// Takes at most `limit` of the most recent jobs matching the subscriber's
/// titles, then drops every job already in their delivery log. The limit
/// applies before the filter, so a subscriber whose newest `limit` matches
/// were all sent gets an empty digest even if older unsent matches exist.
///
/// # Errors
///
/// Returns [`DigestError::Store`] if any of the three reads fails.
pub async fn build_digest<S>(
    store: &S,
    subscriber: &Subscriber,
    limit: u32,
) -> Result<Digest, DigestError>
where
    S: DigestStore + ?Sized,
{
    let titles: Vec<String> = store
        .title_preferences(subscriber.id)
        .await?
        .into_iter()
        .collect();
    if titles.is_empty() {
        return Ok(Digest::NoPreferences);
    }

    let sent = store.sent_job_ids(subscriber.id).await?;
    let candidates = store.recent_matching_jobs(&titles, limit).await?;

    let unsent = candidates
        .into_iter()
        .filter(|job| !sent.contains(&job.id))
        .collect();

    Ok(Digest::Jobs(unsent))
}
