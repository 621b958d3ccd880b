//! Delivery of one subscriber's digest.

use jobflow_core::Subscriber;

use crate::builder::Digest;
use crate::mailer::Mailer;
use crate::render::DigestRenderer;
use crate::store::DigestStore;

/// What happened to one subscriber's email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Digest with this many jobs sent and receipted.
    SentWithJobs(usize),
    /// "No new jobs" email sent.
    SentEmpty,
    /// Nothing was sent, so nothing was receipted.
    Failed(String),
}

/// Renders and sends `jobs` (or the empty notice) to `subscriber`.
///
/// Receipts are written one per job and only after the provider accepted the
/// email. The empty notice writes none. Returns `None` for
/// [`Digest::NoPreferences`], which sends nothing.
pub async fn deliver<S, M>(
    store: &S,
    mailer: &M,
    renderer: &DigestRenderer,
    subscriber: &Subscriber,
    digest: &Digest,
) -> Option<DeliveryOutcome>
where
    S: DigestStore + ?Sized,
    M: Mailer + ?Sized,
{
    let jobs = match digest {
        Digest::NoPreferences => return None,
        Digest::Jobs(jobs) => jobs,
    };

    let rendered = if jobs.is_empty() {
        renderer.render_empty(&subscriber.unsubscribe_token)
    } else {
        renderer.render(jobs, &subscriber.unsubscribe_token)
    };
    let email = match rendered {
        Ok(email) => email,
        Err(e) => return Some(DeliveryOutcome::Failed(e.to_string())),
    };

    if let Err(e) = mailer
        .send(&subscriber.email, &email.subject, &email.html)
        .await
    {
        tracing::warn!(email = %subscriber.email, error = %e, "failed to send digest");
        return Some(DeliveryOutcome::Failed(e.to_string()));
    }

    if jobs.is_empty() {
        return Some(DeliveryOutcome::SentEmpty);
    }

    for job in jobs {
        store.record_delivery(subscriber.id, &job.id).await;
    }
    Some(DeliveryOutcome::SentWithJobs(jobs.len()))
}
