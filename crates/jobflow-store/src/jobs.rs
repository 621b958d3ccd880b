//! Job writes and recency reads.

use jobflow_core::{CanonicalJob, StoredJob};
use reqwest::{Method, StatusCode};

use crate::client::{truncate_body, StoreClient};
use crate::error::StoreError;
use crate::filter::in_list;

/// Columns read back for digest candidates.
const JOB_COLUMNS: &str =
    "id,external_id,source,title,company,location,url,salary,search_title,scraped_at";

/// Result of writing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The store echoed the new row back.
    Inserted,
    /// `external_id` was already stored: an empty `[]` echo, or a 409.
    AlreadyPresent,
    /// Any other status, or a transport error.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFailure {
    pub external_id: String,
    pub reason: String,
}

/// Aggregate of one [`StoreClient::upsert_jobs`] batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertReport {
    pub inserted: usize,
    pub already_present: usize,
    pub failed: Vec<UpsertFailure>,
}

impl UpsertReport {
    fn record(&mut self, external_id: &str, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::AlreadyPresent => self.already_present += 1,
            UpsertOutcome::Failed(reason) => self.failed.push(UpsertFailure {
                external_id: external_id.to_owned(),
                reason,
            }),
        }
    }
}

impl StoreClient {
    /// Inserts one job unless its `external_id` is already stored.
    ///
    /// The store echoes back only the rows it actually inserted, so an empty
    /// `[]` body means the conflict target matched an existing row. Never
    /// returns an error: every failure is folded into
    /// [`UpsertOutcome::Failed`].
    pub async fn upsert_job(&self, job: &CanonicalJob) -> UpsertOutcome {
        let sent = self
            .request(Method::POST, "jobs")
            .query(&[("on_conflict", "external_id")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(job)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return UpsertOutcome::Failed(e.to_string()),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => classify_upsert(status, &body),
            Err(e) => UpsertOutcome::Failed(e.to_string()),
        }
    }

    /// Upserts `jobs` one request at a time. A failed row is logged and
    /// skipped; the batch always runs to the end.
    pub async fn upsert_jobs(&self, jobs: &[CanonicalJob]) -> UpsertReport {
        let mut report = UpsertReport::default();

        for job in jobs {
            let outcome = self.upsert_job(job).await;
            match &outcome {
                UpsertOutcome::Inserted => {
                    tracing::debug!(external_id = %job.external_id, "job saved");
                }
                UpsertOutcome::AlreadyPresent => {
                    tracing::debug!(external_id = %job.external_id, "job already present");
                }
                UpsertOutcome::Failed(reason) => {
                    tracing::warn!(
                        external_id = %job.external_id,
                        error = %reason,
                        "failed to save job"
                    );
                }
            }
            report.record(&job.external_id, outcome);
        }

        report
    }

    /// Most recently scraped jobs whose `search_title` is in `titles`, newest
    /// first, at most `limit` rows. Returns empty without a request when
    /// `titles` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_recent_matching_jobs<I, S>(
        &self,
        titles: I,
        limit: u32,
    ) -> Result<Vec<StoredJob>, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let titles: Vec<S> = titles.into_iter().collect();
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        self.select(
            "jobs",
            &[
                ("select", JOB_COLUMNS.to_owned()),
                ("search_title", in_list(&titles)),
                ("order", "scraped_at.desc".to_owned()),
                ("limit", limit.to_string()),
            ],
            "recent matching jobs",
        )
        .await
    }
}

/// Maps an upsert response onto an [`UpsertOutcome`].
///
/// A 2xx with an empty array is a skipped duplicate; 409 is a unique
/// violation from a store without the conflict target.
fn classify_upsert(status: StatusCode, body: &str) -> UpsertOutcome {
    if status == StatusCode::CONFLICT {
        return UpsertOutcome::AlreadyPresent;
    }
    if !status.is_success() {
        return UpsertOutcome::Failed(format!(
            "status {}: {}",
            status.as_u16(),
            truncate_body(body)
        ));
    }

    match serde_json::from_str::<Vec<serde_json::Value>>(body) {
        Ok(rows) if rows.is_empty() => UpsertOutcome::AlreadyPresent,
        _ => UpsertOutcome::Inserted,
    }
}
