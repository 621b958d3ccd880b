//! Subscriber-side reads and delivery receipts.

use std::collections::{BTreeSet, HashSet};

use jobflow_core::{EmailLog, JobId, Subscriber};
use reqwest::Method;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::{truncate_body, StoreClient};
use crate::error::StoreError;
use crate::filter::eq;

#[derive(Deserialize)]
struct TitleRow {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct SentRow {
    job_id: JobId,
}

impl StoreClient {
    /// Distinct, trimmed, non-blank search titles.
    ///
    /// With `user_id`, only that subscriber's preferences; otherwise every
    /// subscriber's.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_search_titles(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<BTreeSet<String>, StoreError> {
        let mut query = vec![("select", "title".to_owned())];
        if let Some(id) = user_id {
            query.push(("user_id", eq(id)));
        }

        let rows: Vec<TitleRow> = self.select("job_titles", &query, "job titles").await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.title)
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// Every profile with `is_subscribed = true`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        let rows: Vec<Subscriber> = self
            .select(
                "profiles",
                &[
                    ("is_subscribed", eq(true)),
                    ("select", "id,email,unsubscribe_token,is_subscribed".to_owned()),
                ],
                "subscribers",
            )
            .await?;

        Ok(rows.into_iter().filter(|s| s.is_subscribed).collect())
    }

    /// Ids of every job already emailed to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_sent_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>, StoreError> {
        let rows: Vec<SentRow> = self
            .select(
                "email_logs",
                &[
                    ("user_id", eq(user_id)),
                    ("select", "job_id".to_owned()),
                ],
                "email logs",
            )
            .await?;

        Ok(rows.into_iter().map(|row| row.job_id).collect())
    }

    /// Records that `job_id` was emailed to `user_id`.
    ///
    /// Failures are logged and dropped: a missing receipt costs at most one
    /// repeated job in a later digest.
    pub async fn record_delivery(&self, user_id: Uuid, job_id: &JobId) {
        let log = EmailLog {
            user_id,
            job_id: job_id.clone(),
        };

        let sent = self
            .request(Method::POST, "email_logs")
            .header("Prefer", "return=minimal")
            .json(&log)
            .send()
            .await;

        match sent {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(
                    user_id = %user_id,
                    job_id = %job_id,
                    status,
                    body = %truncate_body(&body),
                    "failed to record delivery"
                );
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    job_id = %job_id,
                    error = %e,
                    "failed to record delivery"
                );
            }
        }
    }
}
