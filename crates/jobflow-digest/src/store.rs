//! The store operations the digest needs, as a trait.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use jobflow_core::{JobId, StoredJob, Subscriber};
use jobflow_store::{StoreClient, StoreError};
use uuid::Uuid;

/// Read and receipt operations used by [`crate::run_daily_digest`].
///
/// Implemented for [`StoreClient`]; tests use an in-memory store.
#[async_trait]
pub trait DigestStore: Send + Sync {
    async fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError>;

    async fn title_preferences(&self, user_id: Uuid) -> Result<BTreeSet<String>, StoreError>;

    async fn sent_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>, StoreError>;

    /// Newest-first jobs whose `search_title` is in `titles`.
    async fn recent_matching_jobs(
        &self,
        titles: &[String],
        limit: u32,
    ) -> Result<Vec<StoredJob>, StoreError>;

    /// Best-effort receipt write.
    async fn record_delivery(&self, user_id: Uuid, job_id: &JobId);
}

#[async_trait]
impl DigestStore for StoreClient {
    async fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        self.fetch_subscribers().await
    }

    async fn title_preferences(&self, user_id: Uuid) -> Result<BTreeSet<String>, StoreError> {
        self.fetch_search_titles(Some(user_id)).await
    }

    async fn sent_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>, StoreError> {
        self.fetch_sent_job_ids(user_id).await
    }

    async fn recent_matching_jobs(
        &self,
        titles: &[String],
        limit: u32,
    ) -> Result<Vec<StoredJob>, StoreError> {
        self.fetch_recent_matching_jobs(titles, limit).await
    }

    async fn record_delivery(&self, user_id: Uuid, job_id: &JobId) {
        StoreClient::record_delivery(self, user_id, job_id).await;
    }
}
