//! HTTP client for the Apify actor-run API.
//!
//! Wraps `reqwest` with bearer-token auth, the `{"data": ...}` response
//! envelope, and typed errors. The [`ActorRunner`] trait is the seam the
//! [`crate::SourceAdapter`] is written against, so the adapter can be driven
//! by an in-memory runner in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{ApiResponse, RunData};

const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Longest error body kept in [`ScraperError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// The three operations of an asynchronous scrape runner.
#[async_trait]
pub trait ActorRunner: Send + Sync {
    /// Starts a run of `actor_id` with `input` and returns its initial metadata.
    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<RunData, ScraperError>;

    /// Fetches the current metadata (including status) of a run.
    async fn get_run(&self, run_id: &str) -> Result<RunData, ScraperError>;

    /// Fetches every item of the run's default dataset in one request.
    async fn run_dataset_items(&self, run_id: &str) -> Result<Vec<Value>, ScraperError>;
}

/// Client for the Apify REST API.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    /// Creates a client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("jobflow/0.1 (job-ingestion)")
            .build()?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Asserts a 2xx status and parses the body as `T`.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ScraperError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::Api {
                status: status.as_u16(),
                context: context.to_owned(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[async_trait]
impl ActorRunner for ApifyClient {
    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<RunData, ScraperError> {
        let url = self.endpoint(&format!("acts/{actor_id}/runs"));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let envelope: ApiResponse<RunData> =
            Self::read_json(response, &format!("start run of {actor_id}")).await?;
        Ok(envelope.data)
    }

    async fn get_run(&self, run_id: &str) -> Result<RunData, ScraperError> {
        let url = self.endpoint(&format!("actor-runs/{run_id}"));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let envelope: ApiResponse<RunData> =
            Self::read_json(response, &format!("status of run {run_id}")).await?;
        Ok(envelope.data)
    }

    async fn run_dataset_items(&self, run_id: &str) -> Result<Vec<Value>, ScraperError> {
        let url = self.endpoint(&format!("actor-runs/{run_id}/dataset/items"));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("format", "json")])
            .send()
            .await?;

        Self::read_json(response, &format!("dataset of run {run_id}")).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
