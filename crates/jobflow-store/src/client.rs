//! HTTP client for the store's PostgREST endpoint.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Longest error body kept in [`StoreError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for the store's REST interface.
///
/// Every request carries the service key twice, as the `apikey` header and as
/// a bearer token, which is what PostgREST behind Supabase expects.
pub struct StoreClient {
    client: Client,
    rest_url: String,
    service_key: String,
}

impl StoreClient {
    /// Creates a client for the project at `store_url` (for example
    /// `https://abc.supabase.co`). Requests go to `{store_url}/rest/v1`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(store_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("jobflow/0.1 (job-ingestion)")
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", store_url.trim_end_matches('/')),
            service_key: service_key.to_owned(),
        })
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    /// Starts a request against `table` with the service credentials attached.
    pub(crate) fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Runs a `GET` against `table` with `query` and parses the JSON array body.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<Vec<T>, StoreError> {
        let response = self.request(Method::GET, table).query(query).send().await?;
        read_json(response, context).await
    }
}

/// Asserts a 2xx status and parses the body as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Api {
            status: status.as_u16(),
            context: context.to_owned(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
