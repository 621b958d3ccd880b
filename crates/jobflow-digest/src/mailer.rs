//! Email delivery through the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::MailError;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Longest error body kept in [`MailError::Rejected`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Sends one HTML email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Resend client. A send succeeds only on HTTP 200.
pub struct ResendClient {
    client: Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl ResendClient {
    /// Creates a client pointed at the production Resend API.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, from: &str, timeout_secs: u64) -> Result<Self, MailError> {
        Self::with_base_url(api_key, from, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        from: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("jobflow/0.1 (job-ingestion)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            from: from.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl Mailer for ResendClient {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let body = SendEmailRequest {
            from: &self.from,
            to,
            subject,
            html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }
}
