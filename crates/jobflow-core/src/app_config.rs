use crate::ConfigError;

/// Process-wide configuration, built once at startup by
/// [`crate::load_app_config`] and handed to every component constructor.
#[derive(Clone)]
pub struct AppConfig {
    /// Store base URL without the `/rest/v1` suffix, e.g. `https://xyz.supabase.co`.
    pub store_url: String,
    pub store_service_key: String,
    pub apify_api_token: Option<String>,
    pub resend_api_key: Option<String>,
    /// Public application URL used for unsubscribe and dashboard links.
    pub app_url: String,
    pub email_from: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
    pub default_limit_per_title: u32,
    pub digest_job_limit: u32,
    /// Geographic filter passed to every scrape run.
    pub scrape_location: String,
}

impl AppConfig {
    /// Returns the scrape runner token, required only by `scrape`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `APIFY_API_TOKEN` is unset.
    pub fn apify_api_token(&self) -> Result<&str, ConfigError> {
        self.apify_api_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("APIFY_API_TOKEN".to_string()))
    }

    /// Returns the email provider key, required only by `digest`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `RESEND_API_KEY` is unset.
    pub fn resend_api_key(&self) -> Result<&str, ConfigError> {
        self.resend_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("RESEND_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_url", &self.store_url)
            .field("store_service_key", &"[redacted]")
            .field(
                "apify_api_token",
                &self.apify_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("app_url", &self.app_url)
            .field("email_from", &self.email_from)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("default_limit_per_title", &self.default_limit_per_title)
            .field("digest_job_limit", &self.digest_job_limit)
            .field("scrape_location", &self.scrape_location)
            .finish()
    }
}
