use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset: a `.env` line like `RESEND_API_KEY=` must
    // not produce an empty bearer token.
    let present = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        present(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        present(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let store_url = require("SUPABASE_URL")?.trim_end_matches('/').to_string();
    let store_service_key = require("SUPABASE_SERVICE_ROLE_KEY")?;

    let apify_api_token = present("APIFY_API_TOKEN");
    let resend_api_key = present("RESEND_API_KEY");

    let app_url = or_default("JOBFLOW_APP_URL", "http://localhost:3000")
        .trim_end_matches('/')
        .to_string();
    let email_from = or_default("JOBFLOW_EMAIL_FROM", "JobFlow <no-reply@jobflow.local>");
    let log_level = or_default("JOBFLOW_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("JOBFLOW_REQUEST_TIMEOUT_SECS", "30")?;
    let poll_interval_secs = parse_u64("JOBFLOW_POLL_INTERVAL_SECS", "5")?;
    let poll_max_attempts = parse_u32("JOBFLOW_POLL_MAX_ATTEMPTS", "60")?;
    let default_limit_per_title = parse_u32("JOBFLOW_DEFAULT_LIMIT_PER_TITLE", "25")?;
    let digest_job_limit = parse_u32("JOBFLOW_DIGEST_JOB_LIMIT", "20")?;
    let scrape_location = or_default("JOBFLOW_SCRAPE_LOCATION", "United States");

    Ok(AppConfig {
        store_url,
        store_service_key,
        apify_api_token,
        resend_api_key,
        app_url,
        email_from,
        log_level,
        request_timeout_secs,
        poll_interval_secs,
        poll_max_attempts,
        default_limit_per_title,
        digest_job_limit,
        scrape_location,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
