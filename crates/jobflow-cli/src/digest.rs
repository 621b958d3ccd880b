//! `jobflow digest`: email every subscriber their new matching jobs.

use anyhow::Context;
use jobflow_core::AppConfig;
use jobflow_digest::{run_daily_digest, DigestRenderer, ResendClient};
use jobflow_store::StoreClient;

use crate::scrape::print_banner;

/// Entry point for `jobflow digest`.
///
/// Per-subscriber failures are listed in the printed summary and do not
/// change the exit code.
///
/// # Errors
///
/// Returns an error if the email key is missing or a client or the bundled
/// templates cannot be built.
pub(crate) async fn run_digest(config: &AppConfig) -> anyhow::Result<()> {
    let api_key = config.resend_api_key()?;

    let store = StoreClient::new(
        &config.store_url,
        &config.store_service_key,
        config.request_timeout_secs,
    )
    .context("failed to build store client")?;
    let mailer = ResendClient::new(api_key, &config.email_from, config.request_timeout_secs)
        .context("failed to build email client")?;
    let renderer = DigestRenderer::new(&config.app_url).context("failed to load email templates")?;

    print_banner("Daily Email Sender");

    let summary = run_daily_digest(&store, &mailer, &renderer, config.digest_job_limit).await;

    println!("{}", "-".repeat(50));
    println!("{summary}");
    println!("Completed at: {}", chrono::Local::now().to_rfc3339());
    Ok(())
}
