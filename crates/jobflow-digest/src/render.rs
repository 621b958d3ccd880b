//! Minijinja rendering of digest emails.
//!
//! Templates are compiled into the binary and registered once per
//! [`DigestRenderer`]. Their `.html` names turn on minijinja's HTML
//! auto-escaping, so every job field is escaped on output.

use jobflow_core::StoredJob;
use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::DigestError;

const LAYOUT: &str = include_str!("../templates/layout.html");
const DIGEST: &str = include_str!("../templates/digest.html");
const NO_JOBS: &str = include_str!("../templates/no_jobs.html");

/// Subject line of the "no new jobs" email.
pub const EMPTY_SUBJECT: &str = "📭 No new jobs today - JobFlow";

/// Subject line of a digest with `count` jobs.
#[must_use]
pub fn jobs_subject(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("🎯 {count} new job{plural} for you - JobFlow")
}

/// A rendered email, ready for a [`crate::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// One job as the template sees it, with display fallbacks applied.
#[derive(Debug, Serialize)]
struct JobCard<'a> {
    title: &'a str,
    url: &'a str,
    company: &'a str,
    location: &'a str,
    salary: Option<&'a str>,
    source: String,
    badge_color: &'static str,
}

impl<'a> From<&'a StoredJob> for JobCard<'a> {
    fn from(job: &'a StoredJob) -> Self {
        Self {
            title: non_blank(job.title.as_deref()).unwrap_or("Untitled position"),
            url: job.url.as_deref().unwrap_or_default(),
            company: non_blank(job.company.as_deref()).unwrap_or("Company not listed"),
            location: non_blank(job.location.as_deref()).unwrap_or("Location not specified"),
            salary: non_blank(job.salary.as_deref()),
            source: job.source.display_name(),
            badge_color: job.source.badge_color(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Renders digest and "no jobs" emails for one deployment.
pub struct DigestRenderer {
    env: Environment<'static>,
    app_url: String,
}

impl DigestRenderer {
    /// Builds a renderer whose links point at `app_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Template`] if a bundled template fails to parse.
    pub fn new(app_url: &str) -> Result<Self, DigestError> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("digest.html", DIGEST)?;
        env.add_template("no_jobs.html", NO_JOBS)?;

        Ok(Self {
            env,
            app_url: app_url.trim_end_matches('/').to_owned(),
        })
    }

    fn unsubscribe_url(&self, token: &str) -> String {
        format!("{}/unsubscribe/{token}", self.app_url)
    }

    fn manage_url(&self) -> String {
        format!("{}/dashboard", self.app_url)
    }

    /// Renders the digest for a non-empty job list.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Template`] if rendering fails.
    pub fn render(
        &self,
        jobs: &[StoredJob],
        unsubscribe_token: &str,
    ) -> Result<RenderedEmail, DigestError> {
        let cards: Vec<JobCard<'_>> = jobs.iter().map(JobCard::from).collect();
        let html = self.env.get_template("digest.html")?.render(context! {
            count => cards.len(),
            jobs => cards,
            unsubscribe_url => self.unsubscribe_url(unsubscribe_token),
            manage_url => self.manage_url(),
        })?;

        Ok(RenderedEmail {
            subject: jobs_subject(jobs.len()),
            html,
        })
    }

    /// Renders the "no new jobs today" email.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Template`] if rendering fails.
    pub fn render_empty(&self, unsubscribe_token: &str) -> Result<RenderedEmail, DigestError> {
        let html = self.env.get_template("no_jobs.html")?.render(context! {
            unsubscribe_url => self.unsubscribe_url(unsubscribe_token),
            manage_url => self.manage_url(),
        })?;

        Ok(RenderedEmail {
            subject: EMPTY_SUBJECT.to_owned(),
            html,
        })
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
