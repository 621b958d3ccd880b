//! Per-source scrape inputs.
//!
//! Each supported board has its own Apify actor and its own input schema;
//! [`ScrapeSource`] selects both.

mod linkedin;
mod monster;

use jobflow_core::JobSource;
use serde_json::Value;

/// A job board this workspace can scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeSource {
    Linkedin,
    Monster,
}

impl ScrapeSource {
    /// The canonical source recorded on normalized jobs.
    #[must_use]
    pub fn job_source(self) -> JobSource {
        match self {
            Self::Linkedin => JobSource::Linkedin,
            Self::Monster => JobSource::Monster,
        }
    }

    /// Apify actor that scrapes this board.
    #[must_use]
    pub fn actor_id(self) -> &'static str {
        match self {
            Self::Linkedin => linkedin::ACTOR_ID,
            Self::Monster => monster::ACTOR_ID,
        }
    }

    /// Builds the actor input for one search title.
    #[must_use]
    pub fn build_input(self, title: &str, limit: u32, location: &str) -> Value {
        match self {
            Self::Linkedin => linkedin::build_input(title, limit, location),
            Self::Monster => monster::build_input(title, limit, location),
        }
    }
}

impl std::fmt::Display for ScrapeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.job_source().as_str())
    }
}
