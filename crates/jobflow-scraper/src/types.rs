//! Apify API response types and the raw listing bag handed to the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope Apify wraps every run-metadata response in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: RunStatus,
}

/// Lifecycle status of an actor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    Other(String),
}

impl RunStatus {
    /// `true` while the run has not settled: `READY` and `RUNNING`.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimingOut => "TIMING-OUT",
            Self::TimedOut => "TIMED-OUT",
            Self::Aborting => "ABORTING",
            Self::Aborted => "ABORTED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "READY" => Self::Ready,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "TIMING-OUT" => Self::TimingOut,
            "TIMED-OUT" => Self::TimedOut,
            "ABORTING" => Self::Aborting,
            "ABORTED" => Self::Aborted,
            _ => Self::Other(value),
        }
    }
}

impl From<RunStatus> for String {
    fn from(value: RunStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset item from a scrape run, tagged with the query that found it.
///
/// The field bag is source-specific and deliberately untyped; see
/// [`crate::normalize`] for how it is read.
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub fields: Map<String, Value>,
    pub search_title: String,
}

impl RawListing {
    #[must_use]
    pub fn new(fields: Map<String, Value>, search_title: impl Into<String>) -> Self {
        Self {
            fields,
            search_title: search_title.into(),
        }
    }
}
