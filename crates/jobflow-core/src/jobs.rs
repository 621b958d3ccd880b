use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on stored description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Job board a listing was scraped from.
///
/// Serialized as the lowercase source name. Values the store holds that this
/// build does not know about round-trip through [`JobSource::Other`] so reads
/// never fail on a newly added source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobSource {
    Linkedin,
    Indeed,
    Monster,
    Other(String),
}

impl JobSource {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Indeed => "indeed",
            Self::Monster => "monster",
            Self::Other(name) => name,
        }
    }

    /// Human-facing name for badges and log lines.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Linkedin => "LinkedIn".to_string(),
            Self::Indeed => "Indeed".to_string(),
            Self::Monster => "Monster".to_string(),
            Self::Other(name) => {
                let mut chars = name.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            }
        }
    }

    /// Badge background colour used in digest emails.
    #[must_use]
    pub fn badge_color(&self) -> &'static str {
        match self {
            Self::Linkedin => "#0077b5",
            Self::Indeed => "#2557a7",
            Self::Monster | Self::Other(_) => "#6d28d9",
        }
    }
}

impl From<String> for JobSource {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "linkedin" => Self::Linkedin,
            "indeed" => Self::Indeed,
            "monster" => Self::Monster,
            _ => Self::Other(value),
        }
    }
}

impl From<JobSource> for String {
    fn from(value: JobSource) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job listing in the shared schema every source is normalized into.
///
/// `external_id` (`"<source>_<native-id>"`) is the store's conflict key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalJob {
    pub external_id: String,
    pub source: JobSource,
    pub title: String,
    pub company: String,
    pub location: String,
    /// At most [`DESCRIPTION_MAX_CHARS`] characters.
    pub description: String,
    pub url: String,
    pub salary: Option<String>,
    /// The search query that surfaced this listing.
    pub search_title: String,
}

/// Store-assigned job identifier.
///
/// The store may hand back either a UUID string or an integer key depending
/// on how the `jobs` table was created; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
        })
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job row as read back from the store.
///
/// Columns the store allows to be null are modelled as `Option` so a sparse
/// row never fails the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredJob {
    pub id: JobId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub source: JobSource,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub search_title: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Truncates `description` to at most [`DESCRIPTION_MAX_CHARS`] characters.
///
/// Cuts on a `char` boundary so multi-byte text never panics or splits.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(DESCRIPTION_MAX_CHARS) {
        Some((byte_idx, _)) => description[..byte_idx].to_string(),
        None => description.to_string(),
    }
}
