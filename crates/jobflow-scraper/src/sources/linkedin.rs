//! LinkedIn Jobs actor input.

use serde_json::{json, Value};

pub(super) const ACTOR_ID: &str = "bebity~linkedin-jobs-scraper";

/// Requests listings published in the last 24 hours only.
pub(super) fn build_input(title: &str, limit: u32, location: &str) -> Value {
    json!({
        "searchQueries": [title],
        "limit": limit,
        "location": location,
        "publishedAt": "past24Hours",
    })
}
