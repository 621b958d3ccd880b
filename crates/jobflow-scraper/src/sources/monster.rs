//! Monster actor input. The actor takes search-page URLs rather than query
//! fields, so title and location are encoded into a Monster search URL.

use serde_json::{json, Value};
use url::form_urlencoded;

pub(super) const ACTOR_ID: &str = "memo23~monster-scraper";

const SEARCH_PAGE: &str = "https://www.monster.com/jobs/search";

pub(super) fn build_input(title: &str, limit: u32, location: &str) -> Value {
    json!({
        "startUrls": [search_url(title, location)],
        "maxItems": limit,
    })
}

/// `so=m.h.sh` sorts by most recent.
fn search_url(title: &str, location: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", title)
        .append_pair("where", location)
        .append_pair("so", "m.h.sh")
        .finish();
    format!("{SEARCH_PAGE}?{query}")
}
