//! Normalization from raw scrape listings to [`jobflow_core::CanonicalJob`].
//!
//! Providers name the same attribute differently (`title` vs `jobTitle`,
//! `company` vs `companyName`). Each source gets a [`FieldRules`] table listing,
//! per canonical field, the raw keys to try in order. The first key holding a
//! non-null, non-blank scalar wins.
//!
//! Normalization never fails. Missing text fields become `""`, a missing
//! salary becomes `None`, and the native id falls back first to the URL's last
//! path segment and then to a content hash.

use jobflow_core::{truncate_description, CanonicalJob, JobSource};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::RawListing;

/// Ordered candidate keys for each canonical field of one source.
#[derive(Debug)]
pub struct FieldRules {
    pub id: &'static [&'static str],
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub description: &'static [&'static str],
    pub url: &'static [&'static str],
    pub salary: &'static [&'static str],
}

const LINKEDIN_RULES: FieldRules = FieldRules {
    id: &["jobId", "id"],
    title: &["title"],
    company: &["company", "companyName"],
    location: &["location"],
    description: &["description"],
    url: &["jobUrl", "url"],
    salary: &["salary"],
};

const MONSTER_RULES: FieldRules = FieldRules {
    id: &["jobId", "id"],
    title: &["jobTitle", "title"],
    company: &["companyName", "company"],
    location: &["location"],
    description: &["description"],
    url: &["jobUrl", "url"],
    salary: &["salary"],
};

const INDEED_RULES: FieldRules = FieldRules {
    id: &["id", "jobKey"],
    title: &["positionName", "title"],
    company: &["company"],
    location: &["location"],
    description: &["description"],
    url: &["url", "externalApplyLink"],
    salary: &["salary"],
};

/// Union of the known spellings, for sources without a dedicated table.
const GENERIC_RULES: FieldRules = FieldRules {
    id: &["jobId", "id", "jobKey"],
    title: &["title", "jobTitle", "positionName"],
    company: &["company", "companyName"],
    location: &["location"],
    description: &["description"],
    url: &["jobUrl", "url"],
    salary: &["salary"],
};

impl FieldRules {
    #[must_use]
    pub fn for_source(source: &JobSource) -> &'static FieldRules {
        match source {
            JobSource::Linkedin => &LINKEDIN_RULES,
            JobSource::Monster => &MONSTER_RULES,
            JobSource::Indeed => &INDEED_RULES,
            JobSource::Other(_) => &GENERIC_RULES,
        }
    }
}

/// Maps `raw` onto the canonical schema using the rules for `source`.
#[must_use]
pub fn normalize(raw: &RawListing, source: &JobSource) -> CanonicalJob {
    let rules = FieldRules::for_source(source);
    let fields = &raw.fields;
    let text = |keys: &[&str]| first_present(fields, keys).unwrap_or_default();

    let title = text(rules.title);
    let company = text(rules.company);
    let location = text(rules.location);
    let url = text(rules.url);

    let native_id = first_present(fields, rules.id)
        .or_else(|| last_path_segment(&url))
        .unwrap_or_else(|| content_fingerprint(&title, &company, &location));

    CanonicalJob {
        external_id: format!("{}_{native_id}", source.as_str()),
        source: source.clone(),
        description: truncate_description(&text(rules.description)),
        salary: first_present(fields, rules.salary),
        search_title: raw.search_title.clone(),
        title,
        company,
        location,
        url,
    }
}

/// Returns the first key in `keys` whose value is a non-blank scalar.
///
/// Strings are returned verbatim; numbers and booleans are stringified.
/// Arrays and objects are skipped.
fn first_present(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
fn last_path_segment(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_owned(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_owned)
}

/// Stable 16-hex-digit id derived from the listing's visible content.
fn content_fingerprint(title: &str, company: &str, location: &str) -> String {
    let digest = Sha256::digest(format!("{title}|{company}|{location}").as_bytes());
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
