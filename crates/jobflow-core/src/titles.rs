//! Search-title hygiene for titles supplied on the command line.

use std::collections::HashSet;

/// Trims every title, drops blanks, and removes duplicates while keeping the
/// first occurrence of each.
#[must_use]
pub fn dedupe_titles<I, S>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
