//! PostgREST filter values.

/// Builds an `in.(...)` filter value matching any of `values`.
///
/// Each value is double-quoted so commas and parentheses inside titles are
/// literal; embedded `"` and `\` are backslash-escaped.
#[must_use]
pub fn in_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let quoted: Vec<String> = values
        .into_iter()
        .map(|v| {
            let escaped = v.as_ref().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        })
        .collect();
    format!("in.({})", quoted.join(","))
}

/// Builds an `eq.` filter value.
#[must_use]
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}
