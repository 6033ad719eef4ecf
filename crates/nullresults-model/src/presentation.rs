//! Presentation helpers shared by the list and detail views.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Splits a raw `tags` value into chips: comma-separated, trimmed, empty
/// segments dropped, order preserved.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Author name for display. Absent, null, or blank-after-trim collapses to
/// "Anonymous".
#[must_use]
pub fn display_author(author_name: Option<&str>) -> String {
    match author_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Anonymous".to_string(),
    }
}

/// Formats a stored timestamp for display as e.g. `Dec 08, 2025`.
///
/// The store writes `YYYY-MM-DD HH:MM:SS` with no zone designator; such
/// values are treated as UTC. RFC 3339 inputs are accepted as-is. An
/// unparseable string is returned unchanged rather than failing the view.
#[must_use]
pub fn format_created_at(raw: &str) -> String {
    let parsed = if raw.contains('T') {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                // T-form without a zone designator, e.g. "2025-12-08T06:18:48".
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                    .map(|naive| naive.and_utc())
                    .ok()
            })
    } else {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .map(|naive| naive.and_utc())
            .ok()
    };
    match parsed {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => raw.to_string(),
    }
}
