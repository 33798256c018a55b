//! Scalar value parsing and formatting shared by all formats.
//!
//! Parsers are tolerant: they return `None` for unparsable input and log the
//! rejected value at `trace` level. Callers leave the field at its default.

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Timelike, Utc};
use url::Url;

use crate::error::{Result, SyndicationError};

/// Format used for RFC-822 output. Always GMT.
const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Years both date formats write with four digits.
const WRITABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Naive timestamp layouts accepted for RFC-3339 fields without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Trim a string, mapping empty input to `None`.
///
/// # Examples
/// ```
/// use syndication_xml::values::normalize;
///
/// assert_eq!(normalize("  news  "), Some("news".to_string()));
/// assert_eq!(normalize("   "), None);
/// ```
#[must_use]
pub fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a boolean written as `true` or `false` (any case).
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        tracing::trace!(value, "Unparsable boolean, skipping");
        None
    }
}

/// Format a boolean the way every format writes it.
#[must_use]
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse a signed 32-bit integer.
#[must_use]
pub fn parse_i32(value: &str) -> Option<i32> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::trace!(value, "Unparsable integer, skipping");
    }
    parsed
}

/// Parse an unsigned 64-bit integer.
#[must_use]
pub fn parse_u64(value: &str) -> Option<u64> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::trace!(value, "Unparsable unsigned integer, skipping");
    }
    parsed
}

/// Parse an absolute URL.
#[must_use]
pub fn parse_url(value: &str) -> Option<Url> {
    match Url::parse(value.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!(value, error = %e, "Unparsable URL, skipping");
            None
        }
    }
}

/// Split a comma-delimited list, trimming fragments and dropping empty ones.
///
/// # Examples
/// ```
/// use syndication_xml::values::split_list;
///
/// assert_eq!(split_list(" a, ,b,c "), vec!["a", "b", "c"]);
/// ```
#[must_use]
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Parse every fragment of a comma-delimited list, skipping unparsable ones.
pub fn parse_list<T>(value: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    split_list(value).into_iter().filter_map(parse).collect()
}

/// Join values into a comma-delimited list.
#[must_use]
pub fn join_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Drop sub-second precision so a value survives a textual round trip.
#[must_use]
pub fn truncate_to_seconds(value: DateTime<Utc>) -> DateTime<Utc> {
    value.with_nanosecond(0).unwrap_or(value)
}

/// Validate a date for a setter and truncate it to whole seconds.
///
/// # Errors
/// Returns `InvalidArgument` when the year cannot be written as four digits.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use syndication_xml::values::checked_date;
///
/// let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
/// assert!(checked_date("created", Some(far)).is_err());
/// assert_eq!(checked_date("created", None).unwrap(), None);
/// ```
pub fn checked_date(name: &'static str, value: Option<DateTime<Utc>>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|date| {
            if WRITABLE_YEARS.contains(&date.year()) {
                Ok(truncate_to_seconds(date))
            } else {
                Err(SyndicationError::InvalidArgument {
                    name,
                    reason: format!("year {} is outside {}-{}", date.year(), WRITABLE_YEARS.start(), WRITABLE_YEARS.end()),
                })
            }
        })
        .transpose()
}

/// Parse an RFC-822 date, accepting RFC-3339 as a fallback.
///
/// # Examples
/// ```
/// use syndication_xml::values::parse_rfc822;
///
/// let date = parse_rfc822("Mon, 15 Jan 2024 08:30:00 GMT").unwrap();
/// assert_eq!(date.to_rfc3339(), "2024-01-15T08:30:00+00:00");
/// ```
#[must_use]
pub fn parse_rfc822(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let parsed = DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|date| date.with_timezone(&Utc))
        .ok();
    if parsed.is_none() {
        tracing::trace!(value, "Unparsable RFC-822 date, skipping");
    }
    parsed
}

/// Format a date as RFC-822 in GMT.
#[must_use]
pub fn format_rfc822(value: &DateTime<Utc>) -> String {
    value.format(RFC822_FORMAT).to_string()
}

/// Parse an RFC-3339 date.
///
/// Timestamps without an offset are read as UTC; RFC-822 is accepted as a
/// fallback.
#[must_use]
pub fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    if let Some(naive) = naive {
        return Some(naive.and_utc());
    }
    let parsed = DateTime::parse_from_rfc2822(value)
        .map(|date| date.with_timezone(&Utc))
        .ok();
    if parsed.is_none() {
        tracing::trace!(value, "Unparsable RFC-3339 date, skipping");
    }
    parsed
}

/// Format a date as RFC-3339 with second precision and a `Z` suffix.
#[must_use]
pub fn format_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
