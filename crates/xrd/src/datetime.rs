//! ISO-8601 handling for the `Expires` field.

use crate::error::{Result, XrdError};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Parses an `xs:dateTime` style timestamp.
///
/// Offsets are normalized to UTC. A timestamp without an offset is taken to be UTC.
/// Years outside `0000..=9999` are written with a sign, as in `+10000-01-01T00:00:00Z`.
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, OFFSET_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    let local = text.strip_suffix(['Z', 'z']).unwrap_or(text);
    NaiveDateTime::parse_from_str(local, LOCAL_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| XrdError::format(format!("invalid expires timestamp '{}': {}", text, e)))
}

/// Formats a timestamp as RFC 3339 in UTC, with fractional seconds only when needed.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
