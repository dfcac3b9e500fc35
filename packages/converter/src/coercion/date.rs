//! `date` matcher, backed by chrono.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::config::DEFAULT_DATE_FORMATS;
use crate::value::Value;

/// Parse `raw` with `format`, or with RFC 3339 and the built-in formats
/// when none is configured. Values without an offset are taken as UTC.
pub(crate) fn date(raw: &str, format: Option<&str>) -> Option<Value> {
    let parsed = match format {
        Some(format) => parse_with(raw, format),
        None => DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
            DEFAULT_DATE_FORMATS
                .iter()
                .find_map(|format| parse_with(raw, format))
        }),
    };
    parsed.map(Value::Date)
}

fn parse_with(raw: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_str(raw, format) {
        return Some(dt);
    }
    let naive = NaiveDateTime::parse_from_str(raw, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}
