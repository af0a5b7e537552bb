// Time expression resolution for query bounds

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{LokiError, Result};

/// Zone-less layouts accepted after RFC 3339, tried in order and read as UTC.
/// `%.f` also matches when the fraction is absent.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a time expression against the current instant.
///
/// Accepted forms, first match wins:
/// - `now`
/// - a relative offset such as `-1h`, `-30m` or `-1h30m`
/// - an RFC 3339 timestamp
/// - `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]` or `YYYY-MM-DD`,
///   read as UTC
pub fn resolve(text: &str) -> Result<DateTime<Utc>> {
    resolve_at(text, Utc::now())
}

/// Resolve a time expression against an explicit reference instant.
pub fn resolve_at(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if text == "now" {
        return Ok(now);
    }

    if let Some(offset) = text.strip_prefix('-') {
        if let Some(instant) = parse_offset(offset).and_then(|d| now.checked_sub_signed(d)) {
            return Ok(instant);
        }
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Some(naive) = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(LokiError::InvalidTimeExpression(text.to_string()))
}

/// Parse an unsigned duration made of `<number><unit>` components.
///
/// Units are `h`, `m`, `s` and `ms`; numbers may carry a decimal fraction.
fn parse_offset(text: &str) -> Option<Duration> {
    if text.is_empty() {
        return None;
    }

    let mut total_nanos = 0f64;
    let mut rest = text;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3_600e9,
            "m" => 60e9,
            "s" => 1e9,
            "ms" => 1e6,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total_nanos += value * scale;
    }

    if !total_nanos.is_finite() || total_nanos >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::nanoseconds(total_nanos as i64))
}
