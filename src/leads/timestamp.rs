use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a lead timestamp in any of the shapes the webhook has been seen to emit.
///
/// Offset-carrying values (RFC 3339) are converted to local time; naive values
/// are taken as local. A bare number is read as epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return local_from_naive(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return local_from_naive(date.and_hms_opt(0, 0, 0)?);
    }

    if let Ok(millis) = raw.parse::<i64>() {
        return Local.timestamp_millis_opt(millis).single();
    }

    None
}

fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    // DST gaps have no local mapping; take the earlier side of an overlap.
    Local.from_local_datetime(&naive).earliest()
}
