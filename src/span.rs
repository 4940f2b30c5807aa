//! Observation span
//!
//! Number of calendar days covered by a stream, from its earliest to its
//! latest period, both ends included. Periods that are not dates are ignored.

use crate::schema::Periodic;
use crate::types::DaySpan;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Inclusive day span of a stream; independent of record order
pub fn day_span<R: Periodic>(records: &[R]) -> DaySpan {
    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;

    for record in records {
        let Some(instant) = parse_period(record.period()) else {
            tracing::trace!(period = record.period(), "period is not a date, skipped for span");
            continue;
        };
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(instant), max.max(instant)),
            None => (instant, instant),
        });
    }

    match bounds {
        Some((min, max)) => {
            let millis = (max - min).num_milliseconds();
            // ceil for partial days
            let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
            DaySpan::Days(u32::try_from(days + 1).unwrap_or(u32::MAX))
        }
        None => DaySpan::Unavailable,
    }
}

/// Read a period label as a point in time (UTC).
///
/// Accepted: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DD` and `YYYY-MM` (first day of the month).
pub fn parse_period(period: &str) -> Option<NaiveDateTime> {
    let period = period.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(period) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(period, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(period, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
