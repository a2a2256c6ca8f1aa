use std::fmt;

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Weekday};

/// Hour of day (local time) at which the weekly join window closes.
const CLOSE_HOUR: u32 = 17;

/// The next Friday 17:00 in `now`'s timezone, strictly after `now`.
///
/// If this week's occurrence has already passed (or is exactly now), the
/// deadline advances a full week.
pub fn next_drop_close<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Tz> {
    let days_ahead = (Weekday::Fri.num_days_from_monday() as i64
        - now.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    let same_day = now.clone() + Duration::days(days_ahead);
    let close = same_day
        .with_hour(CLOSE_HOUR)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(same_day);
    if close <= now {
        close + Duration::weeks(1)
    } else {
        close
    }
}

/// Render the time remaining until the close: whole days + hours when a day
/// or more is left, whole hours otherwise, `"0h"` at or past the deadline.
pub fn format_time_left(left: Duration) -> String {
    if left <= Duration::zero() {
        return "0h".into();
    }
    let total_minutes = left.num_minutes();
    let days = total_minutes / (60 * 24);
    let hours = (total_minutes - days * 60 * 24) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else {
        format!("{hours}h")
    }
}

/// Render the close itself as a "join by" label, e.g. `"Fri 5:00 PM"`.
pub fn format_join_by<Tz: TimeZone>(close: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    close.format("%a %-I:%M %p").to_string()
}
