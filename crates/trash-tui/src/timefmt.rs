//! Deletion-time formatting for rows and the detail surface.
//!
//! Both formatters are total: a missing or malformed timestamp degrades to a
//! fixed string, never a panic.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a deletion timestamp.
///
/// RFC 3339 offsets are honoured. Offset-less values (the `.trashinfo` form)
/// are read as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return local_to_utc(naive);
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    local_to_utc(date.and_hms_opt(0, 0, 0)?)
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// "just now", "3 minutes ago", "yesterday", … relative to `now`.
/// Returns an empty string when the timestamp can't be read.
pub fn format_relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return String::new();
    };
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = secs / 60;
    if mins < 60 {
        return ago(mins, "minute");
    }
    let hours = mins / 60;
    if hours < 24 {
        return ago(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return if days == 1 {
            "yesterday".to_string()
        } else {
            format!("{} days ago", days)
        };
    }
    let weeks = days / 7;
    if weeks < 4 {
        return ago(weeks, "week");
    }
    // 28-29 days and 360-364 days fall between buckets; clamp to 1.
    let months = days / 30;
    if months < 12 {
        return ago(months.max(1), "month");
    }
    ago((days / 365).max(1), "year")
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Absolute local date for hover/detail text.
pub fn format_absolute(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "Unknown date".to_string();
    }
    match parse_timestamp(raw) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn before(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    #[test]
    fn test_buckets() {
        let cases = [
            (Duration::seconds(0), "just now"),
            (Duration::seconds(59), "just now"),
            (Duration::seconds(90), "1 minute ago"),
            (Duration::minutes(59), "59 minutes ago"),
            (Duration::seconds(3600), "1 hour ago"),
            (Duration::hours(5), "5 hours ago"),
            (Duration::seconds(86_400), "yesterday"),
            (Duration::days(3), "3 days ago"),
            (Duration::days(8), "1 week ago"),
            (Duration::days(21), "3 weeks ago"),
            (Duration::days(45), "1 month ago"),
            (Duration::days(200), "6 months ago"),
            (Duration::days(400), "1 year ago"),
            (Duration::days(1100), "3 years ago"),
        ];
        for (delta, expected) in cases {
            assert_eq!(
                format_relative_time(&before(delta), now()),
                expected,
                "delta {:?}",
                delta
            );
        }
    }

    #[test]
    fn test_bucket_gaps_clamp_to_one() {
        assert_eq!(
            format_relative_time(&before(Duration::days(28)), now()),
            "1 month ago"
        );
        assert_eq!(
            format_relative_time(&before(Duration::days(362)), now()),
            "1 year ago"
        );
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(
            format_relative_time(&(now() + Duration::hours(2)).to_rfc3339(), now()),
            "just now"
        );
    }

    #[test]
    fn test_unreadable_timestamps_are_empty() {
        assert_eq!(format_relative_time("", now()), "");
        assert_eq!(format_relative_time("   ", now()), "");
        assert_eq!(format_relative_time("yesterday-ish", now()), "");
        assert_eq!(format_relative_time("2024-13-45T99:00:00", now()), "");
    }

    #[test]
    fn test_offsetless_timestamp_is_local() {
        let naive = (now() - Duration::hours(3))
            .with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert_eq!(format_relative_time(&naive, now()), "3 hours ago");
    }

    #[test]
    fn test_format_absolute() {
        assert_eq!(format_absolute(""), "Unknown date");
        assert_eq!(format_absolute("garbage"), "garbage");
        assert_eq!(format_absolute("2024-01-15T10:30:00"), "2024-01-15 10:30:00");
    }
}
