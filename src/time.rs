use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a service timestamp. Naive values are taken as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }
    // Numeric timestamps arrive stringified from the normalizer.
    if ts.bytes().all(|b| b.is_ascii_digit()) {
        return ts.parse().ok().and_then(DateTime::<Utc>::from_timestamp_millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Milliseconds since the epoch used for recency ordering; unknown is zero.
pub fn sort_key(ts: &str) -> i64 {
    parse_timestamp(ts).map_or(0, |dt| dt.timestamp_millis())
}

/// Short "x ago" label relative to `now`.
pub fn format_timestamp(ts: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse_timestamp(ts) else {
        return "Unknown".to_string();
    };

    let diff = now.signed_duration_since(dt);
    if diff.num_milliseconds() < 0 {
        return dt.format("%b %-d, %Y, %H:%M").to_string();
    }

    let mins = diff.num_minutes();
    let hrs = diff.num_hours();
    let days = diff.num_days();
    if mins < 60 {
        format!("{}m ago", mins)
    } else if hrs < 24 {
        format!("{}h ago", hrs)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        dt.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01 10:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-01"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(
            parse_timestamp("1760000000000"),
            Some(Utc.with_ymd_and_hms(2025, 10, 9, 8, 53, 20).unwrap())
        );
        assert!(sort_key("1760000000000") > sort_key("2020-01-01T00:00:00Z"));
        assert_eq!(parse_timestamp("99999999999999999999999"), None);
    }

    #[test]
    fn test_unparsable_sorts_as_epoch() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(sort_key(""), 0);
        assert_eq!(sort_key("not a date"), 0);
        assert!(sort_key("2025-01-01T00:00:00Z") > 0);
    }

    #[test]
    fn test_format_relative() {
        assert_eq!(format_timestamp("2025-10-17T11:55:00Z", now()), "5m ago");
        assert_eq!(format_timestamp("2025-10-17T09:00:00Z", now()), "3h ago");
        assert_eq!(format_timestamp("2025-10-14T12:00:00Z", now()), "3d ago");
        assert_eq!(format_timestamp("2025-10-03T12:00:00Z", now()), "Oct 3");
    }

    #[test]
    fn test_format_unknown_and_future() {
        assert_eq!(format_timestamp("", now()), "Unknown");
        assert_eq!(format_timestamp("garbage", now()), "Unknown");
        assert_eq!(
            format_timestamp("2025-12-25T08:30:00Z", now()),
            "Dec 25, 2025, 08:30"
        );
    }
}
