use chrono::{NaiveDate, SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string with second precision.
///
/// Timestamps are stored as strings; keeping one format makes them
/// lexicographically comparable in query filters.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// RFC 3339 string for now + the given number of days.
pub fn rfc3339_in_days(days: i64) -> String {
    (Utc::now() + chrono::Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a calendar date in the wire format used by the booking API.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-10"),
            NaiveDate::from_ymd_opt(2025, 6, 10)
        );
        assert!(parse_date("2025-13-01").is_none());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("10/06/2025").is_none());
        assert!(parse_date("not-a-date").is_none());
    }

    #[test]
    fn test_now_is_ordered_against_future() {
        let now = now_rfc3339();
        let later = rfc3339_in_days(14);
        assert!(now < later);
    }
}
