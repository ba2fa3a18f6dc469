//! Date helper functions

use chrono::{Local, NaiveDate};

/// Publish date used when a record has no `publish_date` column
pub const EPOCH_DATE: &str = "1970-01-01";

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Resolve a record's publish date.
///
/// A missing value means the epoch; a value that does not parse counts as
/// today.
pub fn publish_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    parse_iso_date(raw.unwrap_or(EPOCH_DATE)).unwrap_or(today)
}

/// Format a date as an ISO `YYYY-MM-DD` string
pub fn date_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a date for RSS `<pubDate>` (RFC 822, midnight UTC)
///
/// # Examples
/// ```ignore
/// date_rfc822(date) // -> "Mon, 15 Jan 2024 00:00:00 +0000"
/// ```
pub fn date_rfc822(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y 00:00:00 +0000").to_string()
}
