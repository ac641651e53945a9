use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a date; use YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DateParseError(String);

/// Parses a date for a record or a range start. A bare day means midnight UTC.
pub fn parse_day_start(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    parse_with(input, NaiveTime::MIN)
}

/// Parses a range end. A bare day covers that whole day.
pub fn parse_day_end(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        .ok_or_else(|| DateParseError(input.to_string()))?;
    parse_with(input, end_of_day)
}

fn parse_with(input: &str, time: NaiveTime) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = input.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(day.and_time(time).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|_| DateParseError(input.to_string()))
}
