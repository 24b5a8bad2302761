//! Timestamp parsing for birthdays and date-shaped custom attributes

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};

use crate::error::{BrazeError, Result};

/// US-style calendar date, interpreted as midnight UTC
const US_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses a timestamp string
///
/// Accepted shapes are RFC 2822 (`Tue, 16 Mar 2010 13:30:00 GMT`), RFC 3339
/// (`2010-03-16T13:30:00Z`) and `MM/DD/YYYY`. A bare ISO date such as
/// `2010-03-16` is rejected, as is anything without a recognizable shape.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BrazeError::date_parse("empty date string"));
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(timestamp);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp);
    }

    let date = NaiveDate::parse_from_str(trimmed, US_DATE_FORMAT)
        .map_err(|e| BrazeError::from(e).with_context(trimmed))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Whole seconds since the Unix epoch for a timestamp string
pub fn seconds_from_epoch(input: &str) -> Result<i64> {
    parse_timestamp(input).map(|timestamp| timestamp.timestamp())
}

/// A calendar date as (year, month 1..=12, day), in the timestamp's own offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

pub fn calendar_date(input: &str) -> Result<CalendarDate> {
    let timestamp = parse_timestamp(input)?;
    Ok(CalendarDate {
        year: timestamp.year(),
        month: timestamp.month(),
        day: timestamp.day(),
    })
}
