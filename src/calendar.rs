use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `d/m/yyyy` with one or two digit day and month.
static DMY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").expect("Valid regex pattern"));

/// Unpadded `d/m/yyyy`, year of up to four digits.
static LENIENT_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{1,4}$").expect("Valid regex pattern")
});

/// 24h clock, leading zero on the hour optional.
static HHMM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("Valid regex pattern")
});

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// The text does not have the `dd/mm/yyyy` shape.
    #[error("expected a dd/mm/yyyy date")]
    BadFormat,
    /// The numbers name a real day but the text is padded or has trailing
    /// characters (e.g. `010/03/2025`, `10 / 03 / 2025`).
    #[error("date must be written as d/m/yyyy without padding")]
    Unreadable,
    /// Numbers parsed but they do not name a real day (e.g. 31/02/2025).
    #[error("not a calendar date")]
    NotACalendarDate,
}

/// Current date in the given timezone.
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Steps forward one calendar day at a time and returns the day on which the
/// `days`-th working day is reached. With `days == 0` the start date is
/// returned unchanged, even when it falls on a weekend.
pub fn add_working_days(from: NaiveDate, days: u32) -> NaiveDate {
    let mut date = from;
    let mut counted = 0;
    while counted < days {
        date += Duration::days(1);
        if is_working_day(date) {
            counted += 1;
        }
    }
    date
}

/// Same bounds as a Gregorian `checkdate`: years 1 to 32767.
fn calendar_date(day: u32, month: u32, year: i32) -> Result<NaiveDate, DateError> {
    if !(1..=32767).contains(&year) {
        return Err(DateError::NotACalendarDate);
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::NotACalendarDate)
}

/// Strict `d{1,2}/d{1,2}/d{4}` parser used by the reservation form.
pub fn parse_dmy_strict(raw: &str) -> Result<NaiveDate, DateError> {
    if !DMY_PATTERN.is_match(raw) {
        return Err(DateError::BadFormat);
    }
    let mut parts = raw.split('/');
    let mut next = || {
        parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or(DateError::BadFormat)
    };
    let (day, month, year) = (next()?, next()?, next()?);
    calendar_date(day, month, year as i32)
}

/// Lenient parser used by the refund form. Each component is read like a
/// leading integer (`" 7x"` reads as 7, `"aa"` as 0) and checked as a
/// calendar date first. The raw text must then have the exact
/// `d/m/yyyy` shape with no padding.
pub fn parse_dmy_lenient(raw: &str) -> Result<NaiveDate, DateError> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return Err(DateError::BadFormat);
    }
    let day = leading_int(parts[0]).ok_or(DateError::NotACalendarDate)?;
    let month = leading_int(parts[1]).ok_or(DateError::NotACalendarDate)?;
    let year = leading_int(parts[2])
        .and_then(|y| i32::try_from(y).ok())
        .ok_or(DateError::NotACalendarDate)?;
    let date = calendar_date(day, month, year)?;
    if !LENIENT_SHAPE.is_match(raw) {
        return Err(DateError::Unreadable);
    }
    Ok(date)
}

/// Digits after optional leading whitespace; no digits reads as 0. `None`
/// only when the digits overflow.
fn leading_int(part: &str) -> Option<u32> {
    let digits: String = part
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}

/// Parses `HH:MM` into minutes since midnight.
pub fn parse_hhmm(raw: &str) -> Option<u32> {
    let caps = HHMM_PATTERN.captures(raw)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_working_days_skip_weekend() {
        // Thursday + 2 working days = Monday
        assert_eq!(add_working_days(d(2024, 1, 4), 2), d(2024, 1, 8));
        // Wednesday + 2 = Friday
        assert_eq!(add_working_days(d(2024, 1, 3), 2), d(2024, 1, 5));
    }

    #[test]
    fn test_working_days_zero_keeps_date() {
        let sat = d(2024, 1, 6);
        assert_eq!(add_working_days(sat, 0), sat);
    }

    #[test]
    fn test_working_days_from_weekend() {
        // Saturday + 1 = Monday
        assert_eq!(add_working_days(d(2024, 1, 6), 1), d(2024, 1, 8));
        // Friday + 10 = two weeks later on Friday
        assert_eq!(add_working_days(d(2024, 1, 5), 10), d(2024, 1, 19));
    }

    #[test]
    fn test_is_working_day() {
        assert!(is_working_day(d(2024, 1, 1)));
        assert!(is_working_day(d(2024, 1, 5)));
        assert!(!is_working_day(d(2024, 1, 6)));
        assert!(!is_working_day(d(2024, 1, 7)));
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(parse_dmy_strict("1/1/2025"), Ok(d(2025, 1, 1)));
        assert_eq!(parse_dmy_strict("29/02/2024"), Ok(d(2024, 2, 29)));
        assert_eq!(parse_dmy_strict("29/02/2025"), Err(DateError::NotACalendarDate));
        assert_eq!(parse_dmy_strict("00/01/2025"), Err(DateError::NotACalendarDate));
        assert_eq!(parse_dmy_strict("1/1/0000"), Err(DateError::NotACalendarDate));
        assert_eq!(parse_dmy_strict("2025-01-01"), Err(DateError::BadFormat));
        assert_eq!(parse_dmy_strict("1/1/25"), Err(DateError::BadFormat));
        assert_eq!(parse_dmy_strict("001/1/2025"), Err(DateError::BadFormat));
        assert_eq!(parse_dmy_strict("١/1/2025"), Err(DateError::BadFormat));
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_dmy_lenient("10/01/2025"), Ok(d(2025, 1, 10)));
        assert_eq!(parse_dmy_lenient("1/1/2025"), Ok(d(2025, 1, 1)));
        assert_eq!(parse_dmy_lenient("10-01-2025"), Err(DateError::BadFormat));
        assert_eq!(parse_dmy_lenient("10/01/2025/1"), Err(DateError::BadFormat));
        assert_eq!(parse_dmy_lenient("31/04/2025"), Err(DateError::NotACalendarDate));
    }

    #[test]
    fn test_parse_lenient_rejects_padding() {
        assert_eq!(parse_dmy_lenient("010/03/02025"), Err(DateError::Unreadable));
        assert_eq!(parse_dmy_lenient("10 / 03 / 2025"), Err(DateError::Unreadable));
        assert_eq!(parse_dmy_lenient("1a/01/2025"), Err(DateError::Unreadable));
    }

    #[test]
    fn test_parse_lenient_non_numeric_reads_as_zero() {
        assert_eq!(parse_dmy_lenient("aa/03/2025"), Err(DateError::NotACalendarDate));
        assert_eq!(parse_dmy_lenient("/01/2025"), Err(DateError::NotACalendarDate));
        assert_eq!(parse_dmy_lenient("10/03/"), Err(DateError::NotACalendarDate));
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("9:00"), Some(540));
        assert_eq!(parse_hhmm("18:00"), Some(1080));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("10:60"), None);
        assert_eq!(parse_hhmm("1030"), None);
        assert_eq!(parse_hhmm(""), None);
    }

    #[test]
    fn test_formats() {
        let date = d(2025, 1, 1);
        assert_eq!(format_dmy(date), "01/01/2025");
        assert_eq!(format_iso(date), "2025-01-01");
    }
}
