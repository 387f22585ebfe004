//! Event date handling.
//!
//! Event dates are stored as `YYYY-MM-DD` strings and always read component by
//! component into a [`NaiveDate`]. No time zone is involved, so an event never
//! moves to the previous day when viewed from a negative UTC offset.

use crate::errors::{Error, Result};
use chrono::{Local, NaiveDate};

fn all_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a `YYYY-MM-DD` event date.
///
/// # Errors
/// Returns [`Error::Validation`] if the string does not have three numeric
/// components or does not name a real calendar day.
pub fn parse_event_date(date: &str) -> Result<NaiveDate> {
    let malformed = || Error::validation(format!("Malformed event date '{date}', expected YYYY-MM-DD"));

    let mut parts = date.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(malformed());
    }
    if ![year, month, day].into_iter().all(all_digits) {
        return Err(malformed());
    }

    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

/// Extracts the calendar year from the `YYYY` prefix of an event date.
///
/// # Errors
/// Returns [`Error::Validation`] if the prefix is not a four-digit year.
pub fn event_year(date: &str) -> Result<i32> {
    let prefix = date.trim().split('-').next().unwrap_or_default();
    if prefix.len() != 4 || !all_digits(prefix) {
        return Err(Error::validation(format!("Malformed event date '{date}'")));
    }
    prefix
        .parse()
        .map_err(|_| Error::validation(format!("Malformed event date '{date}'")))
}

/// Today's date in the local time zone.
#[must_use]
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `today` until the event; negative once the event has passed.
///
/// # Errors
/// Returns [`Error::Validation`] for a malformed date string.
pub fn days_remaining(date: &str, today: NaiveDate) -> Result<i64> {
    let event_date = parse_event_date(date)?;
    Ok((event_date - today).num_days())
}

/// [`days_remaining`] measured from the local calendar date.
///
/// # Errors
/// Returns [`Error::Validation`] for a malformed date string.
pub fn days_remaining_from_today(date: &str) -> Result<i64> {
    days_remaining(date, today_local())
}

/// Formats an event date as `DD/MM/YYYY` for display.
///
/// # Errors
/// Returns [`Error::Validation`] for a malformed date string.
pub fn format_event_date(date: &str) -> Result<String> {
    Ok(parse_event_date(date)?.format("%d/%m/%Y").to_string())
}
