//! Calendar helpers.
//!
//! Month lengths, business-day counts, hire-date parsing and the seniority
//! arithmetic shared by eligibility and the leave ledger.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::YearMonth;

/// Accepted hire-date layouts, as (shape, chrono format). In a shape `#`
/// stands for one ASCII digit; every other byte must match literally.
const HIRE_DATE_FORMATS: [(&str, &str); 2] = [("##/##/####", "%d/%m/%Y"), ("####-##-##", "%Y-%m-%d")];

/// Elapsed whole years and remaining months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seniority {
    /// Whole years.
    pub years: i32,
    /// Remaining whole months, `0..=11`.
    pub months: i32,
}

/// Returns the number of days in the given month, or 0 for a month outside `1..=12`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2), 29);
/// assert_eq!(days_in_month(2025, 2), 28);
/// assert_eq!(days_in_month(2026, 4), 30);
/// ```
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 0,
    }
}

/// Counts Monday–Friday dates in the month. Never returns less than 1, so the
/// result is always safe to divide by.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::business_days_in_month;
///
/// // March 2026 starts on a Sunday.
/// assert_eq!(business_days_in_month(2026, 3), 22);
/// ```
pub fn business_days_in_month(year: i32, month: u32) -> u32 {
    let count = (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32;
    count.max(1)
}

/// Parses a hire date written `DD/MM/YYYY` or `YYYY-MM-DD`.
///
/// Anything else, including out-of-range days or months, yields `None`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::parse_hire_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2021, 3, 15);
/// assert_eq!(parse_hire_date("15/03/2021"), expected);
/// assert_eq!(parse_hire_date("2021-03-15"), expected);
/// assert_eq!(parse_hire_date("31/02/2021"), None);
/// assert_eq!(parse_hire_date("March 2021"), None);
/// ```
pub fn parse_hire_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    HIRE_DATE_FORMATS
        .iter()
        .filter(|(shape, _)| has_shape(text, shape))
        .find_map(|(_, format)| NaiveDate::parse_from_str(text, format).ok())
}

fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'#' => c.is_ascii_digit(),
            _ => c == s,
        })
}

/// Whole years and remaining months from `hire_date` to `as_of`.
///
/// A month is only counted once its day-of-month has been reached, so
/// 2024-05-20 → 2026-03-10 is 1 year 9 months. A hire date on or after
/// `as_of` gives zero.
pub fn seniority_years_months(hire_date: NaiveDate, as_of: NaiveDate) -> Seniority {
    if as_of <= hire_date {
        return Seniority::default();
    }

    let mut years = as_of.year() - hire_date.year();
    let mut months = as_of.month() as i32 - hire_date.month() as i32;
    if as_of.day() < hire_date.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Seniority { years, months }
}

/// Floor of the elapsed years from `hire_date` to `as_of`.
pub fn seniority_whole_years(hire_date: NaiveDate, as_of: NaiveDate) -> i32 {
    seniority_years_months(hire_date, as_of).years
}

/// Calendar months from `from` to `to`; negative when `to` precedes `from`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::elapsed_calendar_months;
/// use payroll_engine::models::YearMonth;
///
/// let from: YearMonth = "2025-11".parse().unwrap();
/// let to: YearMonth = "2026-02".parse().unwrap();
/// assert_eq!(elapsed_calendar_months(from, to), 3);
/// ```
pub fn elapsed_calendar_months(from: YearMonth, to: YearMonth) -> i32 {
    let months = (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()));
    i32::try_from(months).unwrap_or(if months < 0 { i32::MIN } else { i32::MAX })
}
