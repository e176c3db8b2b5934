//! Employee record and calendar-month marker.
//!
//! This module defines [`EmployeeRecord`], the static attributes the engine
//! reads for each employee, and [`YearMonth`], the `"YYYY-MM"` marker used
//! for payroll periods and leave-accrual anchors.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::lenient;

/// A calendar month, written `"YYYY-MM"`.
///
/// Ordering is chronological (year first, then month).
///
/// # Example
///
/// ```
/// use payroll_engine::models::YearMonth;
///
/// let march: YearMonth = "2026-03".parse().unwrap();
/// assert_eq!(march.year(), 2026);
/// assert_eq!(march.month(), 3);
/// assert_eq!(march.to_string(), "2026-03");
/// assert!("2026-13".parse::<YearMonth>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Earliest year a marker can hold.
    pub const MIN_YEAR: i32 = 1;
    /// Latest year a marker can hold; `YYYY` has four digits.
    pub const MAX_YEAR: i32 = 9999;

    /// Creates a marker, rejecting months outside `1..=12` and years outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(EngineError::InputMalformed {
                field: "year".to_string(),
                value: year.to_string(),
            });
        }
        if !(1..=12).contains(&month) {
            return Err(EngineError::InputMalformed {
                field: "month".to_string(),
                value: month.to_string(),
            });
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InputMalformed`] if the year has more than four digits.
    pub fn from_date(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EngineError::InputMalformed {
            field: "year_month".to_string(),
            value: s.to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;

        Self::new(year, month).map_err(|_| malformed())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Static attributes of one employee, as held by the employee directory.
///
/// The engine only reads these; the leave balance is mutated through
/// [`LeaveLedgerService`](crate::directory::LeaveLedgerService), never in place.
///
/// Deserialization is forgiving: a hire date in neither `DD/MM/YYYY` nor
/// `YYYY-MM-DD` becomes `None`, and a non-numeric amount becomes zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique employee identifier.
    #[serde(default)]
    pub matricule: String,
    /// Family name.
    #[serde(default)]
    pub nom: String,
    /// Given name.
    #[serde(default)]
    pub prenom: String,
    /// Free-text grouping (team, site, shift crew).
    #[serde(default)]
    pub team: String,
    /// Monthly base salary.
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub base_salary: Decimal,
    /// Hire date; `None` when missing or unparsable.
    #[serde(default, deserialize_with = "lenient::hire_date")]
    pub hire_date: Option<NaiveDate>,
    /// Remaining leave days.
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub leave_balance: Decimal,
    /// Month in which leave accrual was last applied; `None` when missing or malformed.
    #[serde(default, deserialize_with = "lenient::year_month")]
    pub leave_balance_anchor: Option<YearMonth>,
}

impl EmployeeRecord {
    /// Creates a record with the given identity and salary; every other field is empty.
    pub fn new(matricule: impl Into<String>, base_salary: Decimal) -> Self {
        Self {
            matricule: matricule.into(),
            nom: String::new(),
            prenom: String::new(),
            team: String::new(),
            base_salary,
            hire_date: None,
            leave_balance: Decimal::ZERO,
            leave_balance_anchor: None,
        }
    }

    /// Returns true if the record carries a usable matricule.
    pub fn has_matricule(&self) -> bool {
        !self.matricule.trim().is_empty()
    }

    /// "PRENOM NOM" style display name, skipping empty parts.
    pub fn display_name(&self) -> String {
        [self.prenom.trim(), self.nom.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
