//! Map-backed collaborators.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use super::{AdjustmentSource, AttendanceLookup, EmployeeDirectory};
use crate::models::{AttendanceCode, EmployeeRecord, ManualAdjustment, YearMonth};

type DayKey = (i32, u32, u32);

/// Holds employees, attendance codes and adjustments in memory.
///
/// Attendance is indexed per employee then per day, so each lookup is a
/// constant-time pair of hash probes.
///
/// # Example
///
/// ```
/// use payroll_engine::directory::{AttendanceLookup, InMemoryDirectory};
/// use payroll_engine::models::{AttendanceCode, EmployeeRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut directory = InMemoryDirectory::new();
/// directory.add_employee(EmployeeRecord::new("M001", Decimal::new(500_000, 0)));
/// directory.set_code("M001", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), AttendanceCode::Present);
///
/// assert_eq!(directory.code("M001", 2026, 3, 2), Some(AttendanceCode::Present));
/// assert_eq!(directory.code("M001", 2026, 3, 3), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    employees: Vec<EmployeeRecord>,
    codes: HashMap<String, HashMap<DayKey, AttendanceCode>>,
    adjustments: HashMap<(String, YearMonth), ManualAdjustment>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee record. Records are returned in insertion order.
    pub fn add_employee(&mut self, employee: EmployeeRecord) {
        self.employees.push(employee);
    }

    /// Records the attendance code of one day, replacing any previous code.
    pub fn set_code(&mut self, matricule: &str, date: NaiveDate, code: AttendanceCode) {
        self.codes
            .entry(matricule.to_string())
            .or_default()
            .insert((date.year(), date.month(), date.day()), code);
    }

    /// Records the same code on every date of `dates`.
    pub fn set_codes<I>(&mut self, matricule: &str, dates: I, code: AttendanceCode)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        for date in dates {
            self.set_code(matricule, date, code);
        }
    }

    /// Sets the manual adjustment of one employee for one period.
    pub fn set_adjustment(&mut self, matricule: &str, period: YearMonth, adjustment: ManualAdjustment) {
        self.adjustments
            .insert((matricule.to_string(), period), adjustment);
    }

    /// Number of employee records held.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// True when no employee record is held.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn all_employees(&self) -> Vec<EmployeeRecord> {
        self.employees.clone()
    }
}

impl AttendanceLookup for InMemoryDirectory {
    fn code(&self, matricule: &str, year: i32, month: u32, day: u32) -> Option<AttendanceCode> {
        self.codes
            .get(matricule)
            .and_then(|days| days.get(&(year, month, day)))
            .copied()
    }
}

impl AdjustmentSource for InMemoryDirectory {
    fn adjustment(&self, matricule: &str, year: i32, month: u32) -> Option<ManualAdjustment> {
        let period = YearMonth::new(year, month).ok()?;
        self.adjustments
            .get(&(matricule.to_string(), period))
            .cloned()
    }
}
