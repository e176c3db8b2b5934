//! Daily attendance classification and the per-period hour summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of one employee-day.
///
/// At most one code exists per (matricule, year, month, day). A day without
/// a code is valid and contributes nothing to the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceCode {
    /// Worked a day shift.
    Present,
    /// Worked a night shift.
    PresentNight,
    /// Scheduled but did not work.
    Absent,
    /// On paid leave.
    Leave,
    /// Worked on a public holiday paid with majoration.
    PresentHolidayMajorated,
    /// Attended training.
    Training,
    /// Scheduled rest day.
    ScheduledOff,
}

impl AttendanceCode {
    /// Returns true for the codes whose hours count as actually worked.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::AttendanceCode;
    ///
    /// assert!(AttendanceCode::PresentNight.is_worked());
    /// assert!(!AttendanceCode::Leave.is_worked());
    /// ```
    pub fn is_worked(&self) -> bool {
        matches!(
            self,
            AttendanceCode::Present
                | AttendanceCode::PresentNight
                | AttendanceCode::PresentHolidayMajorated
        )
    }
}

impl std::fmt::Display for AttendanceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AttendanceCode::Present => "present",
            AttendanceCode::PresentNight => "present_night",
            AttendanceCode::Absent => "absent",
            AttendanceCode::Leave => "leave",
            AttendanceCode::PresentHolidayMajorated => "present_holiday_majorated",
            AttendanceCode::Training => "training",
            AttendanceCode::ScheduledOff => "scheduled_off",
        };
        write!(f, "{}", label)
    }
}

/// Hours per category for one employee over one period.
///
/// Each calendar day lands in at most one category. `presence` includes the
/// night and holiday hours, and `actual_worked_hours` equals `presence`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSummary {
    /// Hours worked (day, night and holiday shifts).
    pub presence: Decimal,
    /// Hours worked on night shifts.
    pub presence_night: Decimal,
    /// Hours on paid leave.
    pub leave: Decimal,
    /// Hours worked on majorated holidays.
    pub holiday_majorated: Decimal,
    /// Hours in training.
    pub training: Decimal,
    /// Hours absent.
    pub absence: Decimal,
    /// Number of training days.
    pub training_days: u32,
    /// Number of scheduled rest days.
    pub scheduled_off_days: u32,
    /// Hours that count as worked: presence + night + holiday.
    pub actual_worked_hours: Decimal,
}

impl HourSummary {
    /// Returns true if no day contributed to any category.
    pub fn is_empty(&self) -> bool {
        *self == HourSummary::default()
    }
}
