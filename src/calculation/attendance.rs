//! Attendance aggregation.
//!
//! Folds one employee's sparse daily codes for a month into an
//! [`HourSummary`]. Days without a code contribute nothing.

use rust_decimal::Decimal;

use crate::models::{AttendanceCode, AuditStep, HourSummary, YearMonth};

use super::dates::days_in_month;

/// Hours credited for each scheduled day when no planning supplies them.
pub const DEFAULT_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Aggregates the codes of every day of `year`-`month` into hour buckets.
///
/// `code_for_day` is called once per calendar day (1-based) and returns the
/// day's code, or `None` when nothing was recorded.
///
/// | Code | Buckets |
/// |---|---|
/// | `Present` | presence, actual worked |
/// | `PresentNight` | presence, actual worked, presence_night |
/// | `PresentHolidayMajorated` | presence, actual worked, holiday_majorated |
/// | `Absent` | absence |
/// | `Leave` | leave |
/// | `Training` | training, training_days |
/// | `ScheduledOff` | scheduled_off_days |
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{aggregate_attendance, DEFAULT_HOURS_PER_DAY};
/// use payroll_engine::models::AttendanceCode;
/// use rust_decimal::Decimal;
///
/// let summary = aggregate_attendance(
///     |day| match day {
///         1..=3 => Some(AttendanceCode::Present),
///         4 => Some(AttendanceCode::PresentNight),
///         _ => None,
///     },
///     2026,
///     3,
///     DEFAULT_HOURS_PER_DAY,
/// );
/// assert_eq!(summary.presence, Decimal::new(32, 0));
/// assert_eq!(summary.presence_night, Decimal::new(8, 0));
/// assert_eq!(summary.actual_worked_hours, Decimal::new(32, 0));
/// ```
pub fn aggregate_attendance<F>(
    code_for_day: F,
    year: i32,
    month: u32,
    hours_per_day: Decimal,
) -> HourSummary
where
    F: Fn(u32) -> Option<AttendanceCode>,
{
    let mut summary = HourSummary::default();

    for day in 1..=days_in_month(year, month) {
        let Some(code) = code_for_day(day) else {
            continue;
        };

        if code.is_worked() {
            summary.presence += hours_per_day;
            summary.actual_worked_hours += hours_per_day;
        }

        match code {
            AttendanceCode::Present => {}
            AttendanceCode::PresentNight => summary.presence_night += hours_per_day,
            AttendanceCode::PresentHolidayMajorated => summary.holiday_majorated += hours_per_day,
            AttendanceCode::Absent => summary.absence += hours_per_day,
            AttendanceCode::Leave => summary.leave += hours_per_day,
            AttendanceCode::Training => {
                summary.training += hours_per_day;
                summary.training_days += 1;
            }
            AttendanceCode::ScheduledOff => summary.scheduled_off_days += 1,
        }
    }

    summary
}

/// Builds the audit step recording an aggregation.
pub fn attendance_audit_step(
    summary: &HourSummary,
    period: YearMonth,
    hours_per_day: Decimal,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "attendance_aggregation".to_string(),
        rule_name: "Attendance Aggregation".to_string(),
        input: serde_json::json!({
            "period": period.to_string(),
            "days_in_month": days_in_month(period.year(), period.month()),
            "hours_per_day": hours_per_day.normalize().to_string()
        }),
        output: serde_json::json!({
            "presence": summary.presence.normalize().to_string(),
            "presence_night": summary.presence_night.normalize().to_string(),
            "holiday_majorated": summary.holiday_majorated.normalize().to_string(),
            "leave": summary.leave.normalize().to_string(),
            "training": summary.training.normalize().to_string(),
            "absence": summary.absence.normalize().to_string(),
            "training_days": summary.training_days,
            "scheduled_off_days": summary.scheduled_off_days,
            "actual_worked_hours": summary.actual_worked_hours.normalize().to_string()
        }),
        reasoning: format!(
            "{}h worked, {}h absent, {}h leave, {} training day(s), {} rest day(s)",
            summary.actual_worked_hours.normalize(),
            summary.absence.normalize(),
            summary.leave.normalize(),
            summary.training_days,
            summary.scheduled_off_days
        ),
    }
}
