//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] row computed for one employee
//! and period, the [`BatchResult`] wrapping all rows of a run, and the audit
//! structures that record how each row was reached.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HourSummary, YearMonth};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs that were recovered with a default and may need an
/// operator's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for one payroll row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The calculation duration in microseconds.
    pub duration_us: u64,
}

/// One payroll line: one employee, one period.
///
/// Monetary amounts are rounded to whole currency units (the hourly rate to
/// two decimals); they were computed at full precision and rounded only here,
/// so the parts need not add up to `gross` or `net` to the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Employee identifier.
    pub matricule: String,
    /// Family name.
    pub nom: String,
    /// Given name.
    pub prenom: String,
    /// Team grouping.
    pub team: String,
    /// The payroll period.
    pub period: YearMonth,
    /// Working days used for the theoretical hours.
    pub working_days_used: u32,

    /// Allowance eligibility (meal and transport).
    pub eligible: bool,
    /// Whether social contributions and tax were applied.
    pub deductions_applied: bool,
    /// Whole years of seniority at the reference date.
    pub seniority_years: i32,
    /// Remaining months of seniority beyond the whole years.
    pub seniority_months: i32,

    /// Hours per category for the period.
    pub hours: HourSummary,
    /// Theoretical hours: working days times hours per day.
    pub hours_theoretical: Decimal,
    /// Worked days, rounded.
    pub presence_days: Decimal,
    /// Worked hours as a percentage of theoretical hours, rounded.
    pub percent_presence: Decimal,

    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Base salary divided by theoretical hours.
    pub hourly_rate: Decimal,
    /// Absence hours priced at the hourly rate.
    pub absence_deduction: Decimal,
    /// Base salary less absences, floored at zero.
    pub worked_base: Decimal,
    /// Flat premium per night shift.
    pub night_premium: Decimal,
    /// Majoration for holiday hours.
    pub holiday_premium: Decimal,
    /// Leave hours priced at the hourly rate.
    pub leave_allowance: Decimal,
    /// Flat allowance per training day.
    pub training_allowance: Decimal,
    /// Production bonus.
    pub production_bonus: Decimal,
    /// Attendance bonus.
    pub attendance_bonus: Decimal,
    /// Seniority bonus.
    pub seniority_bonus: Decimal,
    /// Elite bonus.
    pub elite_bonus: Decimal,
    /// Responsibility bonus.
    pub responsibility_bonus: Decimal,
    /// Meal allowance, gated by eligibility.
    pub meal_allowance: Decimal,
    /// Transport allowance, gated by eligibility.
    pub transport_allowance: Decimal,
    /// Gross pay.
    pub gross: Decimal,

    /// Social security deduction.
    pub social_security_deduction: Decimal,
    /// CNaPS deduction.
    pub cnaps_deduction: Decimal,
    /// Flat (or overridden) social contribution.
    pub social_contribution: Decimal,
    /// Salary advance deducted.
    pub advance: Decimal,
    /// Income tax (IGR).
    pub tax: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net: Decimal,

    /// Leave balance read from the employee record.
    pub leave_balance: Decimal,
    /// How this row was computed.
    pub audit_trace: AuditTrace,
}

/// Aggregate gross and net across the rows of a batch.
///
/// The sum is order-independent, so partial totals computed over disjoint
/// slices of rows can be combined with [`BatchTotals::merge`].
///
/// # Example
///
/// ```
/// use payroll_engine::models::BatchTotals;
/// use rust_decimal::Decimal;
///
/// let a = BatchTotals { gross: Decimal::new(100, 0), net: Decimal::new(80, 0) };
/// let b = BatchTotals { gross: Decimal::new(50, 0), net: Decimal::new(45, 0) };
/// let merged = a.merge(&b);
/// assert_eq!(merged.gross, Decimal::new(150, 0));
/// assert_eq!(merged.net, Decimal::new(125, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Total gross pay.
    pub gross: Decimal,
    /// Total net pay.
    pub net: Decimal,
}

impl BatchTotals {
    /// Sums the (rounded) gross and net of every row.
    pub fn from_rows(rows: &[PayrollResult]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| {
            acc.merge(&BatchTotals {
                gross: row.gross,
                net: row.net,
            })
        })
    }

    /// Combines two partial totals.
    pub fn merge(&self, other: &BatchTotals) -> BatchTotals {
        BatchTotals {
            gross: self.gross + other.gross,
            net: self.net + other.net,
        }
    }
}

/// Describes the run a batch was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMeta {
    /// The payroll period.
    pub period: YearMonth,
    /// Working days used, explicit or derived from the calendar.
    pub working_days_used: u32,
    /// Reference date for seniority and eligibility.
    pub as_of: NaiveDate,
}

/// An employee whose row could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    /// The employee's matricule.
    pub matricule: String,
    /// Why the computation failed.
    pub message: String,
}

/// The result of computing payroll for every employee of a period.
///
/// Partial: rows that failed are listed in `failures` and excluded from
/// `rows` and `totals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Unique identifier for this run.
    pub batch_id: Uuid,
    /// When the batch was computed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that computed the batch.
    pub engine_version: String,
    /// One row per successfully computed employee.
    pub rows: Vec<PayrollResult>,
    /// Gross and net across `rows`.
    pub totals: BatchTotals,
    /// Period and working days.
    pub meta: BatchMeta,
    /// Employees whose computation failed.
    pub failures: Vec<EmployeeFailure>,
    /// Number of failed employees.
    pub error_count: usize,
    /// Number of records skipped for lack of a matricule.
    pub skipped_count: usize,
}

impl BatchResult {
    /// Finds the row of an employee.
    pub fn row(&self, matricule: &str) -> Option<&PayrollResult> {
        self.rows.iter().find(|r| r.matricule == matricule)
    }
}
