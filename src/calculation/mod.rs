//! Calculation logic for the payroll engine.
//!
//! This module contains the calendar helpers, seniority eligibility,
//! attendance aggregation, the progressive income tax, leave accrual, and
//! the per-employee payroll computation that combines them.

mod attendance;
mod dates;
mod eligibility;
mod leave_ledger;
mod payroll;
mod tax;

pub use attendance::{DEFAULT_HOURS_PER_DAY, aggregate_attendance, attendance_audit_step};
pub use dates::{
    Seniority, business_days_in_month, days_in_month, elapsed_calendar_months, parse_hire_date,
    seniority_whole_years, seniority_years_months,
};
pub use eligibility::{
    DEFAULT_MIN_TENURE_DAYS, EligibilityFlags, evaluate_eligibility, is_eligible, meets_tenure,
};
pub use leave_ledger::{LeaveAccrual, accrue, consume_one_leave_day};
pub use payroll::{PayPeriodContext, compute_for_employee, round_currency};
pub use tax::{TaxComputation, TaxTranche, compute_tax, compute_tax_with};
