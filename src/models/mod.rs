//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod adjustment;
mod attendance;
mod employee;
pub(crate) mod lenient;
mod payroll_result;

pub use adjustment::ManualAdjustment;
pub use attendance::{AttendanceCode, HourSummary};
pub use employee::{EmployeeRecord, YearMonth};
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, BatchMeta, BatchResult, BatchTotals, EmployeeFailure,
    PayrollResult,
};
