//! Collaborator contracts consumed by the engine.
//!
//! The engine never performs I/O. Employee records, daily attendance codes
//! and manual adjustments are supplied through the traits below by whatever
//! store the caller uses; [`InMemoryDirectory`] is a map-backed
//! implementation of all three.

mod leave;
mod memory;

pub use leave::{LeaveAccount, LeaveLedgerService};
pub use memory::InMemoryDirectory;

use crate::models::{AttendanceCode, EmployeeRecord, ManualAdjustment};

/// Source of employee records.
pub trait EmployeeDirectory: Send + Sync {
    /// Returns every employee record, including malformed ones; the engine
    /// skips records without a matricule.
    fn all_employees(&self) -> Vec<EmployeeRecord>;
}

/// Day-by-day attendance codes.
pub trait AttendanceLookup: Send + Sync {
    /// The code recorded for one employee on one day, or `None` if unset.
    fn code(&self, matricule: &str, year: i32, month: u32, day: u32) -> Option<AttendanceCode>;
}

/// Manually entered per-period adjustments.
pub trait AdjustmentSource: Send + Sync {
    /// The adjustment for one employee and period, or `None` if nothing was entered.
    fn adjustment(&self, matricule: &str, year: i32, month: u32) -> Option<ManualAdjustment>;
}
