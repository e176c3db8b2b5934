//! Monthly payroll engine
//!
//! This crate computes one payroll line per employee and month from static
//! employee records, a sparse table of daily attendance codes and a handful
//! of manual adjustments. It covers hour-bucket aggregation, seniority-gated
//! eligibility, a progressive income tax and a leave-balance ledger.
//!
//! Storage, check-in workflows and document generation are left to the
//! caller, who supplies data through the traits in [`directory`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use payroll_engine::config::PayrollConfig;
//! use payroll_engine::directory::InMemoryDirectory;
//! use payroll_engine::engine::{BatchRequest, PayrollEngine};
//! use payroll_engine::models::{AttendanceCode, EmployeeRecord};
//! use rust_decimal::Decimal;
//!
//! let mut directory = InMemoryDirectory::new();
//! let mut employee = EmployeeRecord::new("M001", Decimal::new(400_000, 0));
//! employee.hire_date = NaiveDate::from_ymd_opt(2022, 6, 1);
//! directory.add_employee(employee);
//! directory.set_code("M001", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), AttendanceCode::Present);
//!
//! let engine = PayrollEngine::from_directory(Arc::new(directory), PayrollConfig::default()).unwrap();
//! let batch = engine
//!     .compute_batch(&BatchRequest::new(2026, 3).with_as_of(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()))
//!     .unwrap();
//!
//! assert_eq!(batch.rows.len(), 1);
//! assert_eq!(batch.meta.working_days_used, 22);
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod models;
