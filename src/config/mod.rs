//! Configuration loading and management for the payroll engine.
//!
//! This module loads the payroll policy (rates, allowances, deductions, tax
//! brackets, leave accrual) from YAML files. Every value has a default equal
//! to the reference policy, so [`PayrollConfig::default`] works without files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Tax brackets: {}", config.config().tax.brackets.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DeductionConfig, EligibilityConfig, LeaveConfig, PayrollConfig, PayrollFile, PeriodConfig,
    RateConfig, ScheduleConfig, TaxBracket, TaxConfig,
};
