//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing a payroll batch.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Field-level input problems (an unparsable hire date, a non-numeric bonus)
/// are recovered with documented defaults and never reach this type; what
/// remains is either fatal for a whole batch (configuration, period) or fatal
/// for a single employee row.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but its values are inconsistent.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid {
        /// What made the configuration invalid.
        message: String,
    },

    /// A textual value could not be parsed.
    #[error("Malformed value for '{field}': {value:?}")]
    InputMalformed {
        /// The field being parsed.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// The requested payroll period was rejected before any work began.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// Why the period was rejected.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee '{matricule}' field '{field}': {message}")]
    InvalidEmployee {
        /// The matricule of the offending record.
        matricule: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The payroll row for one employee could not be computed.
    #[error("Computation failed for employee '{matricule}': {message}")]
    EmployeeComputationFailed {
        /// The matricule of the employee whose row failed.
        matricule: String,
        /// The underlying failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
