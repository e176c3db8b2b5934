//! Batch orchestration.
//!
//! [`PayrollEngine`] pulls every employee from the directory, aggregates
//! their attendance, looks up their adjustment and computes one
//! [`PayrollResult`] each. A failing employee is recorded and skipped; the
//! batch itself only fails when the request is invalid.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    PayPeriodContext, aggregate_attendance, business_days_in_month, compute_for_employee,
    evaluate_eligibility,
};
use crate::config::PayrollConfig;
use crate::directory::{AdjustmentSource, AttendanceLookup, EmployeeDirectory};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BatchMeta, BatchResult, BatchTotals, EmployeeFailure, EmployeeRecord, PayrollResult,
    YearMonth,
};

/// Largest explicit working-day count accepted.
const MAX_WORKING_DAYS: u32 = 31;

/// Parameters of one batch run.
///
/// # Example
///
/// ```
/// use payroll_engine::engine::BatchRequest;
/// use chrono::NaiveDate;
///
/// let request = BatchRequest::new(2026, 3)
///     .with_working_days(21)
///     .with_as_of(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
/// assert_eq!(request.working_days, Some(21));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Payroll year.
    pub year: i32,
    /// Payroll month, 1 to 12.
    pub month: u32,
    /// Working days to use; the month's business days when `None`.
    #[serde(default)]
    pub working_days: Option<u32>,
    /// Reference date for seniority and eligibility; today when `None`.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl BatchRequest {
    /// A request for the given month with every option defaulted.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            working_days: None,
            as_of: None,
        }
    }

    /// Overrides the working-day count.
    pub fn with_working_days(mut self, working_days: u32) -> Self {
        self.working_days = Some(working_days);
        self
    }

    /// Pins the reference date.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Computes payroll batches from the supplied collaborators.
#[derive(Clone)]
pub struct PayrollEngine {
    employees: Arc<dyn EmployeeDirectory>,
    attendance: Arc<dyn AttendanceLookup>,
    adjustments: Arc<dyn AdjustmentSource>,
    config: PayrollConfig,
}

impl PayrollEngine {
    /// Creates an engine over three collaborators.
    ///
    /// # Errors
    ///
    /// [`EngineError::ConfigInvalid`] if `config` fails validation.
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        attendance: Arc<dyn AttendanceLookup>,
        adjustments: Arc<dyn AdjustmentSource>,
        config: PayrollConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            employees,
            attendance,
            adjustments,
            config,
        })
    }

    /// Creates an engine over a single store implementing all three contracts.
    pub fn from_directory<D>(directory: Arc<D>, config: PayrollConfig) -> EngineResult<Self>
    where
        D: EmployeeDirectory + AttendanceLookup + AdjustmentSource + 'static,
    {
        Self::new(directory.clone(), directory.clone(), directory, config)
    }

    /// The policy in use.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Computes the payroll of every employee for the requested month.
    ///
    /// Records without a matricule are skipped and counted; an employee whose
    /// computation fails is listed in `failures` and left out of the rows and
    /// totals.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPeriod`] if the year is outside the configured
    /// range, the month outside 1 to 12, or the explicit working days outside
    /// 1 to 31. No employee is computed in that case.
    pub fn compute_batch(&self, request: &BatchRequest) -> EngineResult<BatchResult> {
        let started = Instant::now();
        let context = self.resolve_period(request)?;
        let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());
        let batch_id = Uuid::new_v4();

        info!(
            batch_id = %batch_id,
            period = %context.period,
            working_days = context.working_days,
            as_of = %as_of,
            "Computing payroll batch"
        );

        let mut rows = Vec::new();
        let mut failures = Vec::new();
        let mut skipped_count = 0;

        for employee in self.employees.all_employees() {
            if !employee.has_matricule() {
                skipped_count += 1;
                warn!(
                    batch_id = %batch_id,
                    name = %employee.display_name(),
                    "Skipping employee record without matricule"
                );
                continue;
            }

            match self.compute_employee(&employee, &context, as_of) {
                Ok(row) => {
                    debug!(
                        matricule = %row.matricule,
                        gross = %row.gross,
                        net = %row.net,
                        "Computed payroll row"
                    );
                    rows.push(row);
                }
                Err(err) => {
                    let failure = EngineError::EmployeeComputationFailed {
                        matricule: employee.matricule.clone(),
                        message: err.to_string(),
                    };
                    warn!(
                        batch_id = %batch_id,
                        matricule = %employee.matricule,
                        error = %failure,
                        "Employee computation failed"
                    );
                    failures.push(EmployeeFailure {
                        matricule: employee.matricule,
                        message: failure.to_string(),
                    });
                }
            }
        }

        let totals = BatchTotals::from_rows(&rows);
        info!(
            batch_id = %batch_id,
            period = %context.period,
            rows = rows.len(),
            errors = failures.len(),
            skipped = skipped_count,
            gross = %totals.gross,
            net = %totals.net,
            duration_us = started.elapsed().as_micros() as u64,
            "Payroll batch completed"
        );

        Ok(BatchResult {
            batch_id,
            computed_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            rows,
            totals,
            meta: BatchMeta {
                period: context.period,
                working_days_used: context.working_days,
                as_of,
            },
            error_count: failures.len(),
            failures,
            skipped_count,
        })
    }

    /// Computes one employee's row without going through the directory.
    pub fn compute_employee(
        &self,
        employee: &EmployeeRecord,
        context: &PayPeriodContext,
        as_of: NaiveDate,
    ) -> EngineResult<PayrollResult> {
        let (year, month) = (context.period.year(), context.period.month());
        let matricule = employee.matricule.as_str();

        let hours = aggregate_attendance(
            |day| self.attendance.code(matricule, year, month, day),
            year,
            month,
            self.config.schedule.hours_per_day,
        );
        let adjustment = self
            .adjustments
            .adjustment(matricule, year, month)
            .unwrap_or_default();
        let eligibility = evaluate_eligibility(
            employee.hire_date,
            as_of,
            self.config.eligibility.min_tenure_days,
        );

        compute_for_employee(
            employee,
            &hours,
            &adjustment,
            &eligibility,
            context,
            &self.config,
        )
    }

    /// Validates a request and resolves its working days.
    pub fn resolve_period(&self, request: &BatchRequest) -> EngineResult<PayPeriodContext> {
        let bounds = &self.config.period;
        if request.year < bounds.min_year || request.year > bounds.max_year {
            return Err(EngineError::InvalidPeriod {
                message: format!(
                    "year {} outside {}..={}",
                    request.year, bounds.min_year, bounds.max_year
                ),
            });
        }
        let period =
            YearMonth::new(request.year, request.month).map_err(|_| EngineError::InvalidPeriod {
                message: format!("month {} outside 1..=12", request.month),
            })?;

        let working_days = match request.working_days {
            Some(days) if days == 0 || days > MAX_WORKING_DAYS => {
                return Err(EngineError::InvalidPeriod {
                    message: format!("working days {} outside 1..={}", days, MAX_WORKING_DAYS),
                });
            }
            Some(days) => days,
            None => business_days_in_month(request.year, request.month),
        };

        Ok(PayPeriodContext {
            period,
            working_days,
        })
    }
}

impl std::fmt::Debug for PayrollEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
