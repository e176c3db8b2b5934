//! Seniority-gated entitlements.
//!
//! One predicate, [`is_eligible`], gates two unrelated policies: meal and
//! transport allowances, and whether social contributions and income tax are
//! applied at all. [`EligibilityFlags`] keeps the two as separate fields so a
//! caller can set them independently once the policies diverge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, AuditWarning};

use super::dates::{Seniority, seniority_years_months};

/// Tenure that must be exceeded, in days.
pub const DEFAULT_MIN_TENURE_DAYS: i64 = 365;

/// Returns true iff more than 365 days separate `hire_date` and `as_of`.
///
/// A missing hire date is never eligible.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::is_eligible;
/// use chrono::NaiveDate;
///
/// let as_of = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
/// assert!(is_eligible(NaiveDate::from_ymd_opt(2025, 3, 30), as_of));
/// assert!(!is_eligible(NaiveDate::from_ymd_opt(2025, 3, 31), as_of));
/// assert!(!is_eligible(None, as_of));
/// ```
pub fn is_eligible(hire_date: Option<NaiveDate>, as_of: NaiveDate) -> bool {
    meets_tenure(hire_date, as_of, DEFAULT_MIN_TENURE_DAYS)
}

/// Returns true iff more than `min_tenure_days` separate `hire_date` and `as_of`.
pub fn meets_tenure(hire_date: Option<NaiveDate>, as_of: NaiveDate, min_tenure_days: i64) -> bool {
    hire_date.is_some_and(|hired| (as_of - hired).num_days() > min_tenure_days)
}

/// Entitlements derived from an employee's hire date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityFlags {
    /// The hire date the flags were derived from.
    pub hire_date: Option<NaiveDate>,
    /// The reference date.
    pub as_of: NaiveDate,
    /// Meal and transport allowances are paid.
    pub allowances: bool,
    /// Social contributions and income tax are applied.
    pub deductions: bool,
    /// Elapsed seniority; zero when the hire date is missing.
    pub seniority: Seniority,
}

impl EligibilityFlags {
    /// Builds the audit step recording how the flags were reached.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        let reasoning = match self.hire_date {
            Some(hired) => format!(
                "Hired {}, {} year(s) {} month(s) at {}: {}",
                hired,
                self.seniority.years,
                self.seniority.months,
                self.as_of,
                if self.allowances {
                    "tenure exceeds the minimum"
                } else {
                    "tenure does not exceed the minimum"
                }
            ),
            None => "No usable hire date: not eligible".to_string(),
        };

        AuditStep {
            step_number,
            rule_id: "seniority_eligibility".to_string(),
            rule_name: "Seniority Eligibility".to_string(),
            input: serde_json::json!({
                "hire_date": self.hire_date.map(|d| d.to_string()),
                "as_of": self.as_of.to_string()
            }),
            output: serde_json::json!({
                "allowances": self.allowances,
                "deductions": self.deductions,
                "seniority_years": self.seniority.years,
                "seniority_months": self.seniority.months
            }),
            reasoning,
        }
    }

    /// A warning when the hire date was missing or unparsable.
    pub fn warning(&self) -> Option<AuditWarning> {
        self.hire_date.is_none().then(|| AuditWarning {
            code: "HIRE_DATE_MISSING".to_string(),
            message: "Hire date missing or unparsable; treated as not eligible".to_string(),
            severity: "medium".to_string(),
        })
    }
}

/// Derives the entitlement flags for one employee.
///
/// Both flags currently come from the same tenure test.
pub fn evaluate_eligibility(
    hire_date: Option<NaiveDate>,
    as_of: NaiveDate,
    min_tenure_days: i64,
) -> EligibilityFlags {
    let eligible = meets_tenure(hire_date, as_of, min_tenure_days);
    let seniority = hire_date
        .map(|hired| seniority_years_months(hired, as_of))
        .unwrap_or_default();

    EligibilityFlags {
        hire_date,
        as_of,
        allowances: eligible,
        deductions: eligible,
        seniority,
    }
}
