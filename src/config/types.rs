//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every section's `Default`
//! carries the contract values, so a partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::YearMonth;

/// Working-time assumptions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Hours credited for each scheduled day.
    pub hours_per_day: Decimal,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hours_per_day: Decimal::new(8, 0),
        }
    }
}

/// Premiums and allowances.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Flat premium per night shift worked.
    pub night_premium_per_night: Decimal,
    /// Multiplier applied to the hourly rate for majorated holiday hours.
    pub holiday_majoration: Decimal,
    /// Flat allowance per training day.
    pub training_allowance_per_day: Decimal,
    /// Meal allowance per worked day.
    pub meal_allowance_per_day: Decimal,
    /// Transport allowance per worked day.
    pub transport_allowance_per_day: Decimal,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            night_premium_per_night: Decimal::new(8000, 0),
            holiday_majoration: Decimal::new(100, 2),
            training_allowance_per_day: Decimal::new(10000, 0),
            meal_allowance_per_day: Decimal::new(2500, 0),
            transport_allowance_per_day: Decimal::new(1200, 0),
        }
    }
}

/// Statutory deductions other than income tax.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeductionConfig {
    /// Social security rate applied to gross.
    pub social_security_rate: Decimal,
    /// CNaPS rate applied to gross.
    pub cnaps_rate: Decimal,
    /// Flat social contribution when no override is entered.
    pub default_social_override: Decimal,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            social_security_rate: Decimal::new(1, 2),
            cnaps_rate: Decimal::new(1, 2),
            default_social_override: Decimal::new(15000, 0),
        }
    }
}

/// One tranche of the progressive tax table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxBracket {
    /// Lower bound (exclusive of the amount taxed here).
    pub lower: Decimal,
    /// Upper bound; `None` for the open top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate for amounts between the bounds.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Creates a bracket.
    pub fn new(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        Self { lower, upper, rate }
    }
}

/// Progressive income tax table (IGR).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Contiguous brackets, lowest first.
    pub brackets: Vec<TaxBracket>,
    /// Liability substituted when the bracket sum is exactly zero.
    pub minimum_liability: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        let k = |thousands: i64| Decimal::new(thousands * 1000, 0);
        Self {
            brackets: vec![
                TaxBracket::new(Decimal::ZERO, Some(k(350)), Decimal::ZERO),
                TaxBracket::new(k(350), Some(k(400)), Decimal::new(5, 2)),
                TaxBracket::new(k(400), Some(k(500)), Decimal::new(10, 2)),
                TaxBracket::new(k(500), Some(k(600)), Decimal::new(15, 2)),
                TaxBracket::new(k(600), None, Decimal::new(20, 2)),
            ],
            minimum_liability: Decimal::new(2000, 0),
        }
    }
}

/// Leave accrual policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LeaveConfig {
    /// Leave days earned per elapsed month.
    pub monthly_accrual: Decimal,
    /// Months credited on the first accrual of an account with no anchor.
    pub bootstrap_months: i32,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            monthly_accrual: Decimal::new(25, 1),
            bootstrap_months: 3,
        }
    }
}

/// Seniority gate for allowances and deductions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Tenure in days that must be exceeded.
    pub min_tenure_days: i64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_tenure_days: 365,
        }
    }
}

/// Accepted range for requested periods.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Earliest accepted year.
    pub min_year: i32,
    /// Latest accepted year.
    pub max_year: i32,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_year: 2100,
        }
    }
}

/// Contents of `payroll.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayrollFile {
    /// Working-time assumptions.
    pub schedule: ScheduleConfig,
    /// Premiums and allowances.
    pub rates: RateConfig,
    /// Statutory deductions.
    pub deductions: DeductionConfig,
    /// Leave accrual policy.
    pub leave: LeaveConfig,
    /// Seniority gate.
    pub eligibility: EligibilityConfig,
    /// Accepted period range.
    pub period: PeriodConfig,
}

/// The complete payroll configuration.
///
/// `PayrollConfig::default()` is the reference policy; YAML files loaded by
/// [`ConfigLoader`](super::ConfigLoader) may override any part of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollConfig {
    /// Working-time assumptions.
    pub schedule: ScheduleConfig,
    /// Premiums and allowances.
    pub rates: RateConfig,
    /// Statutory deductions.
    pub deductions: DeductionConfig,
    /// Progressive tax table.
    pub tax: TaxConfig,
    /// Leave accrual policy.
    pub leave: LeaveConfig,
    /// Seniority gate.
    pub eligibility: EligibilityConfig,
    /// Accepted period range.
    pub period: PeriodConfig,
}

impl PayrollConfig {
    /// Assembles a configuration from the two file sections.
    pub fn from_parts(payroll: PayrollFile, tax: TaxConfig) -> Self {
        Self {
            schedule: payroll.schedule,
            rates: payroll.rates,
            deductions: payroll.deductions,
            tax,
            leave: payroll.leave,
            eligibility: payroll.eligibility,
            period: payroll.period,
        }
    }

    /// Checks the values are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigInvalid`] describing the first violation.
    pub fn validate(&self) -> EngineResult<()> {
        if self.schedule.hours_per_day <= Decimal::ZERO {
            return Err(invalid("schedule.hours_per_day must be positive"));
        }

        let amounts = [
            ("rates.night_premium_per_night", self.rates.night_premium_per_night),
            ("rates.holiday_majoration", self.rates.holiday_majoration),
            ("rates.training_allowance_per_day", self.rates.training_allowance_per_day),
            ("rates.meal_allowance_per_day", self.rates.meal_allowance_per_day),
            ("rates.transport_allowance_per_day", self.rates.transport_allowance_per_day),
            ("deductions.default_social_override", self.deductions.default_social_override),
            ("tax.minimum_liability", self.tax.minimum_liability),
            ("leave.monthly_accrual", self.leave.monthly_accrual),
        ];
        if let Some((name, _)) = amounts.iter().find(|(_, v)| v.is_sign_negative()) {
            return Err(invalid(format!("{} must not be negative", name)));
        }

        for (name, rate) in [
            ("deductions.social_security_rate", self.deductions.social_security_rate),
            ("deductions.cnaps_rate", self.deductions.cnaps_rate),
        ] {
            if !is_fraction(rate) {
                return Err(invalid(format!("{} must be within 0..=1", name)));
            }
        }

        if self.leave.bootstrap_months < 0 {
            return Err(invalid("leave.bootstrap_months must not be negative"));
        }
        if self.eligibility.min_tenure_days < 0 {
            return Err(invalid("eligibility.min_tenure_days must not be negative"));
        }
        if self.period.min_year > self.period.max_year {
            return Err(invalid("period.min_year is after period.max_year"));
        }
        if self.period.min_year < YearMonth::MIN_YEAR || self.period.max_year > YearMonth::MAX_YEAR {
            return Err(invalid(format!(
                "period years must stay within {}..={}",
                YearMonth::MIN_YEAR,
                YearMonth::MAX_YEAR
            )));
        }

        validate_brackets(&self.tax.brackets)
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    let first = brackets
        .first()
        .ok_or_else(|| invalid("tax.brackets must not be empty"))?;
    if !first.lower.is_zero() {
        return Err(invalid("the first tax bracket must start at 0"));
    }

    for (i, bracket) in brackets.iter().enumerate() {
        if !is_fraction(bracket.rate) {
            return Err(invalid(format!("tax bracket {} rate must be within 0..=1", i + 1)));
        }
        let is_last = i + 1 == brackets.len();
        match (bracket.upper, is_last) {
            (None, false) => {
                return Err(invalid(format!(
                    "tax bracket {} is open-ended but is not the last one",
                    i + 1
                )));
            }
            (Some(upper), _) if upper <= bracket.lower => {
                return Err(invalid(format!(
                    "tax bracket {} upper bound {} is not above its lower bound {}",
                    i + 1,
                    upper,
                    bracket.lower
                )));
            }
            _ => {}
        }
        if let Some(next) = brackets.get(i + 1) {
            if bracket.upper != Some(next.lower) {
                return Err(invalid(format!(
                    "tax brackets {} and {} are not contiguous",
                    i + 1,
                    i + 2
                )));
            }
        }
    }
    Ok(())
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::ConfigInvalid {
        message: message.into(),
    }
}
