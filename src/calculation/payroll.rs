//! Payroll line computation for one employee and period.
//!
//! Combines the hour summary, the eligibility flags, the manual adjustment
//! and the tax table into a [`PayrollResult`]. All arithmetic runs at full
//! decimal precision; amounts are rounded to whole currency units only when
//! the result row is assembled.

use std::time::Instant;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, EmployeeRecord, HourSummary, ManualAdjustment,
    PayrollResult, YearMonth,
};

use super::attendance::attendance_audit_step;
use super::eligibility::EligibilityFlags;
use super::tax::compute_tax_with;

/// The period a payroll line is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodContext {
    /// The payroll month.
    pub period: YearMonth,
    /// Working days used for theoretical hours; must be positive.
    pub working_days: u32,
}

/// Rounds a monetary amount to whole currency units, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the full payroll line for one employee.
///
/// Steps, in order:
/// 1. hourly rate = base salary / (working days × hours per day)
/// 2. worked base = base salary − absence hours × hourly rate, floored at 0
/// 3. night premium per night shift, holiday majoration, leave and training allowances
/// 4. meal and transport allowances per worked day, when `eligibility.allowances`
/// 5. gross = everything above plus the five manual bonuses
/// 6. social security and CNaPS at their rates of gross, when
///    `eligibility.deductions` and seniority is at least one whole year
/// 7. income tax on gross, when `eligibility.deductions`
/// 8. net = gross − (advance + social security + CNaPS + social contribution + tax)
///
/// # Errors
///
/// - [`EngineError::InvalidEmployee`] if the base salary is negative
/// - [`EngineError::CalculationError`] if `working_days` is zero or an amount overflows
pub fn compute_for_employee(
    employee: &EmployeeRecord,
    hours: &HourSummary,
    adjustment: &ManualAdjustment,
    eligibility: &EligibilityFlags,
    context: &PayPeriodContext,
    config: &PayrollConfig,
) -> EngineResult<PayrollResult> {
    let started = Instant::now();
    let rates = &config.rates;
    let per_day = config.schedule.hours_per_day;
    let base_salary = employee.base_salary;

    if base_salary.is_sign_negative() {
        return Err(EngineError::InvalidEmployee {
            matricule: employee.matricule.clone(),
            field: "base_salary".to_string(),
            message: format!("must not be negative, got {}", base_salary),
        });
    }
    if context.working_days == 0 {
        return Err(EngineError::CalculationError {
            message: "working days must be positive".to_string(),
        });
    }

    // Rate
    let hours_theoretical = mul(Decimal::from(context.working_days), per_day, "theoretical hours")?;
    let hourly_rate = div(base_salary, hours_theoretical, "hourly rate")?;

    // Earnings
    let absence_deduction = mul(hours.absence, hourly_rate, "absence deduction")?;
    let worked_base = (base_salary - absence_deduction).max(Decimal::ZERO);
    let night_premium = mul(
        div(hours.presence_night, per_day, "night shifts")?,
        rates.night_premium_per_night,
        "night premium",
    )?;
    let holiday_premium = mul(
        mul(hours.holiday_majorated, hourly_rate, "holiday premium")?,
        rates.holiday_majoration,
        "holiday premium",
    )?;
    let leave_allowance = mul(hours.leave, hourly_rate, "leave allowance")?;
    let training_allowance = mul(
        Decimal::from(hours.training_days),
        rates.training_allowance_per_day,
        "training allowance",
    )?;

    let presence_days = round_currency(div(hours.actual_worked_hours, per_day, "presence days")?);
    let allowance_gate = gate(eligibility.allowances);
    let meal_allowance = mul(presence_days, rates.meal_allowance_per_day, "meal allowance")? * allowance_gate;
    let transport_allowance =
        mul(presence_days, rates.transport_allowance_per_day, "transport allowance")? * allowance_gate;

    let gross = checked_sum(
        &[
            worked_base,
            night_premium,
            holiday_premium,
            leave_allowance,
            training_allowance,
            adjustment.production_bonus,
            adjustment.attendance_bonus,
            adjustment.seniority_bonus,
            adjustment.elite_bonus,
            adjustment.responsibility_bonus,
            meal_allowance,
            transport_allowance,
        ],
        "gross",
    )?;

    // Deductions
    let contributions_apply = eligibility.deductions && eligibility.seniority.years >= 1;
    let social_security_deduction = if contributions_apply {
        mul(gross, config.deductions.social_security_rate, "social security")?
    } else {
        Decimal::ZERO
    };
    let cnaps_deduction = if contributions_apply {
        mul(gross, config.deductions.cnaps_rate, "CNaPS")?
    } else {
        Decimal::ZERO
    };

    let tax_computation = compute_tax_with(gross, &config.tax);
    let tax = tax_computation.liability * gate(eligibility.deductions);

    let social_contribution =
        adjustment.social_contribution(config.deductions.default_social_override);
    let total_deductions = checked_sum(
        &[
            adjustment.advance,
            social_security_deduction,
            cnaps_deduction,
            social_contribution,
            tax,
        ],
        "total deductions",
    )?;
    let net = gross
        .checked_sub(total_deductions)
        .ok_or_else(|| overflow("net"))?;

    let percent_presence = round_currency(mul(
        div(hours.actual_worked_hours, hours_theoretical, "presence")?,
        Decimal::ONE_HUNDRED,
        "presence",
    )?);

    // Trace
    let mut steps = vec![
        attendance_audit_step(hours, context.period, per_day, 1),
        eligibility.audit_step(2),
        AuditStep {
            step_number: 3,
            rule_id: "hourly_rate".to_string(),
            rule_name: "Hourly Rate".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "working_days": context.working_days,
                "hours_per_day": per_day.normalize().to_string()
            }),
            output: serde_json::json!({
                "hours_theoretical": hours_theoretical.normalize().to_string(),
                "hourly_rate": hourly_rate.round_dp(4).to_string()
            }),
            reasoning: format!(
                "{} / ({} days x {}h) = {}",
                base_salary.normalize(),
                context.working_days,
                per_day.normalize(),
                hourly_rate.round_dp(2)
            ),
        },
        AuditStep {
            step_number: 4,
            rule_id: "gross_pay".to_string(),
            rule_name: "Gross Pay".to_string(),
            input: serde_json::json!({
                "allowances_eligible": eligibility.allowances,
                "presence_days": presence_days.to_string(),
                "total_bonuses": adjustment.total_bonuses().normalize().to_string()
            }),
            output: serde_json::json!({
                "worked_base": amount(worked_base),
                "absence_deduction": amount(absence_deduction),
                "night_premium": amount(night_premium),
                "holiday_premium": amount(holiday_premium),
                "leave_allowance": amount(leave_allowance),
                "training_allowance": amount(training_allowance),
                "meal_allowance": amount(meal_allowance),
                "transport_allowance": amount(transport_allowance),
                "gross": amount(gross)
            }),
            reasoning: format!("Gross pay {}", round_currency(gross)),
        },
        AuditStep {
            step_number: 5,
            rule_id: "social_contributions".to_string(),
            rule_name: "Social Contributions".to_string(),
            input: serde_json::json!({
                "gross": amount(gross),
                "deductions_eligible": eligibility.deductions,
                "seniority_years": eligibility.seniority.years,
                "social_override": adjustment.social_override.map(|v| v.normalize().to_string())
            }),
            output: serde_json::json!({
                "social_security": amount(social_security_deduction),
                "cnaps": amount(cnaps_deduction),
                "social_contribution": amount(social_contribution)
            }),
            reasoning: if contributions_apply {
                format!(
                    "Social security and CNaPS on gross {}, plus contribution {}",
                    round_currency(gross),
                    round_currency(social_contribution)
                )
            } else {
                format!(
                    "Social security and CNaPS not applied; contribution {}",
                    round_currency(social_contribution)
                )
            },
        },
        tax_computation.audit_step(eligibility.deductions, 6),
    ];
    steps.push(AuditStep {
        step_number: 7,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross": amount(gross),
            "advance": amount(adjustment.advance),
            "total_deductions": amount(total_deductions)
        }),
        output: serde_json::json!({ "net": amount(net) }),
        reasoning: format!(
            "{} - {} = {}",
            round_currency(gross),
            round_currency(total_deductions),
            round_currency(net)
        ),
    });

    let mut warnings: Vec<AuditWarning> = eligibility.warning().into_iter().collect();
    if absence_deduction > base_salary {
        warnings.push(AuditWarning {
            code: "ABSENCE_EXCEEDS_BASE".to_string(),
            message: format!(
                "Absence deduction {} exceeds base salary; worked base floored at 0",
                round_currency(absence_deduction)
            ),
            severity: "low".to_string(),
        });
    }
    if net.is_sign_negative() && !net.is_zero() {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET".to_string(),
            message: format!("Deductions exceed gross; net is {}", round_currency(net)),
            severity: "high".to_string(),
        });
    }

    Ok(PayrollResult {
        matricule: employee.matricule.clone(),
        nom: employee.nom.clone(),
        prenom: employee.prenom.clone(),
        team: employee.team.clone(),
        period: context.period,
        working_days_used: context.working_days,
        eligible: eligibility.allowances,
        deductions_applied: eligibility.deductions,
        seniority_years: eligibility.seniority.years,
        seniority_months: eligibility.seniority.months,
        hours: hours.clone(),
        hours_theoretical,
        presence_days,
        percent_presence,
        base_salary: round_currency(base_salary),
        hourly_rate: hourly_rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        absence_deduction: round_currency(absence_deduction),
        worked_base: round_currency(worked_base),
        night_premium: round_currency(night_premium),
        holiday_premium: round_currency(holiday_premium),
        leave_allowance: round_currency(leave_allowance),
        training_allowance: round_currency(training_allowance),
        production_bonus: round_currency(adjustment.production_bonus),
        attendance_bonus: round_currency(adjustment.attendance_bonus),
        seniority_bonus: round_currency(adjustment.seniority_bonus),
        elite_bonus: round_currency(adjustment.elite_bonus),
        responsibility_bonus: round_currency(adjustment.responsibility_bonus),
        meal_allowance: round_currency(meal_allowance),
        transport_allowance: round_currency(transport_allowance),
        gross: round_currency(gross),
        social_security_deduction: round_currency(social_security_deduction),
        cnaps_deduction: round_currency(cnaps_deduction),
        social_contribution: round_currency(social_contribution),
        advance: round_currency(adjustment.advance),
        tax: round_currency(tax),
        total_deductions: round_currency(total_deductions),
        net: round_currency(net),
        leave_balance: employee.leave_balance,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: started.elapsed().as_micros() as u64,
        },
    })
}

fn gate(enabled: bool) -> Decimal {
    if enabled { Decimal::ONE } else { Decimal::ZERO }
}

fn amount(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn mul(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

fn div(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_div(b).ok_or_else(|| EngineError::CalculationError {
        message: format!("division by zero or overflow computing {}", what),
    })
}

fn checked_sum(parts: &[Decimal], what: &str) -> EngineResult<Decimal> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(*part))
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("overflow computing {}", what),
    }
}
