//! Progressive income tax (IGR).
//!
//! Applies a bracket table to a gross amount. When the bracket sum is exactly
//! zero (gross at or below the first threshold) a flat minimum liability is
//! charged instead, so the curve jumps from the minimum straight to the first
//! marginal cent above the threshold. That discontinuity is the policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxConfig;
use crate::models::AuditStep;

/// The share of gross that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTranche {
    /// Bracket lower bound.
    pub lower: Decimal,
    /// Bracket upper bound; `None` for the open top bracket.
    pub upper: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Amount of gross taxed in this bracket.
    pub taxable: Decimal,
    /// Tax due on `taxable`.
    pub tax: Decimal,
}

/// Outcome of applying the tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// The gross amount taxed, floored at zero.
    pub taxable_gross: Decimal,
    /// Sum of the per-bracket taxes.
    pub bracket_sum: Decimal,
    /// True when the minimum liability replaced a zero bracket sum.
    pub minimum_applied: bool,
    /// Tax due.
    pub liability: Decimal,
    /// Per-bracket breakdown of the brackets the gross reached.
    pub tranches: Vec<TaxTranche>,
}

/// Computes the tax on `gross` with the reference table.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_tax;
/// use rust_decimal::Decimal;
///
/// assert_eq!(compute_tax(Decimal::ZERO), Decimal::new(2000, 0));
/// assert_eq!(compute_tax(Decimal::new(450_000, 0)), Decimal::new(7500, 0));
/// ```
pub fn compute_tax(gross: Decimal) -> Decimal {
    compute_tax_with(gross, &TaxConfig::default()).liability
}

/// Computes the tax on `gross` with the given table.
///
/// Brackets are expected contiguous and sorted, as
/// [`PayrollConfig::validate`](crate::config::PayrollConfig::validate) enforces.
pub fn compute_tax_with(gross: Decimal, table: &TaxConfig) -> TaxComputation {
    let taxable_gross = gross.max(Decimal::ZERO);

    let tranches: Vec<TaxTranche> = table
        .brackets
        .iter()
        .filter(|bracket| taxable_gross > bracket.lower)
        .map(|bracket| {
            let top = bracket.upper.map_or(taxable_gross, |u| u.min(taxable_gross));
            let taxable = top - bracket.lower;
            TaxTranche {
                lower: bracket.lower,
                upper: bracket.upper,
                rate: bracket.rate,
                taxable,
                tax: taxable * bracket.rate,
            }
        })
        .collect();

    let bracket_sum: Decimal = tranches.iter().map(|t| t.tax).sum();
    let minimum_applied = bracket_sum.is_zero();
    let liability = if minimum_applied {
        table.minimum_liability
    } else {
        bracket_sum
    };

    TaxComputation {
        taxable_gross,
        bracket_sum,
        minimum_applied,
        liability,
        tranches,
    }
}

impl TaxComputation {
    /// Builds the audit step recording this computation.
    ///
    /// `applied` is false when eligibility waived the tax; the liability is
    /// still reported so the waiver is visible.
    pub fn audit_step(&self, applied: bool, step_number: u32) -> AuditStep {
        let tranches: Vec<serde_json::Value> = self
            .tranches
            .iter()
            .map(|t| {
                serde_json::json!({
                    "lower": t.lower.normalize().to_string(),
                    "upper": t.upper.map(|u| u.normalize().to_string()),
                    "rate": t.rate.normalize().to_string(),
                    "taxable": t.taxable.normalize().to_string(),
                    "tax": t.tax.normalize().to_string()
                })
            })
            .collect();

        let reasoning = if !applied {
            format!(
                "Tax of {} waived: employee not eligible",
                self.liability.round_dp(0)
            )
        } else if self.minimum_applied {
            format!(
                "Bracket sum is zero on gross {}: minimum liability {} applies",
                self.taxable_gross.round_dp(0),
                self.liability.normalize()
            )
        } else {
            format!(
                "{} tranche(s) on gross {} = {}",
                self.tranches.iter().filter(|t| !t.tax.is_zero()).count(),
                self.taxable_gross.round_dp(0),
                self.liability.round_dp(0)
            )
        };

        AuditStep {
            step_number,
            rule_id: "income_tax".to_string(),
            rule_name: "Income Tax (IGR)".to_string(),
            input: serde_json::json!({
                "gross": self.taxable_gross.round_dp(2).to_string(),
                "applied": applied
            }),
            output: serde_json::json!({
                "tranches": tranches,
                "bracket_sum": self.bracket_sum.round_dp(2).to_string(),
                "minimum_applied": self.minimum_applied,
                "liability": self.liability.round_dp(2).to_string()
            }),
            reasoning,
        }
    }
}
