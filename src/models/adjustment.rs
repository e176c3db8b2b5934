//! Manually-entered salary adjustments for one employee and period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Bonuses, social contribution override and salary advance keyed by
/// (matricule, year, month).
///
/// Every amount defaults to zero. A missing `social_override` means "use the
/// configured flat contribution", which is why it is optional rather than zero.
///
/// # Example
///
/// ```
/// use payroll_engine::models::ManualAdjustment;
/// use rust_decimal::Decimal;
///
/// let adjustment: ManualAdjustment =
///     serde_json::from_str(r#"{ "production_bonus": "20000", "advance": 50000 }"#).unwrap();
/// assert_eq!(adjustment.total_bonuses(), Decimal::new(20000, 0));
/// assert_eq!(adjustment.social_contribution(Decimal::new(15000, 0)), Decimal::new(15000, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    /// Production bonus.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub production_bonus: Decimal,
    /// Attendance (assiduity) bonus.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub attendance_bonus: Decimal,
    /// Seniority bonus.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub seniority_bonus: Decimal,
    /// Elite bonus.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub elite_bonus: Decimal,
    /// Responsibility bonus.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub responsibility_bonus: Decimal,
    /// Social contribution replacing the configured flat amount.
    #[serde(default, deserialize_with = "lenient::optional_amount")]
    pub social_override: Option<Decimal>,
    /// Salary advance already paid, deducted from net.
    #[serde(default, deserialize_with = "lenient::non_negative_or_zero")]
    pub advance: Decimal,
}

impl ManualAdjustment {
    /// Sum of the five bonus amounts.
    pub fn total_bonuses(&self) -> Decimal {
        self.production_bonus
            + self.attendance_bonus
            + self.seniority_bonus
            + self.elite_bonus
            + self.responsibility_bonus
    }

    /// The social contribution to deduct: the override if present, else `default`.
    pub fn social_contribution(&self, default: Decimal) -> Decimal {
        self.social_override.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_is_all_zero_without_override() {
        let adjustment = ManualAdjustment::default();
        assert_eq!(adjustment.total_bonuses(), Decimal::ZERO);
        assert_eq!(adjustment.advance, Decimal::ZERO);
        assert_eq!(adjustment.social_override, None);
    }

    #[test]
    fn test_social_override_replaces_default() {
        let adjustment = ManualAdjustment {
            social_override: Some(dec("8000")),
            ..Default::default()
        };
        assert_eq!(adjustment.social_contribution(dec("15000")), dec("8000"));
    }

    #[test]
    fn test_zero_override_is_honoured() {
        let adjustment: ManualAdjustment =
            serde_json::from_str(r#"{ "social_override": 0 }"#).unwrap();
        assert_eq!(adjustment.social_contribution(dec("15000")), Decimal::ZERO);
    }

    #[test]
    fn test_total_bonuses_sums_all_five() {
        let adjustment = ManualAdjustment {
            production_bonus: dec("1000"),
            attendance_bonus: dec("2000"),
            seniority_bonus: dec("3000"),
            elite_bonus: dec("4000"),
            responsibility_bonus: dec("5000"),
            ..Default::default()
        };
        assert_eq!(adjustment.total_bonuses(), dec("15000"));
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let json = r#"{
            "production_bonus": "beaucoup",
            "elite_bonus": -500,
            "social_override": "??",
            "advance": "25000"
        }"#;
        let adjustment: ManualAdjustment = serde_json::from_str(json).unwrap();
        assert_eq!(adjustment.production_bonus, Decimal::ZERO);
        assert_eq!(adjustment.elite_bonus, Decimal::ZERO);
        assert_eq!(adjustment.social_override, None);
        assert_eq!(adjustment.advance, dec("25000"));
    }
}
