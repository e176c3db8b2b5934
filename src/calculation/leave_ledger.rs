//! Leave balance arithmetic.
//!
//! Pure functions: they take a balance and return the new one. Persisting
//! the result and serializing concurrent updates for one employee is the
//! caller's job (see [`LeaveLedgerService`](crate::directory::LeaveLedgerService)).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LeaveConfig;
use crate::models::YearMonth;

use super::dates::elapsed_calendar_months;

/// Result of an accrual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAccrual {
    /// Balance after accrual.
    pub new_balance: Decimal,
    /// Anchor after accrual.
    pub new_anchor: YearMonth,
    /// Months credited.
    pub elapsed_months: i32,
    /// Days added.
    pub accrued: Decimal,
}

/// Credits `policy.monthly_accrual` days for every month elapsed since `anchor`.
///
/// With no anchor, `policy.bootstrap_months` are credited. The anchor then
/// moves to `as_of`, so a second call in the same month credits nothing.
/// An anchor later than `as_of` is left in place and nothing is credited.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::accrue;
/// use payroll_engine::config::LeaveConfig;
/// use rust_decimal::Decimal;
///
/// let policy = LeaveConfig::default();
/// let now = "2026-03".parse().unwrap();
///
/// let first = accrue(Decimal::ZERO, Some("2026-01".parse().unwrap()), now, &policy);
/// assert_eq!(first.new_balance, Decimal::new(5, 0));
///
/// let again = accrue(first.new_balance, Some(first.new_anchor), now, &policy);
/// assert_eq!(again.new_balance, first.new_balance);
/// ```
pub fn accrue(
    balance: Decimal,
    anchor: Option<YearMonth>,
    as_of: YearMonth,
    policy: &LeaveConfig,
) -> LeaveAccrual {
    let elapsed_months = match anchor {
        Some(anchor) => elapsed_calendar_months(anchor, as_of).max(0),
        None => policy.bootstrap_months.max(0),
    };
    let new_anchor = anchor.map_or(as_of, |anchor| anchor.max(as_of));
    let accrued = policy
        .monthly_accrual
        .checked_mul(Decimal::from(elapsed_months))
        .unwrap_or(Decimal::MAX);
    let new_balance = balance.checked_add(accrued).unwrap_or(Decimal::MAX);

    LeaveAccrual {
        new_balance: new_balance.max(Decimal::ZERO),
        new_anchor,
        elapsed_months,
        accrued,
    }
}

/// Removes one leave day, never going below zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::consume_one_leave_day;
/// use rust_decimal::Decimal;
///
/// assert_eq!(consume_one_leave_day(Decimal::new(25, 1)), Decimal::new(15, 1));
/// assert_eq!(consume_one_leave_day(Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn consume_one_leave_day(balance: Decimal) -> Decimal {
    (balance - Decimal::ONE).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_accrue_one_month() {
        let result = accrue(dec("10"), Some(ym("2026-02")), ym("2026-03"), &LeaveConfig::default());
        assert_eq!(result.new_balance, dec("12.5"));
        assert_eq!(result.new_anchor, ym("2026-03"));
        assert_eq!(result.elapsed_months, 1);
        assert_eq!(result.accrued, dec("2.5"));
    }

    #[test]
    fn test_accrue_across_year_boundary() {
        let result = accrue(dec("0"), Some(ym("2025-11")), ym("2026-02"), &LeaveConfig::default());
        assert_eq!(result.new_balance, dec("7.5"));
    }

    #[test]
    fn test_missing_anchor_bootstraps_three_months() {
        let result = accrue(dec("0"), None, ym("2026-03"), &LeaveConfig::default());
        assert_eq!(result.elapsed_months, 3);
        assert_eq!(result.new_balance, dec("7.5"));
        assert_eq!(result.new_anchor, ym("2026-03"));
    }

    #[test]
    fn test_accrue_twice_same_month_is_idempotent() {
        let policy = LeaveConfig::default();
        let first = accrue(dec("4"), None, ym("2026-03"), &policy);
        let second = accrue(first.new_balance, Some(first.new_anchor), ym("2026-03"), &policy);
        assert_eq!(second.new_balance, first.new_balance);
        assert_eq!(second.new_anchor, first.new_anchor);
        assert_eq!(second.elapsed_months, 0);
    }

    #[test]
    fn test_anchor_in_future_does_not_move_back() {
        let result = accrue(dec("3"), Some(ym("2026-05")), ym("2026-03"), &LeaveConfig::default());
        assert_eq!(result.new_balance, dec("3"));
        assert_eq!(result.new_anchor, ym("2026-05"));
        assert_eq!(result.elapsed_months, 0);
    }

    #[test]
    fn test_custom_monthly_rate() {
        let policy = LeaveConfig {
            monthly_accrual: dec("2"),
            bootstrap_months: 1,
        };
        let result = accrue(dec("0"), None, ym("2026-03"), &policy);
        assert_eq!(result.new_balance, dec("2"));
    }

    #[test]
    fn test_accrual_saturates_instead_of_overflowing() {
        let result = accrue(Decimal::MAX, Some(ym("2026-01")), ym("2026-03"), &LeaveConfig::default());
        assert_eq!(result.new_balance, Decimal::MAX);
        assert_eq!(result.accrued, dec("5"));
    }

    #[test]
    fn test_anchor_far_in_past_stays_bounded() {
        let result = accrue(dec("0"), Some(ym("0001-01")), ym("2026-03"), &LeaveConfig::default());
        assert_eq!(result.elapsed_months, 2025 * 12 + 2);
        assert_eq!(result.new_balance, dec("2.5") * Decimal::from(2025 * 12 + 2));
    }

    #[test]
    fn test_consume_subtracts_one() {
        assert_eq!(consume_one_leave_day(dec("3")), dec("2"));
    }

    #[test]
    fn test_consume_floors_at_zero() {
        assert_eq!(consume_one_leave_day(dec("0")), dec("0"));
        assert_eq!(consume_one_leave_day(dec("0.5")), dec("0"));
    }
}
