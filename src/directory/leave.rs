//! Per-employee leave balances.
//!
//! The ledger arithmetic lives in [`crate::calculation`]; this service holds
//! the balances and serializes updates for each employee so that two
//! concurrent mutations of the same balance cannot lose one another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculation::{LeaveAccrual, accrue, consume_one_leave_day};
use crate::config::LeaveConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeRecord, YearMonth};

/// A stored leave balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAccount {
    /// Remaining leave days, never negative.
    pub balance: Decimal,
    /// Month in which accrual was last applied.
    pub anchor: Option<YearMonth>,
}

/// Leave balances keyed by matricule, each behind its own lock.
///
/// The outer map lock is only held to find or insert an account; updates
/// take the account's own mutex, so different employees never contend.
///
/// # Example
///
/// ```
/// use payroll_engine::config::LeaveConfig;
/// use payroll_engine::directory::{LeaveAccount, LeaveLedgerService};
/// use rust_decimal::Decimal;
///
/// let ledger = LeaveLedgerService::new(LeaveConfig::default());
/// ledger.open_account("M001", LeaveAccount { balance: Decimal::new(2, 0), anchor: None }).unwrap();
///
/// assert_eq!(ledger.record_leave_day("M001").unwrap(), Decimal::ONE);
/// ```
#[derive(Debug, Default)]
pub struct LeaveLedgerService {
    accounts: RwLock<HashMap<String, Arc<Mutex<LeaveAccount>>>>,
    policy: LeaveConfig,
}

impl LeaveLedgerService {
    /// Creates an empty ledger applying the given accrual policy.
    pub fn new(policy: LeaveConfig) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Creates a ledger seeded with the balance and anchor of each record.
    ///
    /// Records without a matricule are ignored.
    pub fn from_employees<'a, I>(policy: LeaveConfig, employees: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = &'a EmployeeRecord>,
    {
        let ledger = Self::new(policy);
        for employee in employees.into_iter().filter(|e| e.has_matricule()) {
            ledger.open_account(
                &employee.matricule,
                LeaveAccount {
                    balance: employee.leave_balance.max(Decimal::ZERO),
                    anchor: employee.leave_balance_anchor,
                },
            )?;
        }
        Ok(ledger)
    }

    /// Registers or replaces the account of one employee.
    pub fn open_account(&self, matricule: &str, account: LeaveAccount) -> EngineResult<()> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        accounts.insert(matricule.to_string(), Arc::new(Mutex::new(account)));
        Ok(())
    }

    /// Returns a snapshot of one employee's account.
    pub fn account(&self, matricule: &str) -> EngineResult<LeaveAccount> {
        let handle = self.handle(matricule)?;
        let account = handle.lock().map_err(|_| poisoned())?;
        Ok(account.clone())
    }

    /// Consumes one leave day for a day classified as leave.
    ///
    /// Returns the new balance, floored at zero.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidEmployee`] if the matricule has no account.
    pub fn record_leave_day(&self, matricule: &str) -> EngineResult<Decimal> {
        let handle = self.handle(matricule)?;
        let mut account = handle.lock().map_err(|_| poisoned())?;
        account.balance = consume_one_leave_day(account.balance);
        debug!(matricule, balance = %account.balance, "Leave day recorded");
        Ok(account.balance)
    }

    /// Applies any accrual due up to `as_of`.
    ///
    /// Idempotent within a month: a second call with the same `as_of`
    /// credits nothing.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidEmployee`] if the matricule has no account.
    pub fn accrue_if_due(&self, matricule: &str, as_of: YearMonth) -> EngineResult<LeaveAccrual> {
        let handle = self.handle(matricule)?;
        let mut account = handle.lock().map_err(|_| poisoned())?;
        let accrual = accrue(account.balance, account.anchor, as_of, &self.policy);
        account.balance = accrual.new_balance;
        account.anchor = Some(accrual.new_anchor);
        debug!(
            matricule,
            months = accrual.elapsed_months,
            balance = %accrual.new_balance,
            "Leave accrued"
        );
        Ok(accrual)
    }

    fn handle(&self, matricule: &str) -> EngineResult<Arc<Mutex<LeaveAccount>>> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts
            .get(matricule)
            .cloned()
            .ok_or_else(|| EngineError::InvalidEmployee {
                matricule: matricule.to_string(),
                field: "matricule".to_string(),
                message: "no leave account".to_string(),
            })
    }
}

fn poisoned() -> EngineError {
    EngineError::CalculationError {
        message: "leave ledger lock poisoned".to_string(),
    }
}
