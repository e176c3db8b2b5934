//! Integration tests for the payroll engine.
//!
//! This test suite drives whole batches through the public API:
//! - The reference scenario (20 days present, 2 absent)
//! - Eligibility gating and unparsable hire dates
//! - Partial failure and skipped records
//! - Period validation
//! - Configuration loaded from YAML
//! - Leave ledger alongside a batch

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde_json::json;

use payroll_engine::calculation::days_in_month;
use payroll_engine::config::{ConfigLoader, LeaveConfig, PayrollConfig};
use payroll_engine::directory::{LeaveLedgerService, InMemoryDirectory};
use payroll_engine::engine::{BatchRequest, PayrollEngine};
use payroll_engine::error::EngineError;
use payroll_engine::models::{AttendanceCode, EmployeeRecord, ManualAdjustment, YearMonth};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn as_of() -> NaiveDate {
    date(2026, 3, 31)
}

fn march_request() -> BatchRequest {
    BatchRequest::new(2026, 3).with_as_of(as_of())
}

/// Monday to Friday dates of a month, in order.
fn business_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .map(|d| date(year, month, d))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

fn create_test_employee(matricule: &str, base_salary: &str, hire_date: NaiveDate) -> EmployeeRecord {
    let mut employee = EmployeeRecord::new(matricule, decimal(base_salary));
    employee.nom = "Rakoto".to_string();
    employee.prenom = "Hery".to_string();
    employee.team = "Equipe A".to_string();
    employee.hire_date = Some(hire_date);
    employee
}

/// 20 business days present, the last 2 absent.
fn code_reference_month(directory: &mut InMemoryDirectory, matricule: &str) {
    let dates = business_dates(2026, 3);
    assert_eq!(dates.len(), 22);
    directory.set_codes(matricule, dates[..20].iter().copied(), AttendanceCode::Present);
    directory.set_codes(matricule, dates[20..].iter().copied(), AttendanceCode::Absent);
}

fn create_engine(directory: InMemoryDirectory) -> PayrollEngine {
    PayrollEngine::from_directory(Arc::new(directory), PayrollConfig::default()).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("payroll-engine-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

// =============================================================================
// Reference Scenario
// =============================================================================

#[test]
fn test_reference_scenario_end_to_end() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    code_reference_month(&mut directory, "M001");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    assert_eq!(batch.error_count, 0);
    assert_eq!(batch.meta.working_days_used, 22);
    assert_eq!(batch.meta.period, YearMonth::new(2026, 3).unwrap());

    let row = batch.row("M001").unwrap();
    assert!(row.eligible);
    assert_eq!(row.seniority_years, 2);
    assert_eq!(row.hours.presence, decimal("160"));
    assert_eq!(row.hours.absence, decimal("16"));
    assert_eq!(row.hours_theoretical, decimal("176"));
    assert_eq!(row.hourly_rate, decimal("4545.45"));
    assert_eq!(row.absence_deduction, decimal("72727"));
    assert_eq!(row.worked_base, decimal("727273"));
    assert_eq!(row.meal_allowance, decimal("50000"));
    assert_eq!(row.transport_allowance, decimal("24000"));
    assert_eq!(row.gross, decimal("801273"));
    assert_eq!(row.social_security_deduction, decimal("8013"));
    assert_eq!(row.cnaps_deduction, decimal("8013"));
    assert_eq!(row.social_contribution, decimal("15000"));
    assert_eq!(row.tax, decimal("67755"));
    assert_eq!(row.net, decimal("702493"));
    assert_eq!(row.percent_presence, decimal("91"));

    assert_eq!(batch.totals.gross, decimal("801273"));
    assert_eq!(batch.totals.net, decimal("702493"));
}

#[test]
fn test_reference_scenario_audit_trace() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    code_reference_month(&mut directory, "M001");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    let trace = &batch.row("M001").unwrap().audit_trace;

    assert_eq!(trace.steps.len(), 7);
    assert!(trace.warnings.is_empty());
    let tax_step = trace
        .steps
        .iter()
        .find(|s| s.rule_id == "income_tax")
        .unwrap();
    assert_eq!(tax_step.output["minimum_applied"], false);
    assert_eq!(tax_step.output["tranches"].as_array().unwrap().len(), 5);
}

#[test]
fn test_batch_result_serializes_to_json() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    code_reference_month(&mut directory, "M001");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    let json = serde_json::to_value(&batch).unwrap();

    assert_eq!(json["meta"]["period"], "2026-03");
    assert_eq!(json["meta"]["working_days_used"], 22);
    assert_eq!(json["totals"]["gross"], "801273");
    assert_eq!(json["rows"][0]["matricule"], "M001");
    assert_eq!(json["rows"][0]["hours"]["absence"], "16");
}

// =============================================================================
// Eligibility
// =============================================================================

#[test]
fn test_unparsable_hire_date_yields_ineligible_row() {
    let employee: EmployeeRecord = serde_json::from_value(json!({
        "matricule": "M002",
        "nom": "Rabe",
        "base_salary": "800000",
        "hire_date": "sometime last spring"
    }))
    .unwrap();
    assert!(employee.hire_date.is_none());

    let mut directory = InMemoryDirectory::new();
    directory.add_employee(employee);
    code_reference_month(&mut directory, "M002");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    assert_eq!(batch.error_count, 0);

    let row = batch.row("M002").unwrap();
    assert!(!row.eligible);
    assert_eq!(row.seniority_years, 0);
    assert_eq!(row.meal_allowance, Decimal::ZERO);
    assert_eq!(row.transport_allowance, Decimal::ZERO);
    assert_eq!(row.tax, Decimal::ZERO);
    assert_eq!(row.social_security_deduction, Decimal::ZERO);
    assert!(
        row.audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "HIRE_DATE_MISSING")
    );
}

#[test]
fn test_new_hire_pays_no_tax_or_contributions() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M003", "500000", date(2025, 9, 1)));
    code_reference_month(&mut directory, "M003");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    let row = batch.row("M003").unwrap();
    assert!(!row.eligible);
    assert_eq!(row.tax, Decimal::ZERO);
    assert_eq!(row.cnaps_deduction, Decimal::ZERO);
    assert_eq!(row.social_contribution, decimal("15000"));
}

#[test]
fn test_as_of_moves_eligibility() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M004", "500000", date(2025, 3, 15)));
    let engine = create_engine(directory);

    let before = engine
        .compute_batch(&BatchRequest::new(2026, 3).with_as_of(date(2026, 3, 15)))
        .unwrap();
    let after = engine
        .compute_batch(&BatchRequest::new(2026, 3).with_as_of(date(2026, 3, 17)))
        .unwrap();

    assert!(!before.rows[0].eligible);
    assert!(after.rows[0].eligible);
}

// =============================================================================
// Adjustments
// =============================================================================

#[test]
fn test_adjustments_from_json_with_malformed_fields() {
    let adjustment: ManualAdjustment = serde_json::from_value(json!({
        "production_bonus": "12000",
        "attendance_bonus": "n/a",
        "advance": 30000,
        "social_override": "5000"
    }))
    .unwrap();
    assert_eq!(adjustment.attendance_bonus, Decimal::ZERO);

    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M005", "300000", date(2020, 1, 1)));
    directory.set_adjustment("M005", YearMonth::new(2026, 3).unwrap(), adjustment);

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    let row = batch.row("M005").unwrap();
    assert_eq!(row.production_bonus, decimal("12000"));
    assert_eq!(row.advance, decimal("30000"));
    assert_eq!(row.social_contribution, decimal("5000"));
    // 312000 gross, minimum tax, 1% twice
    assert_eq!(row.gross, decimal("312000"));
    assert_eq!(row.tax, decimal("2000"));
    assert_eq!(row.net, decimal("268760"));
}

// =============================================================================
// Partial Failure
// =============================================================================

#[test]
fn test_partial_failure_keeps_other_rows() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    directory.add_employee(create_test_employee("BAD", "-100", date(2024, 3, 31)));
    directory.add_employee(EmployeeRecord::new("   ", decimal("100000")));
    directory.add_employee(create_test_employee("M002", "400000", date(2019, 5, 2)));
    code_reference_month(&mut directory, "M001");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();

    assert_eq!(batch.rows.len(), 2);
    assert_eq!(batch.error_count, 1);
    assert_eq!(batch.skipped_count, 1);
    assert_eq!(batch.failures[0].matricule, "BAD");
    assert!(batch.row("BAD").is_none());

    let expected_gross: Decimal = batch.rows.iter().map(|r| r.gross).sum();
    assert_eq!(batch.totals.gross, expected_gross);
}

// =============================================================================
// Period Validation
// =============================================================================

#[test]
fn test_invalid_month_is_rejected_before_any_work() {
    let engine = create_engine(InMemoryDirectory::new());
    let err = engine
        .compute_batch(&BatchRequest::new(2026, 13))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPeriod { .. }));
    assert!(err.to_string().contains("month 13"));
}

#[test]
fn test_working_days_out_of_range_are_rejected() {
    let engine = create_engine(InMemoryDirectory::new());
    for days in [0, 32] {
        let result = engine.compute_batch(&march_request().with_working_days(days));
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }
}

#[test]
fn test_explicit_working_days_change_hourly_rate() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    let batch = create_engine(directory)
        .compute_batch(&march_request().with_working_days(25))
        .unwrap();

    assert_eq!(batch.meta.working_days_used, 25);
    assert_eq!(batch.rows[0].hours_theoretical, decimal("200"));
    assert_eq!(batch.rows[0].hourly_rate, decimal("4000"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_shipped_configuration_reproduces_reference_scenario() {
    let config = ConfigLoader::load("./config/default").unwrap().into_config();
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    code_reference_month(&mut directory, "M001");

    let engine = PayrollEngine::from_directory(Arc::new(directory), config).unwrap();
    let batch = engine.compute_batch(&march_request()).unwrap();
    assert_eq!(batch.rows[0].net, decimal("702493"));
}

#[test]
fn test_custom_yaml_policy() {
    let dir = scratch_dir("custom-policy");
    fs::write(
        dir.join("payroll.yaml"),
        "rates:\n  meal_allowance_per_day: \"3000\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("tax.yaml"),
        "brackets:\n  - lower: \"0\"\n    rate: \"0\"\nminimum_liability: \"0\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load(&dir).unwrap().into_config();
    fs::remove_dir_all(&dir).ok();
    assert_eq!(config.rates.meal_allowance_per_day, decimal("3000"));
    assert_eq!(config.rates.transport_allowance_per_day, decimal("1200"));

    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "800000", date(2024, 3, 31)));
    code_reference_month(&mut directory, "M001");

    let batch = PayrollEngine::from_directory(Arc::new(directory), config)
        .unwrap()
        .compute_batch(&march_request())
        .unwrap();
    let row = &batch.rows[0];
    assert_eq!(row.meal_allowance, decimal("60000"));
    assert_eq!(row.tax, Decimal::ZERO);
}

#[test]
fn test_invalid_yaml_policy_is_rejected() {
    let dir = scratch_dir("invalid-policy");
    fs::write(dir.join("payroll.yaml"), "schedule:\n  hours_per_day: \"0\"\n").unwrap();
    fs::write(
        dir.join("tax.yaml"),
        "brackets:\n  - lower: \"0\"\n    rate: \"0\"\n",
    )
    .unwrap();

    let result = ConfigLoader::load(&dir);
    fs::remove_dir_all(&dir).ok();
    assert!(matches!(result, Err(EngineError::ConfigInvalid { .. })));
}

// =============================================================================
// Leave Ledger
// =============================================================================

#[test]
fn test_leave_days_consume_balance_seeded_from_directory() {
    let mut employee = create_test_employee("M001", "800000", date(2024, 3, 31));
    employee.leave_balance = decimal("1.5");
    employee.leave_balance_anchor = Some(YearMonth::new(2026, 2).unwrap());

    let ledger = LeaveLedgerService::from_employees(LeaveConfig::default(), [&employee]).unwrap();

    let accrual = ledger
        .accrue_if_due("M001", YearMonth::new(2026, 3).unwrap())
        .unwrap();
    assert_eq!(accrual.new_balance, decimal("4"));

    for _ in 0..5 {
        ledger.record_leave_day("M001").unwrap();
    }
    assert_eq!(ledger.account("M001").unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_out_of_range_anchor_bootstraps_instead_of_overflowing() {
    let employee: EmployeeRecord = serde_json::from_value(json!({
        "matricule": "M009",
        "base_salary": "500000",
        "leave_balance": "0",
        "leave_balance_anchor": "999999999-01"
    }))
    .unwrap();
    assert!(employee.leave_balance_anchor.is_none());

    let ledger = LeaveLedgerService::from_employees(LeaveConfig::default(), [&employee]).unwrap();
    let accrual = ledger
        .accrue_if_due("M009", YearMonth::new(2026, 3).unwrap())
        .unwrap();
    assert_eq!(accrual.new_balance, decimal("7.5"));
    assert_eq!(accrual.new_anchor, YearMonth::new(2026, 3).unwrap());
}

#[test]
fn test_two_digit_year_hire_date_is_ineligible() {
    let employee: EmployeeRecord = serde_json::from_value(json!({
        "matricule": "M010",
        "base_salary": "800000",
        "hire_date": "15/03/21"
    }))
    .unwrap();
    assert!(employee.hire_date.is_none());

    let mut directory = InMemoryDirectory::new();
    directory.add_employee(employee);
    code_reference_month(&mut directory, "M010");

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    assert!(!batch.row("M010").unwrap().eligible);
}

#[test]
fn test_leave_days_are_paid_at_hourly_rate() {
    let mut directory = InMemoryDirectory::new();
    directory.add_employee(create_test_employee("M001", "352000", date(2024, 3, 31)));
    let dates = business_dates(2026, 3);
    directory.set_codes("M001", dates[..2].iter().copied(), AttendanceCode::Leave);

    let batch = create_engine(directory).compute_batch(&march_request()).unwrap();
    let row = &batch.rows[0];
    assert_eq!(row.hours.leave, decimal("16"));
    assert_eq!(row.leave_allowance, decimal("32000"));
}
