// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

pub fn default_working_days() -> u32 {
    30
}

// ─── Shared ───────────────────────────────────────────────────────────────────

/// Explicit nationality flag used for GOSI rules.
///
/// Deserializes from free text: "saudi", "saudi arabia" and "ksa" (any case,
/// surrounding whitespace ignored) map to `Saudi`, anything else to `NonSaudi`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Nationality {
    Saudi,
    NonSaudi,
}

impl Nationality {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "saudi" | "saudi arabia" | "ksa" => Nationality::Saudi,
            _ => Nationality::NonSaudi,
        }
    }

    pub fn is_saudi(self) -> bool {
        self == Nationality::Saudi
    }
}

impl<'de> Deserialize<'de> for Nationality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Nationality::from_label(&label))
    }
}

/// Non-blocking informational notice attached to a calculation result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Advisory {
    pub code: String,
    pub message: String,
}

impl Advisory {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

// ─── EOSB ─────────────────────────────────────────────────────────────────────

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "termination_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TerminationType {
    Resignation,
    TerminationWithCause,
    TerminationWithoutCause,
    ContractEnd,
    Retirement,
    Death,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "eosb_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EosbStatus {
    Calculated,
    Approved,
    Paid,
}

impl EosbStatus {
    pub fn next(self) -> Option<Self> {
        match self {
            EosbStatus::Calculated => Some(EosbStatus::Approved),
            EosbStatus::Approved => Some(EosbStatus::Paid),
            EosbStatus::Paid => None,
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EosbStatus::Calculated => "calculated",
            EosbStatus::Approved => "approved",
            EosbStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for EosbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EosbInput {
    /// Required; the request is rejected when it is missing.
    pub hire_date: Option<NaiveDate>,
    pub termination_date: NaiveDate,
    pub termination_type: TerminationType,
    pub last_basic_salary: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    #[serde(default)]
    pub include_housing_allowance: bool,
    #[serde(default)]
    pub deductions: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct EosbResult {
    pub years_of_service: u32,
    pub months_of_service: u32,
    pub days_of_service: u32,
    pub total_days_of_service: u32,
    pub calculation_base: Decimal,
    pub eosb_amount_0_to_5: Decimal,
    pub eosb_amount_5_to_10: Decimal,
    pub eosb_amount_above_10: Decimal,
    /// Proportional amount for the months and days past the last full year
    pub partial_year_amount: Decimal,
    pub total_eosb_amount: Decimal,
    pub deductions: Decimal,
    pub net_eosb_amount: Decimal,
    pub status: EosbStatus,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEosbRecordRequest {
    pub employee_id: Uuid,
    #[serde(flatten)]
    pub input: EosbInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct EosbRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub hire_date: NaiveDate,
    pub termination_date: NaiveDate,
    // sqlx: custom enum columns map through the derived sqlx::Type
    pub termination_type: TerminationType,
    pub years_of_service: i32,
    pub months_of_service: i32,
    pub days_of_service: i32,
    pub calculation_base: Decimal,
    pub eosb_amount_0_to_5: Decimal,
    pub eosb_amount_5_to_10: Decimal,
    pub eosb_amount_above_10: Decimal,
    pub partial_year_amount: Decimal,
    pub total_eosb_amount: Decimal,
    pub deductions: Decimal,
    pub net_eosb_amount: Decimal,
    pub status: EosbStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEosbStatusRequest {
    pub status: EosbStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EosbRecordQuery {
    pub employee_id: Option<Uuid>,
}

// ─── GOSI ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GosiInput {
    pub basic_salary: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    pub nationality: Nationality,
    #[serde(default = "default_true")]
    pub gosi_applicable: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct GosiResult {
    pub is_saudi: bool,
    pub calculation_base: Decimal,
    pub employee_contribution: Decimal,
    pub employer_contribution: Decimal,
    pub total_contribution: Decimal,
}

// ─── Overtime ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OvertimeInput {
    pub basic_salary: Decimal,
    pub overtime_hours: Decimal,
    #[serde(default = "default_working_days")]
    pub working_days_in_month: u32,
    /// Overtime already logged earlier in the same month
    #[serde(default)]
    pub month_to_date_hours: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct OvertimeResult {
    pub hourly_rate: Decimal,
    pub overtime_rate: Decimal,
    pub overtime_pay: Decimal,
    pub total_hours: Decimal,
    pub advisories: Vec<Advisory>,
}

// ─── Payroll ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "payroll_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    Draft,
    Calculated,
    Approved,
    Processed,
    Paid,
}

impl PayrollStatus {
    pub fn next(self) -> Option<Self> {
        match self {
            PayrollStatus::Draft => Some(PayrollStatus::Calculated),
            PayrollStatus::Calculated => Some(PayrollStatus::Approved),
            PayrollStatus::Approved => Some(PayrollStatus::Processed),
            PayrollStatus::Processed => Some(PayrollStatus::Paid),
            PayrollStatus::Paid => None,
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PayrollStatus::Draft => "draft",
            PayrollStatus::Calculated => "calculated",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Processed => "processed",
            PayrollStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PayrollInput {
    /// Format: "YYYY-MM"
    pub pay_period: String,
    pub basic_salary: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    #[serde(default)]
    pub transport_allowance: Decimal,
    #[serde(default)]
    pub other_allowances: Decimal,
    pub nationality: Nationality,
    #[serde(default = "default_true")]
    pub gosi_applicable: bool,
    #[serde(default)]
    pub overtime_hours: Decimal,
    #[serde(default = "default_working_days")]
    pub working_days_in_month: u32,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub loan_deduction: Decimal,
    #[serde(default)]
    pub absent_days: Decimal,
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// Every money line is already rounded to 2 decimal places.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PayrollCalculation {
    pub pay_period: String,
    pub basic_salary: Decimal,
    pub housing_allowance: Decimal,
    pub transport_allowance: Decimal,
    pub other_allowances: Decimal,
    pub overtime_hours: Decimal,
    pub overtime_pay: Decimal,
    pub bonus: Decimal,
    pub gross_salary: Decimal,
    pub gosi_employee: Decimal,
    pub gosi_employer: Decimal,
    pub loan_deduction: Decimal,
    pub absence_deduction: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePayrollRecordRequest {
    pub employee_id: Uuid,
    #[serde(flatten)]
    pub input: PayrollInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub pay_period: String,
    pub basic_salary: Decimal,
    pub housing_allowance: Decimal,
    pub transport_allowance: Decimal,
    pub other_allowances: Decimal,
    pub overtime_hours: Decimal,
    pub overtime_pay: Decimal,
    pub bonus: Decimal,
    pub gross_salary: Decimal,
    pub gosi_employee: Decimal,
    pub gosi_employer: Decimal,
    pub loan_deduction: Decimal,
    pub absence_deduction: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePayrollStatusRequest {
    pub status: PayrollStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayrollRecordQuery {
    pub employee_id: Option<Uuid>,
    /// Format: "YYYY-MM"
    pub pay_period: Option<String>,
}

// ─── Documents ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DocumentExpiryRequest {
    pub iqama_expiry: Option<NaiveDate>,
    pub passport_expiry: Option<NaiveDate>,
    /// Defaults to today (UTC)
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentExpiryResponse {
    pub as_of: NaiveDate,
    pub warning_window_days: i64,
    pub advisories: Vec<Advisory>,
}
