// src/services/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        GosiInput, OvertimeInput, PayrollCalculation, PayrollInput, PayrollRecord, PayrollStatus,
    },
    services::{ensure_amount, gosi::GosiService, overtime::OvertimeService},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Largest value a stored payroll line can hold (`NUMERIC(14, 2)`).
pub const MAX_PAYROLL_LINE: Decimal = dec!(999999999999.99);

pub struct PayrollService;

/// Round a money line to halalas.
pub fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Accepts "YYYY-MM" only.
pub fn validate_pay_period(pay_period: &str) -> AppResult<()> {
    let well_formed = pay_period.len() == 7
        && NaiveDate::parse_from_str(&format!("{pay_period}-01"), "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Pay period '{pay_period}' must use the YYYY-MM format"
        )))
    }
}

impl PayrollService {
    /// Calculate one employee's monthly payroll, pulling overtime pay and the
    /// employee GOSI share from their calculators.
    pub fn calculate(input: &PayrollInput) -> AppResult<PayrollCalculation> {
        validate_pay_period(&input.pay_period)?;

        for (name, value) in [
            ("basic_salary", input.basic_salary),
            ("housing_allowance", input.housing_allowance),
            ("transport_allowance", input.transport_allowance),
            ("other_allowances", input.other_allowances),
            ("bonus", input.bonus),
            ("loan_deduction", input.loan_deduction),
            ("other_deductions", input.other_deductions),
        ] {
            ensure_amount(name, value)?;
        }
        if input.absent_days < Decimal::ZERO {
            return Err(AppError::Validation(
                "absent_days cannot be negative".to_string(),
            ));
        }
        if input.absent_days > Decimal::from(input.working_days_in_month) {
            return Err(AppError::Validation(
                "absent_days cannot exceed working_days_in_month".to_string(),
            ));
        }

        let overtime = OvertimeService::calculate(&OvertimeInput {
            basic_salary: input.basic_salary,
            overtime_hours: input.overtime_hours,
            working_days_in_month: input.working_days_in_month,
            month_to_date_hours: Decimal::ZERO,
        })?;

        let gosi = GosiService::calculate(&GosiInput {
            basic_salary: input.basic_salary,
            housing_allowance: input.housing_allowance,
            nationality: input.nationality,
            gosi_applicable: input.gosi_applicable,
        })?;

        let daily_rate = input.basic_salary / Decimal::from(input.working_days_in_month);

        let basic_salary = money(input.basic_salary);
        let housing_allowance = money(input.housing_allowance);
        let transport_allowance = money(input.transport_allowance);
        let other_allowances = money(input.other_allowances);
        let overtime_pay = money(overtime.overtime_pay);
        let bonus = money(input.bonus);

        let gosi_employee = money(gosi.employee_contribution);
        let gosi_employer = money(gosi.employer_contribution);
        let loan_deduction = money(input.loan_deduction);
        let absence_deduction = money(daily_rate * input.absent_days);
        let other_deductions = money(input.other_deductions);

        let gross_salary = basic_salary
            + housing_allowance
            + transport_allowance
            + other_allowances
            + overtime_pay
            + bonus;

        let total_deductions = gosi_employee + loan_deduction + absence_deduction + other_deductions;

        if gross_salary > MAX_PAYROLL_LINE || total_deductions > MAX_PAYROLL_LINE {
            return Err(AppError::Validation(format!(
                "Payroll totals cannot exceed {MAX_PAYROLL_LINE}"
            )));
        }

        let net_salary = gross_salary - total_deductions;

        Ok(PayrollCalculation {
            pay_period: input.pay_period.clone(),
            basic_salary,
            housing_allowance,
            transport_allowance,
            other_allowances,
            overtime_hours: input.overtime_hours,
            overtime_pay,
            bonus,
            gross_salary,
            gosi_employee,
            gosi_employer,
            loan_deduction,
            absence_deduction,
            other_deductions,
            total_deductions,
            net_salary,
            advisories: overtime.advisories,
        })
    }

    pub fn new_record(employee_id: Uuid, calc: PayrollCalculation) -> PayrollRecord {
        let now = Utc::now();
        PayrollRecord {
            id: Uuid::new_v4(),
            employee_id,
            pay_period: calc.pay_period,
            basic_salary: calc.basic_salary,
            housing_allowance: calc.housing_allowance,
            transport_allowance: calc.transport_allowance,
            other_allowances: calc.other_allowances,
            overtime_hours: calc.overtime_hours,
            overtime_pay: calc.overtime_pay,
            bonus: calc.bonus,
            gross_salary: calc.gross_salary,
            gosi_employee: calc.gosi_employee,
            gosi_employer: calc.gosi_employer,
            loan_deduction: calc.loan_deduction,
            absence_deduction: calc.absence_deduction,
            other_deductions: calc.other_deductions,
            total_deductions: calc.total_deductions,
            net_salary: calc.net_salary,
            status: PayrollStatus::Calculated,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_transition(from: PayrollStatus, to: PayrollStatus) -> AppResult<()> {
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(AppError::InvalidStatusTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}
