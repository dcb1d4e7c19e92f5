// src/services/gosi.rs

use crate::{
    errors::AppResult,
    models::{GosiInput, GosiResult},
    services::ensure_amount,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Contributory wage ceiling in SAR.
pub const GOSI_SALARY_CAP: Decimal = dec!(45000);
pub const SAUDI_EMPLOYEE_RATE: Decimal = dec!(0.10);
pub const SAUDI_EMPLOYER_RATE: Decimal = dec!(0.12);
/// Occupational hazards branch, paid by the employer only.
pub const NON_SAUDI_EMPLOYER_RATE: Decimal = dec!(0.02);

pub struct GosiService;

impl GosiService {
    pub fn calculate(input: &GosiInput) -> AppResult<GosiResult> {
        ensure_amount("basic_salary", input.basic_salary)?;
        ensure_amount("housing_allowance", input.housing_allowance)?;

        let calculation_base = if input.gosi_applicable {
            (input.basic_salary + input.housing_allowance).min(GOSI_SALARY_CAP)
        } else {
            Decimal::ZERO
        };

        let is_saudi = input.nationality.is_saudi();
        let (employee_contribution, employer_contribution) = if is_saudi {
            (
                calculation_base * SAUDI_EMPLOYEE_RATE,
                calculation_base * SAUDI_EMPLOYER_RATE,
            )
        } else {
            (Decimal::ZERO, calculation_base * NON_SAUDI_EMPLOYER_RATE)
        };

        Ok(GosiResult {
            is_saudi,
            calculation_base,
            employee_contribution,
            employer_contribution,
            total_contribution: employee_contribution + employer_contribution,
        })
    }
}
