// src/services/overtime.rs

use crate::{
    errors::{AppError, AppResult},
    models::{Advisory, OvertimeInput, OvertimeResult},
    services::{ensure_amount, ensure_hours},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

pub const HOURS_PER_DAY: Decimal = dec!(8);
pub const OVERTIME_MULTIPLIER: Decimal = dec!(1.5);
/// Monthly overtime above this many hours raises an advisory.
pub const MONTHLY_OVERTIME_LIMIT_HOURS: Decimal = dec!(60);

pub struct OvertimeService;

impl OvertimeService {
    /// Rates keep full precision so `overtime_rate == hourly_rate * 1.5` holds
    /// exactly; round at the point of display or persistence.
    pub fn calculate(input: &OvertimeInput) -> AppResult<OvertimeResult> {
        if input.working_days_in_month == 0 {
            return Err(AppError::Validation(
                "working_days_in_month must be greater than zero".to_string(),
            ));
        }
        ensure_amount("basic_salary", input.basic_salary)?;
        ensure_hours("overtime_hours", input.overtime_hours)?;
        ensure_hours("month_to_date_hours", input.month_to_date_hours)?;

        let hourly_rate =
            input.basic_salary / (Decimal::from(input.working_days_in_month) * HOURS_PER_DAY);
        let overtime_rate = hourly_rate * OVERTIME_MULTIPLIER;
        let overtime_pay = input.overtime_hours * overtime_rate;
        let total_hours = input.month_to_date_hours + input.overtime_hours;

        let mut advisories = Vec::new();
        if total_hours > MONTHLY_OVERTIME_LIMIT_HOURS {
            warn!(
                "Monthly overtime of {} hours exceeds the {} hour policy limit",
                total_hours, MONTHLY_OVERTIME_LIMIT_HOURS
            );
            advisories.push(Advisory::new(
                "overtime_limit_exceeded",
                format!(
                    "Monthly overtime of {} hours exceeds the {} hour limit",
                    total_hours.normalize(),
                    MONTHLY_OVERTIME_LIMIT_HOURS
                ),
            ));
        }

        Ok(OvertimeResult {
            hourly_rate,
            overtime_rate,
            overtime_pay,
            total_hours,
            advisories,
        })
    }
}
