pub mod documents;
pub mod eosb;
pub mod gosi;
pub mod overtime;
pub mod payroll;
pub mod store;

use crate::errors::{AppError, AppResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest money input any calculator accepts.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);
/// Hours in a 31-day month.
pub const MAX_MONTHLY_HOURS: Decimal = dec!(744);

/// Reject money inputs outside `0..=MAX_AMOUNT`.
pub fn ensure_amount(name: &str, value: Decimal) -> AppResult<()> {
    ensure_within(name, value, MAX_AMOUNT)
}

/// Reject hour counts outside `0..=MAX_MONTHLY_HOURS`.
pub fn ensure_hours(name: &str, value: Decimal) -> AppResult<()> {
    ensure_within(name, value, MAX_MONTHLY_HOURS)
}

fn ensure_within(name: &str, value: Decimal, max: Decimal) -> AppResult<()> {
    if value < Decimal::ZERO {
        Err(AppError::Validation(format!("{name} cannot be negative")))
    } else if value > max {
        Err(AppError::Validation(format!("{name} cannot exceed {max}")))
    } else {
        Ok(())
    }
}
