// src/services/eosb.rs

use crate::{
    errors::{AppError, AppResult},
    models::{Advisory, EosbInput, EosbRecord, EosbResult, EosbStatus, TerminationType},
    services::ensure_amount,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use uuid::Uuid;

/// Service length in the simplified form used for EOSB: 365-day years and
/// 30-day months, no leap-year or calendar-month awareness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDuration {
    pub total_days: u32,
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl ServiceDuration {
    pub fn between(hire_date: NaiveDate, termination_date: NaiveDate) -> AppResult<Self> {
        if termination_date <= hire_date {
            return Err(AppError::Validation(
                "Termination date must be after hire date".to_string(),
            ));
        }

        let total_days = u32::try_from((termination_date - hire_date).num_days())
            .map_err(|_| AppError::Validation("Service duration is out of range".to_string()))?;
        let remaining = total_days % 365;

        Ok(Self {
            total_days,
            years: total_days / 365,
            months: remaining / 30,
            days: remaining % 30,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Bands {
    first_five: Decimal,
    five_to_ten: Decimal,
    above_ten: Decimal,
}

impl Bands {
    fn total(&self) -> Decimal {
        self.first_five + self.five_to_ten + self.above_ten
    }
}

pub struct EosbService;

impl EosbService {
    /// Calculate the end-of-service benefit under the Saudi labor law tiers.
    pub fn calculate(input: &EosbInput) -> AppResult<EosbResult> {
        let hire_date = input.hire_date.ok_or_else(|| {
            AppError::Validation("Hire date is required to calculate EOSB".to_string())
        })?;

        ensure_amount("last_basic_salary", input.last_basic_salary)?;
        ensure_amount("housing_allowance", input.housing_allowance)?;
        ensure_amount("deductions", input.deductions)?;

        let service = ServiceDuration::between(hire_date, input.termination_date)?;

        let calculation_base = if input.include_housing_allowance {
            input.last_basic_salary + input.housing_allowance
        } else {
            input.last_basic_salary
        };

        let resignation = input.termination_type == TerminationType::Resignation;
        let bands = if resignation {
            resignation_bands(service.years, calculation_base)
        } else {
            full_entitlement_bands(service.years, calculation_base)
        };

        let partial_year_amount = partial_year(&service, calculation_base, resignation);
        let total_eosb_amount = bands.total() + partial_year_amount;
        let net_eosb_amount = total_eosb_amount - input.deductions;

        let mut advisories = Vec::new();
        if resignation && service.years < 2 {
            advisories.push(Advisory::new(
                "no_entitlement",
                "Resignation before two years of service carries no end-of-service benefit",
            ));
        }
        if input.deductions > total_eosb_amount {
            advisories.push(Advisory::new(
                "deductions_exceed_entitlement",
                format!(
                    "Deductions of {} exceed the EOSB entitlement of {}",
                    input.deductions,
                    total_eosb_amount.round_dp(2)
                ),
            ));
        }

        debug!(
            "EOSB for {:?}: {}y {}m {}d on base {} -> total {}",
            input.termination_type,
            service.years,
            service.months,
            service.days,
            calculation_base,
            total_eosb_amount
        );

        Ok(EosbResult {
            years_of_service: service.years,
            months_of_service: service.months,
            days_of_service: service.days,
            total_days_of_service: service.total_days,
            calculation_base,
            eosb_amount_0_to_5: bands.first_five,
            eosb_amount_5_to_10: bands.five_to_ten,
            eosb_amount_above_10: bands.above_ten,
            partial_year_amount,
            total_eosb_amount,
            deductions: input.deductions,
            net_eosb_amount,
            status: EosbStatus::Calculated,
            advisories,
        })
    }

    pub fn new_record(
        employee_id: Uuid,
        input: &EosbInput,
        result: &EosbResult,
    ) -> AppResult<EosbRecord> {
        let hire_date = input.hire_date.ok_or_else(|| {
            AppError::Validation("Hire date is required to record EOSB".to_string())
        })?;
        let as_i32 = |value: u32| {
            i32::try_from(value)
                .map_err(|_| AppError::Internal(format!("service length {value} out of range")))
        };

        let now = Utc::now();
        Ok(EosbRecord {
            id: Uuid::new_v4(),
            employee_id,
            hire_date,
            termination_date: input.termination_date,
            termination_type: input.termination_type,
            years_of_service: as_i32(result.years_of_service)?,
            months_of_service: as_i32(result.months_of_service)?,
            days_of_service: as_i32(result.days_of_service)?,
            calculation_base: result.calculation_base,
            eosb_amount_0_to_5: result.eosb_amount_0_to_5,
            eosb_amount_5_to_10: result.eosb_amount_5_to_10,
            eosb_amount_above_10: result.eosb_amount_above_10,
            partial_year_amount: result.partial_year_amount,
            total_eosb_amount: result.total_eosb_amount,
            deductions: result.deductions,
            net_eosb_amount: result.net_eosb_amount,
            status: result.status,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn ensure_transition(from: EosbStatus, to: EosbStatus) -> AppResult<()> {
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

/// Half a month per year for the first five years, a full month after that;
/// nothing below two years.
fn resignation_bands(years: u32, base: Decimal) -> Bands {
    let half = base / dec!(2);
    let years = Decimal::from(years);

    if years < dec!(2) {
        Bands::default()
    } else if years < dec!(5) {
        Bands {
            first_five: years * half,
            ..Bands::default()
        }
    } else if years < dec!(10) {
        Bands {
            first_five: dec!(5) * half,
            five_to_ten: (years - dec!(5)) * base,
            ..Bands::default()
        }
    } else {
        Bands {
            first_five: dec!(5) * half,
            five_to_ten: dec!(5) * base,
            above_ten: (years - dec!(10)) * base,
        }
    }
}

fn full_entitlement_bands(years: u32, base: Decimal) -> Bands {
    let years = Decimal::from(years);

    if years <= dec!(5) {
        Bands {
            first_five: years * base,
            ..Bands::default()
        }
    } else if years <= dec!(10) {
        Bands {
            first_five: dec!(5) * base,
            five_to_ten: (years - dec!(5)) * base,
            ..Bands::default()
        }
    } else {
        Bands {
            first_five: dec!(5) * base,
            five_to_ten: dec!(5) * base,
            above_ten: (years - dec!(10)) * base,
        }
    }
}

fn partial_year(service: &ServiceDuration, base: Decimal, resignation: bool) -> Decimal {
    if resignation && service.years < 2 {
        return Decimal::ZERO;
    }

    let rate = if resignation && service.years < 5 {
        base / dec!(2)
    } else {
        base
    };
    let fraction =
        Decimal::from(service.months) / dec!(12) + Decimal::from(service.days) / dec!(365);

    fraction * rate
}
