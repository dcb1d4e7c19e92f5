// src/services/documents.rs

use crate::models::Advisory;
use chrono::NaiveDate;

/// Expiry notices for an employee's iqama and passport. Never blocking.
pub fn expiry_advisories(
    iqama_expiry: Option<NaiveDate>,
    passport_expiry: Option<NaiveDate>,
    as_of: NaiveDate,
    warning_window_days: i64,
) -> Vec<Advisory> {
    [("iqama", iqama_expiry), ("passport", passport_expiry)]
        .into_iter()
        .filter_map(|(document, expiry)| {
            let expiry = expiry?;
            let days_left = (expiry - as_of).num_days();
            if days_left < 0 {
                Some(Advisory::new(
                    &format!("{document}_expired"),
                    format!("The {document} expired on {expiry}"),
                ))
            } else if days_left <= warning_window_days {
                Some(Advisory::new(
                    &format!("{document}_expiring"),
                    format!("The {document} expires on {expiry} ({days_left} days left)"),
                ))
            } else {
                None
            }
        })
        .collect()
}
