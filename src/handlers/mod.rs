pub mod calculations;
pub mod eosb;
pub mod general;
pub mod payroll;
