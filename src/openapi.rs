// src/openapi.rs

use crate::models::{
    Advisory, CreateEosbRecordRequest, CreatePayrollRecordRequest, DocumentExpiryRequest,
    DocumentExpiryResponse, EosbInput, EosbRecord, EosbResult, EosbStatus, GosiInput, GosiResult,
    Nationality, OvertimeInput, OvertimeResult, PayrollCalculation, PayrollInput, PayrollRecord,
    PayrollStatus, TerminationType, UpdateEosbStatusRequest, UpdatePayrollStatusRequest,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Payroll API",
        version = "1.0.0",
        description = "End-of-service benefit, GOSI, overtime and payroll calculations \
            under Saudi labor rules, with persisted EOSB and payroll records that move \
            through one-way approval lifecycles. All amounts are in SAR.",
        license(name = "MIT")
    ),
    paths(
        // Calculations
        crate::handlers::calculations::calculate_eosb,
        crate::handlers::calculations::calculate_gosi,
        crate::handlers::calculations::calculate_overtime,
        crate::handlers::calculations::calculate_payroll,
        crate::handlers::calculations::check_document_expiry,
        // EOSB
        crate::handlers::eosb::create_eosb_record,
        crate::handlers::eosb::list_eosb_records,
        crate::handlers::eosb::get_eosb_record,
        crate::handlers::eosb::update_eosb_status,
        // Payroll
        crate::handlers::payroll::create_payroll_record,
        crate::handlers::payroll::list_payroll_records,
        crate::handlers::payroll::get_payroll_record,
        crate::handlers::payroll::update_payroll_status,
    ),
    components(
        schemas(
            Advisory, Nationality,
            EosbInput, EosbResult, EosbStatus, TerminationType,
            CreateEosbRecordRequest, EosbRecord, UpdateEosbStatusRequest,
            GosiInput, GosiResult,
            OvertimeInput, OvertimeResult,
            PayrollInput, PayrollCalculation, PayrollStatus,
            CreatePayrollRecordRequest, PayrollRecord, UpdatePayrollStatusRequest,
            DocumentExpiryRequest, DocumentExpiryResponse,
        )
    ),
    tags(
        (name = "Calculations", description = "Stateless EOSB, GOSI, overtime and payroll calculators"),
        (name = "EOSB", description = "Save end-of-service benefits and move them to approved and paid"),
        (name = "Payroll", description = "Save monthly payroll and move it through approval to payment"),
    )
)]
pub struct ApiDoc;
