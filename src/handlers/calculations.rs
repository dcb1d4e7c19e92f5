// src/handlers/calculations.rs

use crate::{
    errors::AppResult,
    models::{
        DocumentExpiryRequest, DocumentExpiryResponse, EosbInput, EosbResult, GosiInput,
        GosiResult, OvertimeInput, OvertimeResult, PayrollCalculation, PayrollInput,
    },
    services::{
        documents::expiry_advisories, eosb::EosbService, gosi::GosiService,
        overtime::OvertimeService, payroll::PayrollService,
    },
    state::AppState,
};
use axum::{Json, extract::State};
use chrono::Utc;

/// Calculate an end-of-service benefit without saving it
#[utoipa::path(
    post,
    path = "/api/v1/calculations/eosb",
    request_body = EosbInput,
    responses(
        (status = 200, description = "EOSB breakdown", body = EosbResult),
        (status = 400, description = "Missing hire date or invalid amounts"),
    ),
    tag = "Calculations"
)]
pub async fn calculate_eosb(Json(body): Json<EosbInput>) -> AppResult<Json<EosbResult>> {
    Ok(Json(EosbService::calculate(&body)?))
}

/// Calculate GOSI employee and employer contributions
#[utoipa::path(
    post,
    path = "/api/v1/calculations/gosi",
    request_body = GosiInput,
    responses(
        (status = 200, description = "GOSI contributions", body = GosiResult),
        (status = 400, description = "Negative salary components"),
    ),
    tag = "Calculations"
)]
pub async fn calculate_gosi(Json(body): Json<GosiInput>) -> AppResult<Json<GosiResult>> {
    Ok(Json(GosiService::calculate(&body)?))
}

/// Calculate overtime pay at 150% of the hourly rate
#[utoipa::path(
    post,
    path = "/api/v1/calculations/overtime",
    request_body = OvertimeInput,
    responses(
        (status = 200, description = "Overtime pay, with an advisory above 60 hours a month", body = OvertimeResult),
        (status = 400, description = "Invalid hours or working days"),
    ),
    tag = "Calculations"
)]
pub async fn calculate_overtime(
    Json(body): Json<OvertimeInput>,
) -> AppResult<Json<OvertimeResult>> {
    Ok(Json(OvertimeService::calculate(&body)?))
}

/// Preview an employee's monthly payroll without saving it
#[utoipa::path(
    post,
    path = "/api/v1/calculations/payroll",
    request_body = PayrollInput,
    responses(
        (status = 200, description = "Gross, deductions and net salary", body = PayrollCalculation),
        (status = 400, description = "Invalid pay period or amounts"),
    ),
    tag = "Calculations"
)]
pub async fn calculate_payroll(
    Json(body): Json<PayrollInput>,
) -> AppResult<Json<PayrollCalculation>> {
    Ok(Json(PayrollService::calculate(&body)?))
}

/// Check iqama and passport expiry dates against the warning window
#[utoipa::path(
    post,
    path = "/api/v1/calculations/document-expiry",
    request_body = DocumentExpiryRequest,
    responses((status = 200, description = "Expiry advisories", body = DocumentExpiryResponse)),
    tag = "Calculations"
)]
pub async fn check_document_expiry(
    State(state): State<AppState>,
    Json(body): Json<DocumentExpiryRequest>,
) -> Json<DocumentExpiryResponse> {
    let as_of = body.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let window = state.config.document_expiry_warning_days;

    Json(DocumentExpiryResponse {
        as_of,
        warning_window_days: window,
        advisories: expiry_advisories(body.iqama_expiry, body.passport_expiry, as_of, window),
    })
}
