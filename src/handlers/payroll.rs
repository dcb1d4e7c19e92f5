// src/handlers/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        CreatePayrollRecordRequest, PayrollRecord, PayrollRecordQuery, UpdatePayrollStatusRequest,
    },
    services::payroll::{PayrollService, validate_pay_period},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Calculate and save an employee's payroll for a pay period
#[utoipa::path(
    post,
    path = "/api/v1/payroll/records",
    request_body = CreatePayrollRecordRequest,
    responses(
        (status = 201, description = "Payroll record saved with status 'calculated'", body = PayrollRecord),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Payroll already recorded for this period"),
    ),
    tag = "Payroll"
)]
pub async fn create_payroll_record(
    State(state): State<AppState>,
    Json(body): Json<CreatePayrollRecordRequest>,
) -> AppResult<(StatusCode, Json<PayrollRecord>)> {
    let calculation = PayrollService::calculate(&body.input)?;
    for advisory in &calculation.advisories {
        warn!(
            "Payroll advisory for employee {} ({}): {}",
            body.employee_id, calculation.pay_period, advisory.message
        );
    }

    let record = PayrollService::new_record(body.employee_id, calculation);
    let record = state.store.insert_payroll(record).await?;

    info!(
        "Payroll record {} saved for employee {} period {}. Net: SAR {}",
        record.id, record.employee_id, record.pay_period, record.net_salary
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// List payroll records, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payroll/records",
    params(PayrollRecordQuery),
    responses(
        (status = 200, description = "List of payroll records", body = Vec<PayrollRecord>),
        (status = 400, description = "Invalid pay period filter"),
    ),
    tag = "Payroll"
)]
pub async fn list_payroll_records(
    State(state): State<AppState>,
    Query(query): Query<PayrollRecordQuery>,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    if let Some(period) = &query.pay_period {
        validate_pay_period(period)?;
    }

    let records = state
        .store
        .list_payroll(query.employee_id, query.pay_period)
        .await?;

    Ok(Json(records))
}

/// Get a single payroll record
#[utoipa::path(
    get,
    path = "/api/v1/payroll/records/{record_id}",
    params(("record_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll record detail", body = PayrollRecord),
        (status = 404, description = "Record not found"),
    ),
    tag = "Payroll"
)]
pub async fn get_payroll_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<PayrollRecord>> {
    let record = state
        .store
        .get_payroll(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll record {} not found", record_id)))?;

    Ok(Json(record))
}

/// Advance a payroll record: draft → calculated → approved → processed → paid
#[utoipa::path(
    patch,
    path = "/api/v1/payroll/records/{record_id}/status",
    request_body = UpdatePayrollStatusRequest,
    params(("record_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Status updated", body = PayrollRecord),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Record changed while updating"),
        (status = 422, description = "Transition not allowed"),
    ),
    tag = "Payroll"
)]
pub async fn update_payroll_status(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdatePayrollStatusRequest>,
) -> AppResult<Json<PayrollRecord>> {
    let current = state
        .store
        .get_payroll(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payroll record {} not found", record_id)))?;

    PayrollService::ensure_transition(current.status, body.status)?;

    let record = state
        .store
        .set_payroll_status(record_id, current.status, body.status)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "Payroll record {} changed status while updating",
                record_id
            ))
        })?;

    info!(
        "Payroll record {} moved from {} to {}",
        record_id, current.status, record.status
    );

    Ok(Json(record))
}
