// src/handlers/eosb.rs

use crate::{
    errors::{AppError, AppResult},
    models::{CreateEosbRecordRequest, EosbRecord, EosbRecordQuery, UpdateEosbStatusRequest},
    services::eosb::EosbService,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Calculate and save an EOSB record for a departing employee
#[utoipa::path(
    post,
    path = "/api/v1/eosb/records",
    request_body = CreateEosbRecordRequest,
    responses(
        (status = 201, description = "EOSB record saved with status 'calculated'", body = EosbRecord),
        (status = 400, description = "Validation error"),
        (status = 422, description = "EOSB already recorded for this termination date"),
    ),
    tag = "EOSB"
)]
pub async fn create_eosb_record(
    State(state): State<AppState>,
    Json(body): Json<CreateEosbRecordRequest>,
) -> AppResult<(StatusCode, Json<EosbRecord>)> {
    let result = EosbService::calculate(&body.input)?;
    for advisory in &result.advisories {
        warn!("EOSB advisory for employee {}: {}", body.employee_id, advisory.message);
    }

    let record = EosbService::new_record(body.employee_id, &body.input, &result)?;
    let record = state.store.insert_eosb(record).await?;

    info!(
        "EOSB record {} saved for employee {} (net {})",
        record.id, record.employee_id, record.net_eosb_amount
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// List EOSB records, newest first
#[utoipa::path(
    get,
    path = "/api/v1/eosb/records",
    params(EosbRecordQuery),
    responses((status = 200, description = "List of EOSB records", body = Vec<EosbRecord>)),
    tag = "EOSB"
)]
pub async fn list_eosb_records(
    State(state): State<AppState>,
    Query(query): Query<EosbRecordQuery>,
) -> AppResult<Json<Vec<EosbRecord>>> {
    let records = state.store.list_eosb(query.employee_id).await?;
    Ok(Json(records))
}

/// Get a single EOSB record
#[utoipa::path(
    get,
    path = "/api/v1/eosb/records/{record_id}",
    params(("record_id" = Uuid, Path, description = "EOSB record ID")),
    responses(
        (status = 200, description = "EOSB record detail", body = EosbRecord),
        (status = 404, description = "Record not found"),
    ),
    tag = "EOSB"
)]
pub async fn get_eosb_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<EosbRecord>> {
    let record = state
        .store
        .get_eosb(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("EOSB record {} not found", record_id)))?;

    Ok(Json(record))
}

/// Advance an EOSB record: calculated → approved → paid
#[utoipa::path(
    patch,
    path = "/api/v1/eosb/records/{record_id}/status",
    request_body = UpdateEosbStatusRequest,
    params(("record_id" = Uuid, Path, description = "EOSB record ID")),
    responses(
        (status = 200, description = "Status updated", body = EosbRecord),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Record changed while updating"),
        (status = 422, description = "Transition not allowed"),
    ),
    tag = "EOSB"
)]
pub async fn update_eosb_status(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdateEosbStatusRequest>,
) -> AppResult<Json<EosbRecord>> {
    let current = state
        .store
        .get_eosb(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("EOSB record {} not found", record_id)))?;

    EosbService::ensure_transition(current.status, body.status)?;

    let record = state
        .store
        .set_eosb_status(record_id, current.status, body.status)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "EOSB record {} changed status while updating",
                record_id
            ))
        })?;

    info!(
        "EOSB record {} moved from {} to {}",
        record_id, current.status, record.status
    );

    Ok(Json(record))
}
