// src/routes/mod.rs

use crate::{
    handlers::{
        calculations::{
            calculate_eosb, calculate_gosi, calculate_overtime, calculate_payroll,
            check_document_expiry,
        },
        eosb::{create_eosb_record, get_eosb_record, list_eosb_records, update_eosb_status},
        general::{health_handler, root_handler},
        payroll::{
            create_payroll_record, get_payroll_record, list_payroll_records,
            update_payroll_status,
        },
    },
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[cfg(test)]
mod tests;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Calculations ─────────────────────────────────────
        .route("/calculations/eosb", post(calculate_eosb))
        .route("/calculations/gosi", post(calculate_gosi))
        .route("/calculations/overtime", post(calculate_overtime))
        .route("/calculations/payroll", post(calculate_payroll))
        .route("/calculations/document-expiry", post(check_document_expiry))
        // ─── EOSB Records ─────────────────────────────────────
        .route(
            "/eosb/records",
            post(create_eosb_record).get(list_eosb_records),
        )
        .route("/eosb/records/{record_id}", get(get_eosb_record))
        .route("/eosb/records/{record_id}/status", patch(update_eosb_status))
        // ─── Payroll Records ──────────────────────────────────
        .route(
            "/payroll/records",
            post(create_payroll_record).get(list_payroll_records),
        )
        .route("/payroll/records/{record_id}", get(get_payroll_record))
        .route(
            "/payroll/records/{record_id}/status",
            patch(update_payroll_status),
        )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
