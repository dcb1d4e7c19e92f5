use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler — returns an HTML landing page with the route map
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>HR Payroll API</title>
  <style>
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; padding: 40px 20px; }
    .container { max-width: 860px; margin: 0 auto; }
    h1 { font-size: 2.4rem; color: #38bdf8; margin-bottom: 8px; }
    p { color: #94a3b8; }
    a { color: #38bdf8; }
    .route { font-family: monospace; padding: 6px 0; border-bottom: 1px solid #1e293b; }
    .method { display: inline-block; min-width: 60px; color: #34d399; }
  </style>
</head>
<body>
<div class="container">
  <h1>HR Payroll API</h1>
  <p>EOSB, GOSI, overtime and payroll calculations under Saudi labor rules. Amounts in SAR.</p>
  <p><a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>

  <h3>Calculations</h3>
  <div class="route"><span class="method">POST</span>/api/v1/calculations/eosb</div>
  <div class="route"><span class="method">POST</span>/api/v1/calculations/gosi</div>
  <div class="route"><span class="method">POST</span>/api/v1/calculations/overtime</div>
  <div class="route"><span class="method">POST</span>/api/v1/calculations/payroll</div>
  <div class="route"><span class="method">POST</span>/api/v1/calculations/document-expiry</div>

  <h3>EOSB records</h3>
  <div class="route"><span class="method">POST</span>/api/v1/eosb/records</div>
  <div class="route"><span class="method">GET</span>/api/v1/eosb/records</div>
  <div class="route"><span class="method">GET</span>/api/v1/eosb/records/:id</div>
  <div class="route"><span class="method">PATCH</span>/api/v1/eosb/records/:id/status</div>

  <h3>Payroll records</h3>
  <div class="route"><span class="method">POST</span>/api/v1/payroll/records</div>
  <div class="route"><span class="method">GET</span>/api/v1/payroll/records</div>
  <div class="route"><span class="method">GET</span>/api/v1/payroll/records/:id</div>
  <div class="route"><span class="method">PATCH</span>/api/v1/payroll/records/:id/status</div>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.backend();
    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": store,
                "service": "hr-payroll",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "store": store,
                "error": e.to_string()
            })),
        ),
    }
}
