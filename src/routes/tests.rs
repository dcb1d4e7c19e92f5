use super::app;
use crate::{config::Config, services::store::MemoryStore, state::AppState};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryStore::new()), Config::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .map(|s| s.parse().unwrap())
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
}

fn eosb_body(employee_id: Uuid) -> Value {
    json!({
        "employee_id": employee_id,
        "hire_date": "2019-01-01",
        "termination_date": "2026-01-01",
        "termination_type": "resignation",
        "last_basic_salary": "6000",
        "deductions": "1000"
    })
}

fn payroll_body(employee_id: Uuid, pay_period: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "pay_period": pay_period,
        "basic_salary": "10000",
        "housing_allowance": "2500",
        "transport_allowance": "1000",
        "nationality": "Saudi",
        "overtime_hours": "10",
        "bonus": "500",
        "loan_deduction": "750",
        "absent_days": "2",
        "other_deductions": "100"
    })
}

#[tokio::test]
async fn health_reports_memory_store() {
    let (status, body) = send(&test_app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn overtime_calculation_endpoint() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/calculations/overtime",
        Some(json!({ "basic_salary": "10000", "overtime_hours": "10" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["hourly_rate"]).round_dp(2), dec!(41.67));
    assert_eq!(amount(&body["overtime_rate"]).round_dp(2), dec!(62.50));
    assert_eq!(amount(&body["overtime_pay"]).round_dp(2), dec!(625.00));
    assert_eq!(body["advisories"], json!([]));
}

#[tokio::test]
async fn gosi_endpoint_accepts_free_text_nationality() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/calculations/gosi",
        Some(json!({
            "basic_salary": "40000",
            "housing_allowance": "10000",
            "nationality": "KSA"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_saudi"], true);
    assert_eq!(amount(&body["calculation_base"]), dec!(45000));
    assert_eq!(amount(&body["employee_contribution"]), dec!(4500));
}

#[tokio::test]
async fn eosb_without_hire_date_is_rejected() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/calculations/eosb",
        Some(json!({
            "termination_date": "2026-01-01",
            "termination_type": "contract_end",
            "last_basic_salary": "6000"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Hire date")
    );
}

#[tokio::test]
async fn oversized_amounts_are_bad_requests() {
    let app = test_app();
    let huge = "7922816251426433759354395033";

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/calculations/eosb",
        Some(json!({
            "hire_date": "2000-01-01",
            "termination_date": "2020-01-01",
            "termination_type": "contract_end",
            "last_basic_salary": huge
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/calculations/gosi",
        Some(json!({
            "basic_salary": huge,
            "housing_allowance": huge,
            "nationality": "saudi"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/calculations/overtime",
        Some(json!({ "basic_salary": "10000", "overtime_hours": huge })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = payroll_body(Uuid::new_v4(), "2026-09");
    body["bonus"] = json!("10000000000");
    let (status, _) = send(&app, "POST", "/api/v1/payroll/records", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn eosb_record_lifecycle() {
    let app = test_app();
    let employee_id = Uuid::new_v4();

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/eosb/records",
        Some(eosb_body(employee_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "calculated");
    // 2019-01-01 .. 2026-01-01 is 2557 days: 7 years and 2 days
    assert_eq!(created["years_of_service"], 7);
    assert_eq!(amount(&created["eosb_amount_0_to_5"]), dec!(15000));
    assert_eq!(amount(&created["eosb_amount_5_to_10"]), dec!(12000));
    assert_eq!(
        amount(&created["net_eosb_amount"]),
        amount(&created["total_eosb_amount"]) - dec!(1000)
    );
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/eosb/records",
        Some(eosb_body(employee_id)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let status_uri = format!("/api/v1/eosb/records/{id}/status");
    let (status, _) = send(&app, "PATCH", &status_uri, Some(json!({ "status": "paid" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(json!({ "status": "calculated" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], 422);

    let (status, body) = send(&app, "PATCH", &status_uri, Some(json!({ "status": "paid" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/eosb/records/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "paid");

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/v1/eosb/records?employee_id={employee_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn payroll_record_lifecycle() {
    let app = test_app();
    let employee_id = Uuid::new_v4();

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/payroll/records",
        Some(payroll_body(employee_id, "2026-09")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "calculated");
    assert_eq!(amount(&created["gross_salary"]), dec!(14625.00));
    assert_eq!(amount(&created["total_deductions"]), dec!(2766.67));
    assert_eq!(amount(&created["net_salary"]), dec!(11858.33));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/payroll/records",
        Some(payroll_body(employee_id, "2026-09")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/payroll/records",
        Some(payroll_body(employee_id, "2026-10")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let status_uri = format!("/api/v1/payroll/records/{id}/status");
    for next in ["approved", "processed", "paid"] {
        let (status, body) =
            send(&app, "PATCH", &status_uri, Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], next);
    }
    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, listed) = send(&app, "GET", "/api/v1/payroll/records?pay_period=2026-09", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["status"], "paid");

    let (status, _) = send(&app, "GET", "/api/v1/payroll/records?pay_period=sept", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_records_are_not_found() {
    let app = test_app();
    let missing = Uuid::new_v4();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/payroll/records/{missing}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/eosb/records/{missing}/status"),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn document_expiry_uses_configured_window() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/calculations/document-expiry",
        Some(json!({
            "iqama_expiry": "2026-11-05",
            "passport_expiry": "2027-06-01",
            "as_of": "2026-10-16"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warning_window_days"], 30);
    let advisories = body["advisories"].as_array().unwrap();
    assert_eq!(advisories.len(), 1);
    assert_eq!(advisories[0]["code"], "iqama_expiring");
}
