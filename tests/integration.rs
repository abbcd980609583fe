//! Integration tests for the invoice engine.
//!
//! This test suite drives the HTTP router end to end:
//! - Time entry creation, validation and lifecycle conflicts
//! - Input validation errors
//! - Weekly overtime tiers in invoice previews
//! - Invoice finalization, numbering and snapshot immutability
//! - Error cases

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use invoice_engine::api::{AppState, create_router};
use invoice_engine::clock::FixedClock;
use invoice_engine::config::ConfigLoader;
use invoice_engine::models::{Client, Contract, Employee};
use invoice_engine::service::{Directories, InvoicingService};
use invoice_engine::store::{InMemoryKeyValueStore, KeyValueDirectory, KeyValueStore};

// =============================================================================
// Test Helpers
// =============================================================================

fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn employee(id: &str, first: &str, last: &str) -> Employee {
    Employee {
        id: id.into(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        position: "Cariste".to_string(),
        email: None,
    }
}

fn contract(id: &str, employee_id: &str, billing_rate: &str) -> Contract {
    Contract {
        id: id.into(),
        employee_id: employee_id.into(),
        client_id: "cli_001".into(),
        title: "Préparateur de commandes".to_string(),
        location: "Vénissieux".to_string(),
        start_date: make_date(2025, 9, 1),
        end_date: None,
        billing_rate: Some(decimal(billing_rate)),
        hourly_rate: Some(decimal("14")),
        working_hours: Some(decimal("35")),
    }
}

/// Router over an in-memory store seeded with one client, two employees and
/// their contracts. The clock is pinned to 2026-02-02.
async fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/fr_default")
        .expect("Failed to load config")
        .into_config();

    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let directory = Arc::new(KeyValueDirectory::new(Arc::clone(&store)));
    directory.put_employee(employee("emp_e", "Élodie", "Martin")).await.unwrap();
    directory.put_employee(employee("emp_f", "Franck", "Petit")).await.unwrap();
    directory.put_contract(contract("ctr_e", "emp_e", "20")).await.unwrap();
    directory.put_contract(contract("ctr_f", "emp_f", "18")).await.unwrap();
    directory
        .put_client(Client {
            id: "cli_001".into(),
            name: "Logistique Lyonnaise".to_string(),
            address: "4 rue de la Gare".to_string(),
            postal_code: "69200".to_string(),
            city: "Vénissieux".to_string(),
            siret: Some("81234567800019".to_string()),
            email: Some("compta@logly.fr".to_string()),
            payment_terms_days: None,
        })
        .await
        .unwrap();

    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 2, 2, 9, 0, 0).unwrap());
    let service = InvoicingService::new(
        config,
        store,
        Directories::from_key_value(directory),
        Arc::new(clock),
    );
    create_router(AppState::new(service))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn entry_body(employee_id: &str, contract_id: &str, date: &str, hours: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "contract_id": contract_id,
        "client_id": "cli_001",
        "date": date,
        "total_hours": hours
    })
}

/// Creates and validates an entry, returning its id.
async fn record_validated(router: &Router, employee_id: &str, date: &str, hours: &str) -> String {
    let contract_id = format!("ctr_{}", employee_id.trim_start_matches("emp_"));
    let (status, entry) = send(
        router,
        "POST",
        "/time-entries",
        Some(entry_body(employee_id, &contract_id, date, hours)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", entry);
    let id = entry["id"].as_str().unwrap().to_string();

    let (status, _) = send(router, "POST", &format!("/time-entries/{}/validate", id), None).await;
    assert_eq!(status, StatusCode::OK);
    id
}

/// Records the 42-hour week of employee E: Mon-Thu 8h, Fri 10h.
async fn record_forty_two_hour_week(router: &Router) -> Vec<String> {
    let mut ids = Vec::new();
    for (date, hours) in [
        ("2026-01-12", "8"),
        ("2026-01-13", "8"),
        ("2026-01-14", "8"),
        ("2026-01-15", "8"),
        ("2026-01-16", "10"),
    ] {
        ids.push(record_validated(router, "emp_e", date, hours).await);
    }
    ids
}

fn january_invoice() -> Value {
    json!({
        "client_id": "cli_001",
        "period_start": "2026-01-01",
        "period_end": "2026-01-31",
        "invoice_date": "2026-02-02"
    })
}

fn january_preview() -> Value {
    json!({
        "client_id": "cli_001",
        "period_start": "2026-01-01",
        "period_end": "2026-01-31"
    })
}

fn decimal_at(value: &Value, pointer: &str) -> Decimal {
    let raw = value
        .pointer(pointer)
        .unwrap_or_else(|| panic!("missing {} in {}", pointer, value));
    match raw {
        Value::String(s) => decimal(s),
        other => decimal(&other.to_string()),
    }
}

fn employee_by_id<'a>(employees: &'a Value, id: &str) -> &'a Value {
    employees
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["employee"]["id"] == id)
        .unwrap_or_else(|| panic!("employee {} not found", id))
}

// =============================================================================
// Time Entries
// =============================================================================

#[tokio::test]
async fn test_create_time_entry_from_time_span() {
    let router = create_router_for_test().await;
    let (status, entry) = send(
        &router,
        "POST",
        "/time-entries",
        Some(json!({
            "employee_id": "emp_e",
            "contract_id": "ctr_e",
            "client_id": "cli_001",
            "date": "2026-01-12",
            "start_time": "08:00:00",
            "end_time": "17:30:00",
            "break_minutes": 30
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "draft");
    assert_eq!(decimal_at(&entry, "/total_hours"), decimal("9"));
    assert_eq!(decimal_at(&entry, "/normal_hours"), decimal("7"));
    assert_eq!(decimal_at(&entry, "/overtime_hours"), decimal("2"));
}

#[tokio::test]
async fn test_duplicate_time_entry_is_conflict() {
    let router = create_router_for_test().await;
    let body = entry_body("emp_e", "ctr_e", "2026-01-12", "8");

    let (status, _) = send(&router, "POST", "/time-entries", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&router, "POST", "/time-entries", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");
}

#[tokio::test]
async fn test_future_date_is_rejected() {
    let router = create_router_for_test().await;
    let (status, error) = send(
        &router,
        "POST",
        "/time-entries",
        Some(entry_body("emp_e", "ctr_e", "2026-02-03", "8")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_end_before_start_is_rejected() {
    let router = create_router_for_test().await;
    let (status, error) = send(
        &router,
        "POST",
        "/time-entries",
        Some(json!({
            "employee_id": "emp_e",
            "contract_id": "ctr_e",
            "client_id": "cli_001",
            "date": "2026-01-12",
            "start_time": "17:00:00",
            "end_time": "08:00:00"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_break_out_of_range_is_rejected() {
    let router = create_router_for_test().await;
    let mut body = entry_body("emp_e", "ctr_e", "2026-01-12", "8");
    body["break_minutes"] = json!(481);

    let (status, _) = send(&router, "POST", "/time-entries", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_employee_id_is_rejected() {
    let router = create_router_for_test().await;
    let (status, error) = send(
        &router,
        "POST",
        "/time-entries",
        Some(json!({
            "contract_id": "ctr_e",
            "client_id": "cli_001",
            "date": "2026-01-12",
            "total_hours": "8"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let router = create_router_for_test().await;
    let request = Request::builder()
        .method("POST")
        .uri("/time-entries")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_twice_is_conflict() {
    let router = create_router_for_test().await;
    let id = record_validated(&router, "emp_e", "2026-01-12", "8").await;

    let (status, _) = send(&router, "POST", &format!("/time-entries/{}/validate", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_time_entry_is_not_found() {
    let router = create_router_for_test().await;
    let (status, error) = send(&router, "POST", "/time-entries/te_missing/validate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_draft_entry() {
    let router = create_router_for_test().await;
    let (_, entry) = send(
        &router,
        "POST",
        "/time-entries",
        Some(entry_body("emp_e", "ctr_e", "2026-01-12", "8")),
    )
    .await;
    let uri = format!("/time-entries/{}", entry["id"].as_str().unwrap());

    let (status, _) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Invoice Preview
// =============================================================================

#[tokio::test]
async fn test_preview_forty_two_hour_week() {
    let router = create_router_for_test().await;
    record_forty_two_hour_week(&router).await;

    let (status, preview) = send(&router, "POST", "/invoices/preview", Some(january_preview())).await;
    assert_eq!(status, StatusCode::OK, "{}", preview);

    let e = employee_by_id(&preview["employees"], "emp_e");
    assert_eq!(e["employee"]["name"], "Élodie Martin");
    let week = &e["weeks"]["2026-01-12_2026-01-18"];
    assert_eq!(decimal_at(week, "/total_week_hours"), decimal("42"));
    assert_eq!(decimal_at(week, "/normal_hours"), decimal("35"));
    assert_eq!(decimal_at(week, "/overtime125_hours"), decimal("7"));
    assert_eq!(decimal_at(week, "/overtime150_hours"), Decimal::ZERO);
    assert_eq!(decimal_at(week, "/normal_amount"), decimal("700"));
    assert_eq!(decimal_at(week, "/overtime125_amount"), decimal("175"));
    assert_eq!(decimal_at(week, "/total_week_amount"), decimal("875"));
    assert_eq!(week["working_days"], 5);
}

#[tokio::test]
async fn test_preview_includes_selected_employee_without_entries() {
    let router = create_router_for_test().await;
    record_validated(&router, "emp_e", "2026-01-12", "8").await;

    let (_, preview) = send(&router, "POST", "/invoices/preview", Some(january_preview())).await;

    let f = employee_by_id(&preview["employees"], "emp_f");
    assert_eq!(decimal_at(f, "/totals/total_hours"), Decimal::ZERO);
    assert_eq!(decimal_at(f, "/totals/total_amount"), Decimal::ZERO);
    assert_eq!(f["totals"]["working_days"], 0);
    assert!(f["weeks"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_ignores_draft_entries() {
    let router = create_router_for_test().await;
    record_validated(&router, "emp_e", "2026-01-12", "8").await;
    send(
        &router,
        "POST",
        "/time-entries",
        Some(entry_body("emp_e", "ctr_e", "2026-01-13", "8")),
    )
    .await;

    let (_, preview) = send(&router, "POST", "/invoices/preview", Some(january_preview())).await;
    assert_eq!(decimal_at(&preview, "/global_totals/total_hours"), decimal("8"));
    assert_eq!(preview["time_entry_ids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_preview_with_inverted_period_is_rejected() {
    let router = create_router_for_test().await;
    let (status, error) = send(
        &router,
        "POST",
        "/invoices/preview",
        Some(json!({
            "client_id": "cli_001",
            "period_start": "2026-01-31",
            "period_end": "2026-01-01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Invoice Finalization
// =============================================================================

#[tokio::test]
async fn test_finalize_invoice() {
    let router = create_router_for_test().await;
    record_forty_two_hour_week(&router).await;

    let (status, invoice) = send(&router, "POST", "/invoices", Some(january_invoice())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", invoice);

    assert_eq!(invoice["invoice_number"], "FAC-2026-0001");
    assert_eq!(invoice["is_finalized"], true);
    assert_eq!(invoice["finalized_at"], "2026-02-02T09:00:00Z");
    assert_eq!(invoice["due_date"], "2026-03-04");
    assert_eq!(invoice["client"]["name"], "Logistique Lyonnaise");
    assert_eq!(invoice["work_periods"].as_array().unwrap().len(), 2);
    assert_eq!(decimal_at(&invoice, "/global_totals/total_amount"), decimal("875"));
    assert_eq!(decimal_at(&invoice, "/vat_amount"), decimal("175"));
    assert_eq!(decimal_at(&invoice, "/total_including_vat"), decimal("1050"));
    assert_eq!(invoice["time_entry_ids"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_invoiced_entry_rejects_update() {
    let router = create_router_for_test().await;
    let ids = record_forty_two_hour_week(&router).await;
    send(&router, "POST", "/invoices", Some(january_invoice())).await;

    let uri = format!("/time-entries/{}", ids[0]);
    let (_, entry) = send(&router, "GET", &uri, None).await;
    assert_eq!(entry["status"], "invoiced");

    let (status, error) = send(
        &router,
        "PUT",
        &uri,
        Some(entry_body("emp_e", "ctr_e", "2026-01-12", "2")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");

    let (status, _) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_snapshot_unchanged_after_entries_change() {
    let router = create_router_for_test().await;
    record_forty_two_hour_week(&router).await;

    // A draft entry in the period is left out of the invoice.
    let (_, draft) = send(
        &router,
        "POST",
        "/time-entries",
        Some(entry_body("emp_e", "ctr_e", "2026-01-19", "7")),
    )
    .await;

    let (_, created) = send(&router, "POST", "/invoices", Some(january_invoice())).await;
    let invoice_uri = format!("/invoices/{}", created["id"].as_str().unwrap());

    // Edit the draft, validate it, and add more hours in the same period.
    let draft_uri = format!("/time-entries/{}", draft["id"].as_str().unwrap());
    let (status, _) = send(
        &router,
        "PUT",
        &draft_uri,
        Some(entry_body("emp_e", "ctr_e", "2026-01-19", "11")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    send(&router, "POST", &format!("{}/validate", draft_uri), None).await;
    record_validated(&router, "emp_f", "2026-01-20", "6").await;

    let (status, reread) = send(&router, "GET", &invoice_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reread, created);
}

#[tokio::test]
async fn test_second_invoice_gets_next_number_and_only_new_entries() {
    let router = create_router_for_test().await;
    record_validated(&router, "emp_e", "2026-01-12", "8").await;
    send(&router, "POST", "/invoices", Some(january_invoice())).await;

    record_validated(&router, "emp_f", "2026-01-13", "5").await;
    let (status, second) = send(&router, "POST", "/invoices", Some(january_invoice())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["invoice_number"], "FAC-2026-0002");
    assert_eq!(decimal_at(&second, "/global_totals/total_hours"), decimal("5"));
    assert_eq!(decimal_at(&second, "/global_totals/total_amount"), decimal("90"));
}

#[tokio::test]
async fn test_explicit_due_date_is_kept() {
    let router = create_router_for_test().await;
    record_validated(&router, "emp_e", "2026-01-12", "8").await;

    let mut body = january_invoice();
    body["due_date"] = json!("2026-02-15");
    let (status, invoice) = send(&router, "POST", "/invoices", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["due_date"], "2026-02-15");
}

#[tokio::test]
async fn test_unknown_invoice_is_not_found() {
    let router = create_router_for_test().await;
    let (status, error) = send(&router, "GET", "/invoices/inv_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}
