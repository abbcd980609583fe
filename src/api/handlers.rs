//! HTTP request handlers for the invoice engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{InvoiceId, TimeEntryId, TimeEntryInput};

use super::request::{CreateInvoiceRequest, PreviewInvoiceRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/invoices", post(create_invoice_handler))
        .route("/invoices/preview", post(preview_invoice_handler))
        .route("/invoices/:id", get(get_invoice_handler))
        .route("/time-entries", post(create_time_entry_handler))
        .route(
            "/time-entries/:id",
            get(get_time_entry_handler)
                .put(update_time_entry_handler)
                .delete(delete_time_entry_handler),
        )
        .route("/time-entries/:id/validate", post(validate_time_entry_handler))
        .with_state(state)
}

/// Handler for POST /invoices/preview.
///
/// Returns the per-employee weekly tables the invoice would contain.
async fn preview_invoice_handler(
    State(state): State<AppState>,
    payload: Result<Json<PreviewInvoiceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing invoice preview request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let request = match request.into_invoice_request() {
        Ok(request) => request,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match state.service().preview(&request).await {
        Ok(preview) => {
            info!(
                correlation_id = %correlation_id,
                client_id = %preview.client_id,
                employees = preview.employees.len(),
                total_amount = %preview.global_totals.total_amount,
                duration_us = start_time.elapsed().as_micros(),
                "Invoice preview computed"
            );
            json_response(StatusCode::OK, &preview)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /invoices.
///
/// Finalizes and persists the invoice snapshot.
async fn create_invoice_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing invoice creation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let (request, fields) = match request.into_parts() {
        Ok(parts) => parts,
        Err(err) => return error_response(correlation_id, err),
    };

    match state.service().finalize(&request, fields).await {
        Ok(invoice) => {
            info!(
                correlation_id = %correlation_id,
                invoice_id = %invoice.id,
                invoice_number = %invoice.invoice_number,
                "Invoice created"
            );
            json_response(StatusCode::CREATED, &invoice)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /invoices/:id.
async fn get_invoice_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().get_invoice(&InvoiceId::new(id)).await {
        Ok(invoice) => json_response(StatusCode::OK, &invoice),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /time-entries.
async fn create_time_entry_handler(
    State(state): State<AppState>,
    payload: Result<Json<TimeEntryInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.service().create_time_entry(input).await {
        Ok(entry) => json_response(StatusCode::CREATED, &entry),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /time-entries/:id.
async fn get_time_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().time_entries().get_by_id(&TimeEntryId::new(id)).await {
        Ok(entry) => json_response(StatusCode::OK, &entry),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PUT /time-entries/:id.
async fn update_time_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TimeEntryInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state
        .service()
        .update_time_entry(&TimeEntryId::new(id), input)
        .await
    {
        Ok(entry) => json_response(StatusCode::OK, &entry),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /time-entries/:id.
async fn delete_time_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().delete_time_entry(&TimeEntryId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /time-entries/:id/validate.
async fn validate_time_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().validate_time_entry(&TimeEntryId::new(id)).await {
        Ok(entry) => json_response(StatusCode::OK, &entry),
        Err(err) => error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}
