//! HTTP API module for the invoice engine.
//!
//! This module exposes time entry management and the invoice preview and
//! finalization steps as REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CreateInvoiceRequest, PreviewInvoiceRequest};
pub use response::ApiError;
pub use state::AppState;
