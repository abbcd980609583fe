//! Application state for the invoice engine API.

use std::sync::Arc;

use crate::service::InvoicingService;

/// Shared application state.
///
/// Holds the invoicing service every handler delegates to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<InvoicingService>,
}

impl AppState {
    /// Creates a new application state around `service`.
    pub fn new(service: InvoicingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the invoicing service.
    pub fn service(&self) -> &InvoicingService {
        &self.service
    }
}
