//! Configuration loading and management for the invoice engine.
//!
//! This module provides functionality to load the overtime policy, invoicing
//! defaults and time entry rules from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use invoice_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/fr_default").unwrap();
//! println!("Currency: {}", config.config().invoicing().currency);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, InvoicingConfig, OvertimePolicy, TimeEntryRules};
