//! Weekly overtime and invoice snapshot engine for staffing back-offices.
//!
//! This crate aggregates employees' time entries per Monday-first week, applies
//! the French tiered overtime policy (35h normal, 1.25x up to 43h, 1.50x
//! beyond), bills each week at an hours-weighted rate, and freezes the result
//! into immutable invoice snapshots.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
