//! Persistence layer.
//!
//! Everything the engine persists lives as JSON collections in a
//! [`KeyValueStore`]. The directories of employees, contracts and clients are
//! read through traits so callers can plug in their own sources.

mod collection;
mod directories;
mod invoices;
mod key_value;
mod time_entries;

pub use collection::{
    CLIENTS_KEY, CONTRACTS_KEY, EMPLOYEES_KEY, INVOICES_KEY, JsonCollection, TIME_ENTRIES_KEY,
};
pub use directories::{ClientDirectory, ContractDirectory, EmployeeDirectory, KeyValueDirectory};
pub use invoices::InvoiceStore;
pub use key_value::{InMemoryKeyValueStore, KeyValueStore};
pub use time_entries::TimeEntryStore;

#[cfg(test)]
pub use directories::{MockClientDirectory, MockContractDirectory, MockEmployeeDirectory};
