//! # hrms-store
//!
//! SQLite-backed sessions for the HRMS boot service.
//!
//! One connection is shared by every request. CSRF token writes open a
//! transaction on that connection and stay invisible to other connections
//! until [`hrms_core::TransactionManager::commit_pending`] runs.

#![deny(unsafe_code)]

pub mod database;
pub mod error;
pub mod schema;
pub mod sessions;

pub use database::Database;
pub use error::StoreError;
pub use sessions::SessionStore;
