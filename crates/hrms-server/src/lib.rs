//! # hrms-server
//!
//! Axum HTTP server for the HRMS front-end boot context.
//!
//! - `GET /hrms` and `GET /hrms/{*app_path}`: session-authenticated page shell
//!   carrying the CSRF token and boot record
//! - `POST /api/method/hrms.www.hrms.get_context_for_dev`: boot record for
//!   local tooling, developer mode only
//! - `GET /health`, `GET /metrics`
//! - Stop-then-drain shutdown through [`ServerHandle`]

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod page;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AppState, HrmsServer};
pub use shutdown::ServerHandle;
