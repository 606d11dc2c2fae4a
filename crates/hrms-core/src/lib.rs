//! # hrms-core
//!
//! Boot context assembly for the HRMS front-end.
//!
//! The front-end needs a small payload at page load: the session's CSRF
//! token, the site name, the push relay URL and the landing route. This crate
//! builds that payload from three explicit capabilities instead of ambient
//! request globals:
//!
//! - [`ConfigStore`]: site name and optional configuration keys
//! - [`SessionService`]: per-session anti-forgery tokens
//! - [`TransactionManager`]: commits writes made while issuing a token
//!
//! Concrete implementations live in `hrms-settings` and `hrms-store`.

#![deny(unsafe_code)]

pub mod boot;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod token;
pub mod traits;

pub use boot::{BootContextBuilder, BootRecord, DEFAULT_ROUTE, PageContext, build_boot_record};
pub use errors::{BootError, Result};
pub use ids::SessionId;
pub use traits::{ConfigStore, SessionContext, SessionService, TransactionManager};
