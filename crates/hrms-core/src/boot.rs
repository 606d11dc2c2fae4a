//! Boot context assembly.
//!
//! [`BootRecord`] is the payload the front-end reads at startup.
//! [`PageContext`] wraps it with the session's CSRF token for server-rendered
//! pages. The dev-context variant returns the bare record and is only served
//! in developer mode.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{BootError, Result};
use crate::traits::{
    ConfigStore, PUSH_RELAY_SERVER_URL_KEY, SessionContext, SessionService, TransactionManager,
};

/// Landing route of the front-end application.
pub const DEFAULT_ROUTE: &str = "/hrms";

/// Initial client state delivered at page load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootRecord {
    /// Site serving the request.
    pub site_name: String,
    /// Push relay server URL, empty when not configured.
    pub push_relay_server_url: String,
    /// Route the client lands on.
    pub default_route: String,
}

/// Template context for the page endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    /// Anti-forgery token for the caller's session.
    pub csrf_token: String,
    /// Boot payload.
    pub boot: BootRecord,
}

/// Assemble a boot record from configuration.
///
/// Absent optional keys degrade to empty strings.
pub fn build_boot_record(config: &dyn ConfigStore) -> BootRecord {
    BootRecord {
        site_name: config.site_name().to_string(),
        push_relay_server_url: config.get(PUSH_RELAY_SERVER_URL_KEY).unwrap_or_default(),
        default_route: DEFAULT_ROUTE.to_string(),
    }
}

/// Builds boot contexts from explicit capabilities.
#[derive(Clone)]
pub struct BootContextBuilder {
    config: Arc<dyn ConfigStore>,
    sessions: Arc<dyn SessionService>,
    transactions: Arc<dyn TransactionManager>,
}

impl BootContextBuilder {
    /// Create a builder over the given capabilities.
    pub fn new(
        config: Arc<dyn ConfigStore>,
        sessions: Arc<dyn SessionService>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            config,
            sessions,
            transactions,
        }
    }

    /// Configuration the builder reads from.
    pub fn config(&self) -> &Arc<dyn ConfigStore> {
        &self.config
    }

    /// Context for a server-rendered page.
    ///
    /// The token is committed before the context is returned so a client
    /// never holds a token the store has not persisted.
    pub fn build_page_context(&self, session: &SessionContext) -> Result<PageContext> {
        let csrf_token = self.sessions.issue_csrf_token(session)?;
        self.transactions.commit_pending()?;
        debug!(user = %session.user, "page context built");

        Ok(PageContext {
            csrf_token,
            boot: self.build_boot_record(),
        })
    }

    /// Boot record for local tooling, gated on developer mode.
    pub fn build_dev_context(&self) -> Result<BootRecord> {
        if !self.config.is_developer_mode() {
            warn!(site = self.config.site_name(), "dev context requested outside developer mode");
            return Err(BootError::developer_mode_only());
        }
        Ok(self.build_boot_record())
    }

    /// Boot record for the current configuration.
    pub fn build_boot_record(&self) -> BootRecord {
        build_boot_record(self.config.as_ref())
    }
}
