//! Capabilities the boot context builder depends on.
//!
//! Each trait stands in for a piece of request-scoped state that a web
//! framework would normally expose as a global. Passing them explicitly keeps
//! the builder testable without a running server.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::ids::SessionId;

/// Configuration key holding the developer-mode flag.
pub const DEVELOPER_MODE_KEY: &str = "developer_mode";
/// Configuration key holding the optional push relay server URL.
pub const PUSH_RELAY_SERVER_URL_KEY: &str = "push_relay_server_url";

/// The authenticated caller of a page request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Session id from the `sid` cookie.
    pub session_id: SessionId,
    /// User the session belongs to.
    pub user: String,
}

/// Read-only view of the current site's configuration.
pub trait ConfigStore: Send + Sync {
    /// Identifier of the site serving the request.
    fn site_name(&self) -> &str;

    /// Look up a configuration value, `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Whether the deployment runs in developer mode.
    fn is_developer_mode(&self) -> bool {
        self.get(DEVELOPER_MODE_KEY)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false)
    }
}

/// Issues anti-forgery tokens for sessions.
pub trait SessionService: Send + Sync {
    /// Return the session's CSRF token, creating it on first use.
    fn issue_csrf_token(&self, session: &SessionContext) -> Result<String>;
}

/// Commits writes left pending on the shared connection.
pub trait TransactionManager: Send + Sync {
    /// Commit the open transaction, if any.
    fn commit_pending(&self) -> Result<()>;
}

/// Parse a configuration string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<&'static str, &'static str>);

    impl ConfigStore for MapConfig {
        fn site_name(&self) -> &str {
            "test.localhost"
        }

        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| (*v).to_string())
        }
    }

    #[test]
    fn parse_bool_truthy() {
        for v in ["true", "1", "YES", "On", " true "] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
    }

    #[test]
    fn parse_bool_falsy() {
        for v in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn developer_mode_defaults_off() {
        let config = MapConfig(HashMap::new());
        assert!(!config.is_developer_mode());
    }

    #[test]
    fn developer_mode_reads_flag() {
        let config = MapConfig(HashMap::from([(DEVELOPER_MODE_KEY, "1")]));
        assert!(config.is_developer_mode());
    }

    #[test]
    fn unparseable_developer_mode_is_off() {
        let config = MapConfig(HashMap::from([(DEVELOPER_MODE_KEY, "sometimes")]));
        assert!(!config.is_developer_mode());
    }
}
