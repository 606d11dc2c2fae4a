//! Server configuration.

use hrms_settings::SiteConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Allow cross-origin requests, for a local front-end dev server.
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    /// Derive server options from site configuration.
    ///
    /// Cross-origin access is only opened up in developer mode.
    pub fn from_site_config(config: &SiteConfig) -> Self {
        Self {
            host: config.webserver_host.clone(),
            port: config.webserver_port,
            permissive_cors: config.developer_mode,
        }
    }
}
