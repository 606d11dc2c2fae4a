//! Site configuration types.

use std::path::{Path, PathBuf};

use hrms_core::traits::{DEVELOPER_MODE_KEY, PUSH_RELAY_SERVER_URL_KEY, parse_bool};
use hrms_core::ConfigStore;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Merged contents of `common_site_config.json` and `site_config.json`.
///
/// Keys without a typed field are kept in [`SiteConfig::extra`] so that
/// [`ConfigStore::get`] can still answer for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Relaxes access checks for local tooling.
    #[serde(deserialize_with = "deserialize_truthy")]
    pub developer_mode: bool,
    /// Push notification relay server.
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub push_relay_server_url: Option<String>,
    /// Bind address for the web server.
    pub webserver_host: String,
    /// Port for the web server.
    pub webserver_port: u16,
    /// Session database file, relative to the site directory.
    pub session_db: String,
    /// Default log filter.
    pub log_level: String,
    /// Every other key, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            developer_mode: false,
            push_relay_server_url: None,
            webserver_host: "127.0.0.1".to_string(),
            webserver_port: 8000,
            session_db: "sessions.db".to_string(),
            log_level: "info".to_string(),
            extra: Map::new(),
        }
    }
}

impl SiteConfig {
    /// Look up a key as a string.
    ///
    /// Typed fields are rendered by name, `developer_mode` as `"1"` or `"0"`.
    /// Extra string values are returned unquoted, other scalars as JSON, and
    /// JSON null counts as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            DEVELOPER_MODE_KEY => Some(if self.developer_mode { "1" } else { "0" }.to_string()),
            PUSH_RELAY_SERVER_URL_KEY => self.push_relay_server_url.clone(),
            "webserver_host" => Some(self.webserver_host.clone()),
            "webserver_port" => Some(self.webserver_port.to_string()),
            "session_db" => Some(self.session_db.clone()),
            "log_level" => Some(self.log_level.clone()),
            _ => self.extra.get(key).and_then(render_value),
        }
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Bench tooling writes the flag as `1`/`0` as often as `true`/`false`.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
        Value::String(s) => parse_bool(&s).unwrap_or(false),
        _ => false,
    })
}

/// Non-string values are dropped with a warning instead of failing the load.
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            warn!(value = %other, "expected a string config value, ignoring");
            None
        }
    })
}

/// A resolved site: its name, directory and merged configuration.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// Site name, also the directory name under `sites/`.
    pub site_name: String,
    /// `sites/<site_name>`.
    pub site_dir: PathBuf,
    /// Merged configuration.
    pub config: SiteConfig,
}

impl SiteSettings {
    /// Build settings for a site without touching the filesystem.
    pub fn new(
        site_name: impl Into<String>,
        site_dir: impl Into<PathBuf>,
        config: SiteConfig,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_dir: site_dir.into(),
            config,
        }
    }

    /// Absolute or sites-relative path of the session database.
    pub fn session_db_path(&self) -> PathBuf {
        let db = Path::new(&self.config.session_db);
        if db.is_absolute() {
            db.to_path_buf()
        } else {
            self.site_dir.join(db)
        }
    }
}

impl ConfigStore for SiteSettings {
    fn site_name(&self) -> &str {
        &self.site_name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.config.get(key)
    }
}
