//! Site resolution and layered config loading.
//!
//! Loading flow:
//! 1. Start with compiled [`SiteConfig::default()`]
//! 2. Deep-merge `sites/common_site_config.json` if present
//! 3. Deep-merge `sites/<site>/site_config.json` if present
//! 4. Apply `HRMS_*` environment overrides
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::Path;

use hrms_core::traits::parse_bool;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{SiteConfig, SiteSettings};

/// Shared config file at the root of the sites directory.
pub const COMMON_SITE_CONFIG: &str = "common_site_config.json";
/// Per-site config file inside the site directory.
pub const SITE_CONFIG: &str = "site_config.json";
/// Default site marker at the root of the sites directory.
pub const CURRENT_SITE_FILE: &str = "currentsite.txt";

/// Resolve which site to serve.
///
/// An explicit name wins; otherwise `currentsite.txt` is read.
pub fn resolve_site_name(sites_dir: &Path, explicit: Option<&str>) -> Result<String> {
    let name = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let marker = sites_dir.join(CURRENT_SITE_FILE);
            if !marker.exists() {
                return Err(SettingsError::NoSite);
            }
            std::fs::read_to_string(&marker)?.trim().to_string()
        }
    };

    if name.is_empty() {
        return Err(SettingsError::NoSite);
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SettingsError::InvalidValue(format!("site name {name:?}")));
    }
    Ok(name)
}

/// Resolve the site and load its configuration with env overrides.
pub fn load_site(sites_dir: &Path, explicit_site: Option<&str>) -> Result<SiteSettings> {
    let site_name = resolve_site_name(sites_dir, explicit_site)?;
    let mut config = merge_config_files(sites_dir, &site_name)?;
    apply_env_overrides(&mut config);
    Ok(SiteSettings::new(site_name.clone(), sites_dir.join(&site_name), config))
}

/// Merge defaults, the common config and the site config (no env overrides).
///
/// Missing files are skipped. A missing site directory is an error.
pub fn merge_config_files(sites_dir: &Path, site_name: &str) -> Result<SiteConfig> {
    let site_dir = sites_dir.join(site_name);
    if !site_dir.is_dir() {
        return Err(SettingsError::SiteNotFound(site_dir));
    }

    let mut merged = serde_json::to_value(SiteConfig::default())?;
    for path in [sites_dir.join(COMMON_SITE_CONFIG), site_dir.join(SITE_CONFIG)] {
        if let Some(layer) = read_json(&path)? {
            merged = deep_merge(merged, layer);
        }
    }

    Ok(serde_json::from_value(merged)?)
}

fn read_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        debug!(?path, "config file not found, skipping");
        return Ok(None);
    }
    debug!(?path, "loading config file");
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `HRMS_*` environment overrides.
pub fn apply_env_overrides(config: &mut SiteConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
///
/// Empty values are ignored; invalid values are logged and ignored.
pub fn apply_overrides(config: &mut SiteConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("HRMS_DEVELOPER_MODE") {
        match parse_bool(&v) {
            Some(b) => config.developer_mode = b,
            None => {
                warn!(key = "HRMS_DEVELOPER_MODE", value = %v, "invalid boolean env var, ignoring");
            }
        }
    }
    if let Some(v) = read("HRMS_PUSH_RELAY_SERVER_URL") {
        config.push_relay_server_url = Some(v);
    }
    if let Some(v) = read("HRMS_HOST") {
        config.webserver_host = v;
    }
    if let Some(v) = read("HRMS_PORT") {
        match parse_port(&v) {
            Some(port) => config.webserver_port = port,
            None => warn!(key = "HRMS_PORT", value = %v, "invalid port env var, ignoring"),
        }
    }
    if let Some(v) = read("HRMS_LOG_LEVEL") {
        config.log_level = v;
    }
}

/// Parse a port in `1..=65535`.
pub fn parse_port(val: &str) -> Option<u16> {
    val.trim().parse::<u16>().ok().filter(|p| *p != 0)
}
