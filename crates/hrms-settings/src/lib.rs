//! # hrms-settings
//!
//! Site configuration loaded from a bench-style `sites/` directory.
//!
//! Settings are layered (in priority order):
//! 1. **Compiled defaults** ([`SiteConfig::default()`])
//! 2. **Common file** `sites/common_site_config.json`
//! 3. **Site file** `sites/<site>/site_config.json`
//! 4. **Environment variables** `HRMS_*` overrides (highest priority)
//!
//! The loaded [`SiteSettings`] implement [`hrms_core::ConfigStore`].

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_site, merge_config_files, resolve_site_name};
pub use types::{SiteConfig, SiteSettings};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _config = SiteConfig::default();
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }
}
