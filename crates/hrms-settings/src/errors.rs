//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when resolving or loading site configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read a configuration file from disk.
    #[error("failed to read site config: {0}")]
    Io(#[from] std::io::Error),
    /// A configuration file held invalid JSON.
    #[error("failed to parse site config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// No site was given and `currentsite.txt` is absent or empty.
    #[error("no site selected: pass --site, set HRMS_SITE or write sites/currentsite.txt")]
    NoSite,
    /// The selected site has no directory under `sites/`.
    #[error("site not found: {}", .0.display())]
    SiteNotFound(PathBuf),
    /// A settings value was invalid.
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(err.to_string().contains("parse site config JSON"));
    }

    #[test]
    fn site_not_found_shows_path() {
        let err = SettingsError::SiteNotFound(PathBuf::from("sites/missing.localhost"));
        assert_eq!(err.to_string(), "site not found: sites/missing.localhost");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SettingsError = io_err.into();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
