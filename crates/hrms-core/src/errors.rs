//! Boot context error types.

use thiserror::Error;

/// Message returned when the dev-context endpoint is called outside developer mode.
pub const DEVELOPER_MODE_ONLY: &str = "This method is only meant for developer mode";

/// Errors raised while assembling a boot context.
#[derive(Debug, Error)]
pub enum BootError {
    /// The caller is not allowed to perform this operation.
    ///
    /// The payload is a user-facing message.
    #[error("{0}")]
    PermissionDenied(String),
    /// The session service failed to issue or read a token.
    #[error("session error: {0}")]
    Session(String),
    /// Committing pending writes failed.
    #[error("transaction error: {0}")]
    Transaction(String),
}

impl BootError {
    /// The permission error raised outside developer mode.
    pub fn developer_mode_only() -> Self {
        Self::PermissionDenied(DEVELOPER_MODE_ONLY.to_string())
    }

    /// Whether this error should be shown to the caller verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Result type for boot context operations.
pub type Result<T> = std::result::Result<T, BootError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_displays_message_only() {
        let err = BootError::developer_mode_only();
        assert_eq!(err.to_string(), "This method is only meant for developer mode");
    }

    #[test]
    fn session_error_display() {
        let err = BootError::Session("database is locked".into());
        assert_eq!(err.to_string(), "session error: database is locked");
    }

    #[test]
    fn only_permission_errors_are_user_facing() {
        assert!(BootError::developer_mode_only().is_user_facing());
        assert!(!BootError::Session("x".into()).is_user_facing());
        assert!(!BootError::Transaction("x".into()).is_user_facing());
    }
}
