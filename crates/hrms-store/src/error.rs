//! Store error types.

/// Errors raised by the session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite failure.
    #[error("database error: {0}")]
    Database(String),

    /// The requested row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem failure while opening the database.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rusqlite_error_converts() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound("session abc".into());
        assert_eq!(err.to_string(), "not found: session abc");
    }
}
