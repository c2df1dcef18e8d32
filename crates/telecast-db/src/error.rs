//! Store error taxonomy.

use thiserror::Error;

/// Errors raised by store operations.
///
/// Absence on a point lookup is never an error; those operations return
/// `Ok(None)` or an empty `Vec`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A persisted value does not match its expected text form
    /// (malformed time-of-day, unknown module tag). Signals corrupted
    /// or hand-edited rows; retrying cannot succeed.
    #[error("malformed value {value:?}: {reason}")]
    Format {
        /// The offending raw value.
        value: String,
        /// What the value failed to satisfy.
        reason: &'static str,
    },

    /// A write would break referential integrity or a uniqueness
    /// constraint. Reported synchronously at the write call; nothing is
    /// committed.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Any other underlying database failure.
    #[error("database error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// Filesystem failure while locating or creating the database.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Integrity(
                    message
                        .clone()
                        .unwrap_or_else(|| String::from("constraint violation")),
                )
            }
            _ => Self::Sqlite(err),
        }
    }
}

impl StoreError {
    /// True if this is an integrity violation.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// True if this is a malformed-value error.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
