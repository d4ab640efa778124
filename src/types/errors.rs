use std::fmt;

// === StoreError ===

/// Errors related to page store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// Page record with the given ID was not found.
    NotFound(String),
    /// The writer thread has shut down and no longer accepts writes.
    WriterUnavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Page store database error: {}", msg),
            StoreError::NotFound(id) => write!(f, "Page record not found: {}", id),
            StoreError::WriterUnavailable => write!(f, "Page store writer is not available"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
