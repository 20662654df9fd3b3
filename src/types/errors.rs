use std::fmt;

// === StoreError ===

/// Errors raised by the synchronized key-value store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The persistence backend is missing or switched off.
    Unavailable,
    /// A read call failed.
    ReadFailed(String),
    /// A write call failed; the stored value is unchanged.
    WriteFailed(String),
    /// A stored value could not be encoded or decoded.
    Serialization(String),
    /// The serialized value is larger than the per-item quota.
    QuotaExceeded { key: String, bytes: usize, limit: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "Storage is not available"),
            StoreError::ReadFailed(msg) => write!(f, "Storage read failed: {}", msg),
            StoreError::WriteFailed(msg) => write!(f, "Storage write failed: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StoreError::QuotaExceeded { key, bytes, limit } => write!(
                f,
                "Storage quota exceeded for '{}': {} bytes (limit {})",
                key, bytes, limit
            ),
        }
    }
}

impl std::error::Error for StoreError {}

// === CaptureError ===

/// Errors that abort a capture before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The page has no video element yet.
    NoVideo,
    /// The store is missing; no read or write was attempted.
    StoreUnavailable,
    /// A store read or write failed.
    Store(StoreError),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoVideo => write!(f, "No video found"),
            CaptureError::StoreUnavailable => {
                write!(f, "Storage is not available. Please reload the extension")
            }
            CaptureError::Store(err) => write!(f, "Error saving bookmark: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CaptureError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => CaptureError::StoreUnavailable,
            other => CaptureError::Store(other),
        }
    }
}

// === PanelError ===

/// Errors raised by panel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    /// No bookmark with the given ID is stored.
    NotFound(String),
    /// A store read or write failed.
    Store(StoreError),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            PanelError::Store(err) => write!(f, "Panel storage error: {}", err),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PanelError {
    fn from(err: StoreError) -> Self {
        PanelError::Store(err)
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
