//! Stock file error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to read the stock file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to write the stock file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Stock file contents could not be decoded
    #[display("Failed to decode stock file: {}", _0)]
    Decode(String),
    /// Inventory could not be encoded
    #[display("Failed to encode stock file: {}", _0)]
    Encode(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use keystock_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileWrite("stock.json: disk full".to_string()));
/// assert!(format!("{}", err).contains("disk full"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
