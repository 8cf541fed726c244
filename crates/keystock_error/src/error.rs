//! Top-level error wrapper types.

use crate::{ConfigError, InventoryError, StorageError};

/// Every error condition keystock can report.
///
/// # Examples
///
/// ```
/// use keystock_error::{KeystockError, StorageError, StorageErrorKind};
///
/// let storage = StorageError::new(StorageErrorKind::FileRead("stock.json".to_string()));
/// let err: KeystockError = storage.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum KeystockErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Stock file error
    #[from(StorageError)]
    Storage(StorageError),
    /// Inventory validation error
    #[from(InventoryError)]
    Inventory(InventoryError),
}

/// Keystock error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Keystock Error: {}", _0)]
pub struct KeystockError(Box<KeystockErrorKind>);

impl KeystockError {
    /// Create a new error from a kind.
    pub fn new(kind: KeystockErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KeystockErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to KeystockErrorKind
impl<T> From<T> for KeystockError
where
    T: Into<KeystockErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for keystock operations.
pub type KeystockResult<T> = std::result::Result<T, KeystockError>;
