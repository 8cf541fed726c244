//! Inventory validation errors.

/// Inventory error conditions.
///
/// These are user-facing validation failures: the inventory is never
/// mutated when one of them is returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InventoryErrorKind {
    /// Tier name is not one of the known tiers.
    #[display("Unknown tier: {}", _0)]
    UnknownTier(String),

    /// Not enough keys in a tier to satisfy a request.
    #[display("Insufficient {} stock: requested {}, available {}", tier, requested, available)]
    InsufficientStock {
        /// Tier the keys were requested from.
        tier: String,
        /// Number of keys requested.
        requested: usize,
        /// Number of keys available.
        available: usize,
    },
}

/// Inventory error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Inventory Error: {} at line {} in {}", kind, line, file)]
pub struct InventoryError {
    /// The kind of error that occurred
    pub kind: InventoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InventoryError {
    /// Create a new inventory error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use keystock_error::{InventoryError, InventoryErrorKind};
    ///
    /// let err = InventoryError::new(InventoryErrorKind::UnknownTier("year".to_string()));
    /// assert!(format!("{}", err).contains("year"));
    /// ```
    #[track_caller]
    pub fn new(kind: InventoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InventoryErrorKind {
        &self.kind
    }
}
