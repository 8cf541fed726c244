//! Error types for keystock.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use keystock_error::{ConfigError, KeystockResult};
//!
//! fn load_token() -> KeystockResult<String> {
//!     Err(ConfigError::new("DISCORD_TOKEN is empty"))?
//! }
//!
//! assert!(load_token().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod inventory;
mod storage;

pub use config::ConfigError;
pub use error::{KeystockError, KeystockErrorKind, KeystockResult};
pub use inventory::{InventoryError, InventoryErrorKind};
pub use storage::{StorageError, StorageErrorKind};
