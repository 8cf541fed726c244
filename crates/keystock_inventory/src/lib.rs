//! Tiered license key inventory for keystock.
//!
//! The inventory maps each [`Tier`] to an ordered list of key strings. Keys
//! leave a tier from the front, so the oldest uploads are issued first.
//!
//! # Architecture
//!
//! - **tier**: the four fixed tiers and their parsing
//! - **inventory**: the in-memory [`Inventory`] model
//! - **codec**: stock file layouts (JSON, plus the legacy line layout for import)
//! - **store**: [`KeyStore`], the shared handle that serializes every
//!   read-modify-persist sequence behind one lock
//!
//! # Example
//!
//! ```no_run
//! use keystock_inventory::{KeyStore, Tier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = KeyStore::open("stock.json").await;
//! store.add(Tier::Day, vec!["A1".to_string(), "A2".to_string()]).await;
//!
//! let issued = store.take(Tier::Day, 1).await?;
//! assert_eq!(issued.value(), &vec!["A1".to_string()]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod inventory;
mod store;
mod tier;

pub use codec::{STOCK_FILE_VERSION, decode, decode_legacy, encode, is_legacy};
pub use inventory::Inventory;
pub use store::{Durability, KeyStore, Mutation, Reservation, load, save};
pub use tier::Tier;
