//! Shared key store backed by the stock file.

use crate::{Inventory, Tier, codec};
use keystock_error::{InventoryError, StorageError, StorageErrorKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, instrument, warn};

/// Whether a mutation reached the stock file.
#[derive(Debug, Clone)]
pub enum Durability {
    /// The full inventory was written to disk.
    Persisted,
    /// The in-memory inventory changed but the write failed.
    MemoryOnly(StorageError),
}

impl Durability {
    /// Whether the mutation was written to disk.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Durability::Persisted)
    }
}

/// Result of a store mutation together with its durability.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    value: T,
    durability: Durability,
}

impl<T> Mutation<T> {
    /// The operation's value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether the mutation was persisted.
    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    /// Split into value and durability.
    pub fn into_parts(self) -> (T, Durability) {
        (self.value, self.durability)
    }
}

/// Read the stock file at `path`.
///
/// Never fails: a missing file, a read error, or undecodable contents all
/// yield an empty inventory. Undecodable files are moved aside to
/// `<path>.corrupt` first so the next save cannot overwrite them.
///
/// A file in the line layout is converted in place: the original is kept as
/// `<path>.legacy` and the imported stock is written back as JSON.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Inventory {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("Stock file not found, starting with empty inventory");
            return Inventory::new();
        }
        Err(e) => {
            let err = StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )));
            error!(error = %err, "Failed to read stock file, starting with empty inventory");
            return Inventory::new();
        }
    };

    match codec::decode(&contents) {
        Ok(inventory) => {
            info!(keys = inventory.total(), "Loaded stock file");
            inventory
        }
        Err(_) if codec::is_legacy(&contents) => convert_legacy(path, &contents).await,
        Err(err) => {
            error!(error = %err, "Stock file is unreadable, starting with empty inventory");
            let backup = sibling(path, ".corrupt");
            match tokio::fs::rename(path, &backup).await {
                Ok(()) => warn!(backup = %backup.display(), "Moved unreadable stock file aside"),
                Err(e) => error!(error = %e, "Failed to move unreadable stock file aside"),
            }
            Inventory::new()
        }
    }
}

/// Import a line-layout stock file found at the JSON path.
async fn convert_legacy(path: &Path, contents: &str) -> Inventory {
    let inventory = codec::decode_legacy(contents);
    let backup = sibling(path, ".legacy");
    info!(keys = inventory.total(), "Stock file uses the line layout, converting");

    if let Err(e) = tokio::fs::copy(path, &backup).await {
        // Without a backup the original stays in place until the next mutation.
        error!(backup = %backup.display(), error = %e, "Failed to back up line-layout stock file");
        return inventory;
    }

    if !save(path, &inventory).await.is_persisted() {
        warn!("Converted stock is held in memory only");
    }
    inventory
}

/// Write the full inventory to `path`.
///
/// Writes a temp file and renames it over the target. Failures are logged
/// and reported through [`Durability::MemoryOnly`] rather than returned.
#[instrument(skip_all, fields(path = %path.display(), keys = inventory.total()))]
pub async fn save(path: &Path, inventory: &Inventory) -> Durability {
    match write_stock(path, inventory).await {
        Ok(()) => {
            debug!("Saved stock file");
            Durability::Persisted
        }
        Err(err) => {
            error!(error = %err, "Failed to save stock file");
            Durability::MemoryOnly(err)
        }
    }
}

async fn write_stock(path: &Path, inventory: &Inventory) -> Result<(), StorageError> {
    let contents = codec::encode(inventory)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let temp_path = sibling(path, ".tmp");
    tokio::fs::write(&temp_path, contents).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Shared handle to the key inventory and its stock file.
///
/// Clones share the same inventory. Every operation takes the store lock for
/// its whole read-modify-persist sequence, so concurrent command handlers
/// never act on a stale view.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: Arc<PathBuf>,
    inventory: Arc<Mutex<Inventory>>,
}

impl KeyStore {
    /// Load the stock file at `path` and wrap it in a store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let inventory = load(&path).await;
        Self::from_inventory(path, inventory)
    }

    /// Open the store, importing a legacy stock file when `path` does not
    /// exist yet.
    ///
    /// The imported stock is written to `path` straight away.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open_with_legacy(path: impl AsRef<Path>, legacy: Option<&Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let exists = tokio::fs::try_exists(&path).await.unwrap_or(true);

        if !exists
            && let Some(legacy) = legacy
            && tokio::fs::try_exists(legacy).await.unwrap_or(false)
        {
            match tokio::fs::read_to_string(legacy).await {
                Ok(contents) => {
                    let inventory = codec::decode_legacy(&contents);
                    info!(
                        legacy = %legacy.display(),
                        keys = inventory.total(),
                        "Importing legacy stock file"
                    );
                    let durability = save(&path, &inventory).await;
                    if !durability.is_persisted() {
                        warn!("Imported stock is held in memory only");
                    }
                    return Self::from_inventory(path, inventory);
                }
                Err(e) => {
                    error!(
                        legacy = %legacy.display(),
                        error = %e,
                        "Failed to read legacy stock file"
                    );
                }
            }
        }

        Self::open(path).await
    }

    /// Wrap an existing inventory without touching disk.
    pub fn from_inventory(path: impl Into<PathBuf>, inventory: Inventory) -> Self {
        Self {
            path: Arc::new(path.into()),
            inventory: Arc::new(Mutex::new(inventory)),
        }
    }

    /// Path of the stock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current inventory.
    pub async fn snapshot(&self) -> Inventory {
        self.inventory.lock().await.clone()
    }

    /// Key count per tier, in tier order.
    pub async fn counts(&self) -> Vec<(Tier, usize)> {
        self.inventory.lock().await.counts()
    }

    /// Split `keys` into those present in some tier and those that are not,
    /// keeping input order in both.
    pub async fn partition_known(&self, keys: &[String]) -> (Vec<String>, Vec<String>) {
        let inventory = self.inventory.lock().await;
        keys.iter()
            .cloned()
            .partition(|key| inventory.contains_key(key))
    }

    /// Append keys to a tier and persist.
    #[instrument(skip(self, keys), fields(tier = %tier, count = keys.len()))]
    pub async fn add(&self, tier: Tier, keys: Vec<String>) -> Mutation<usize> {
        let mut inventory = self.inventory.lock().await;
        let added = inventory.append(tier, keys);
        let durability = save(&self.path, &inventory).await;
        info!(added, available = inventory.len(tier), "Added keys");
        Mutation {
            value: added,
            durability,
        }
    }

    /// Remove the oldest `count` keys of a tier and persist.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when the tier holds fewer than `count`
    /// keys; nothing is changed or written in that case.
    #[instrument(skip(self), fields(tier = %tier))]
    pub async fn take(
        &self,
        tier: Tier,
        count: usize,
    ) -> Result<Mutation<Vec<String>>, InventoryError> {
        let mut inventory = self.inventory.lock().await;
        let keys = inventory.take_front(tier, count)?;
        let durability = save(&self.path, &inventory).await;
        info!(taken = keys.len(), available = inventory.len(tier), "Took keys");
        Ok(Mutation {
            value: keys,
            durability,
        })
    }

    /// Put previously taken keys back at the front of a tier and persist.
    #[instrument(skip(self, keys), fields(tier = %tier, count = keys.len()))]
    pub async fn return_to_front(&self, tier: Tier, keys: Vec<String>) -> Durability {
        let mut inventory = self.inventory.lock().await;
        inventory.push_front(tier, keys);
        info!(available = inventory.len(tier), "Returned keys to stock");
        save(&self.path, &inventory).await
    }

    /// Take keys while holding the store lock until the reservation is
    /// released or restored.
    ///
    /// Use this when issuing keys depends on a step that can fail after the
    /// keys are removed, such as a private message.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` without mutation, like [`KeyStore::take`].
    #[instrument(skip(self), fields(tier = %tier))]
    pub async fn reserve(&self, tier: Tier, count: usize) -> Result<Reservation, InventoryError> {
        let mut guard = self.inventory.clone().lock_owned().await;
        let keys = guard.take_front(tier, count)?;
        let durability = save(&self.path, &guard).await;
        debug!(reserved = keys.len(), "Reserved keys");
        Ok(Reservation {
            guard,
            path: self.path.clone(),
            tier,
            keys,
            durability,
        })
    }
}

/// Keys taken from the store while its lock is still held.
///
/// Dropping a reservation is the same as [`Reservation::release`].
#[derive(Debug)]
pub struct Reservation {
    guard: OwnedMutexGuard<Inventory>,
    path: Arc<PathBuf>,
    tier: Tier,
    keys: Vec<String>,
    durability: Durability,
}

impl Reservation {
    /// Tier the keys came from.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Reserved keys, oldest first.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Durability of the removal.
    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    /// Keep the keys out of stock and unlock the store.
    pub fn release(self) -> Vec<String> {
        self.keys
    }

    /// Put the keys back at the front of their tier, persist, and unlock.
    #[instrument(skip(self), fields(tier = %self.tier, count = self.keys.len()))]
    pub async fn restore(self) -> Durability {
        let Reservation {
            mut guard,
            path,
            tier,
            keys,
            ..
        } = self;
        guard.push_front(tier, keys);
        info!(available = guard.len(tier), "Restored reserved keys");
        save(&path, &guard).await
    }
}
