//! In-memory inventory model.

use crate::Tier;
use keystock_error::{InventoryError, InventoryErrorKind};
use std::collections::BTreeMap;

/// Available keys per tier.
///
/// Every tier is always present, possibly with an empty list. Keys are kept
/// in upload order and are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    tiers: BTreeMap<Tier, Vec<String>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            tiers: Tier::all().map(|tier| (tier, Vec::new())).collect(),
        }
    }
}

impl Inventory {
    /// Create an empty inventory with all four tiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory from per-tier key lists. Missing tiers start empty.
    pub fn from_tiers(tiers: impl IntoIterator<Item = (Tier, Vec<String>)>) -> Self {
        let mut inventory = Self::default();
        for (tier, keys) in tiers {
            inventory.append(tier, keys);
        }
        inventory
    }

    /// Keys currently available in a tier, oldest first.
    pub fn keys(&self, tier: Tier) -> &[String] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of keys in a tier.
    pub fn len(&self, tier: Tier) -> usize {
        self.keys(tier).len()
    }

    /// Total number of keys across all tiers.
    pub fn total(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Whether no tier holds any key.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Key count per tier, in tier order.
    pub fn counts(&self) -> Vec<(Tier, usize)> {
        Tier::all().map(|tier| (tier, self.len(tier))).collect()
    }

    /// Iterate tiers and their keys in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[String])> {
        self.tiers.iter().map(|(tier, keys)| (*tier, keys.as_slice()))
    }

    /// Whether a key is present in any tier.
    pub fn contains_key(&self, key: &str) -> bool {
        self.tiers.values().flatten().any(|k| k == key)
    }

    /// Append keys to the back of a tier, returning how many were added.
    pub fn append(&mut self, tier: Tier, keys: impl IntoIterator<Item = String>) -> usize {
        let list = self.tiers.entry(tier).or_default();
        let before = list.len();
        list.extend(keys);
        list.len() - before
    }

    /// Remove and return the first `count` keys of a tier.
    ///
    /// Leaves the tier untouched when it holds fewer than `count` keys.
    #[track_caller]
    pub fn take_front(&mut self, tier: Tier, count: usize) -> Result<Vec<String>, InventoryError> {
        let list = self.tiers.entry(tier).or_default();
        if count > list.len() {
            return Err(InventoryError::new(InventoryErrorKind::InsufficientStock {
                tier: tier.to_string(),
                requested: count,
                available: list.len(),
            }));
        }
        Ok(list.drain(..count).collect())
    }

    /// Reinsert keys at the front of a tier, preserving their order.
    pub fn push_front(&mut self, tier: Tier, keys: impl IntoIterator<Item = String>) {
        let list = self.tiers.entry(tier).or_default();
        list.splice(0..0, keys);
    }
}
