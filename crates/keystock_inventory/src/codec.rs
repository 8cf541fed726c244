//! Stock file layouts.
//!
//! The current layout is a versioned JSON document with one string array per
//! tier. The legacy layout (tier header lines followed by one key per line) is
//! only ever read, to import stock written by older deployments.

use crate::{Inventory, Tier};
use keystock_error::{StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version written to and required from the JSON stock file.
pub const STOCK_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StockFile {
    version: u32,
    #[serde(default)]
    tiers: BTreeMap<Tier, Vec<String>>,
}

/// Encode an inventory as a JSON stock file.
pub fn encode(inventory: &Inventory) -> Result<String, StorageError> {
    let file = StockFile {
        version: STOCK_FILE_VERSION,
        tiers: inventory
            .iter()
            .map(|(tier, keys)| (tier, keys.to_vec()))
            .collect(),
    };
    serde_json::to_string_pretty(&file)
        .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))
}

/// Decode a JSON stock file.
///
/// # Errors
///
/// Returns [`StorageErrorKind::Decode`] for malformed JSON, unknown tiers, or
/// an unsupported version.
pub fn decode(contents: &str) -> Result<Inventory, StorageError> {
    let file: StockFile = serde_json::from_str(contents)
        .map_err(|e| StorageError::new(StorageErrorKind::Decode(e.to_string())))?;

    if file.version != STOCK_FILE_VERSION {
        return Err(StorageError::new(StorageErrorKind::Decode(format!(
            "unsupported stock file version {} (expected {})",
            file.version, STOCK_FILE_VERSION
        ))));
    }

    Ok(Inventory::from_tiers(file.tiers))
}

/// Decode the legacy line-oriented layout.
///
/// A trimmed line equal to a lowercase tier name switches the current tier;
/// other non-empty lines are appended to it. Lines before the first header
/// are dropped.
///
/// # Examples
///
/// ```
/// use keystock_inventory::{Tier, decode_legacy};
///
/// let inventory = decode_legacy("day\nA1\nA2\nweek\nlifetime\nL1\n");
/// assert_eq!(inventory.len(Tier::Day), 2);
/// assert_eq!(inventory.len(Tier::Week), 0);
/// assert_eq!(inventory.keys(Tier::Lifetime), ["L1".to_string()].as_slice());
/// ```
pub fn decode_legacy(contents: &str) -> Inventory {
    let mut inventory = Inventory::new();
    let mut current: Option<Tier> = None;

    for line in contents.lines().map(str::trim) {
        if Tier::is_header(line) {
            current = Tier::parse(line).ok();
        } else if let Some(tier) = current
            && !line.is_empty()
        {
            inventory.append(tier, [line.to_string()]);
        }
    }

    inventory
}

/// Whether `contents` looks like the legacy layout: the first non-empty
/// line is a tier header.
pub fn is_legacy(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(Tier::is_header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tiers_decode_empty() {
        let inventory = decode(r#"{"version":1,"tiers":{"week":["W1"]}}"#).unwrap();
        assert_eq!(inventory.len(Tier::Day), 0);
        assert_eq!(inventory.keys(Tier::Week), ["W1".to_string()].as_slice());
    }

    #[test]
    fn unknown_tier_is_a_decode_error() {
        let err = decode(r#"{"version":1,"tiers":{"year":["Y1"]}}"#).unwrap_err();
        assert!(matches!(err.kind, StorageErrorKind::Decode(_)));
    }

    #[test]
    fn future_version_is_rejected() {
        let err = decode(r#"{"version":2,"tiers":{}}"#).unwrap_err();
        assert!(matches!(err.kind, StorageErrorKind::Decode(_)));
    }

    #[test]
    fn encoded_tiers_follow_tier_order() {
        let mut inventory = Inventory::new();
        inventory.append(Tier::Lifetime, ["L1".to_string()]);
        inventory.append(Tier::Day, ["D1".to_string()]);

        let json = encode(&inventory).unwrap();
        let day = json.find("\"day\"").unwrap();
        let week = json.find("\"week\"").unwrap();
        let month = json.find("\"month\"").unwrap();
        let lifetime = json.find("\"lifetime\"").unwrap();
        assert!(day < week && week < month && month < lifetime);
    }

    #[test]
    fn legacy_lines_before_first_header_are_ignored() {
        let inventory = decode_legacy("orphan\n\nmonth\n  M1  \n\nM2\n");
        assert_eq!(inventory.total(), 2);
        assert_eq!(
            inventory.keys(Tier::Month),
            ["M1".to_string(), "M2".to_string()].as_slice()
        );
    }

    #[test]
    fn legacy_detection_requires_a_leading_header() {
        assert!(is_legacy("\nday\nA1\n"));
        assert!(is_legacy("lifetime\n"));
        assert!(!is_legacy(r#"{"version":1,"tiers":{}}"#));
        assert!(!is_legacy("A1\nday\n"));
        assert!(!is_legacy(""));
    }
}
