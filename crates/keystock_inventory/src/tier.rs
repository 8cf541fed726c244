//! Key tiers.

use keystock_error::{InventoryError, InventoryErrorKind};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// License duration tier a key belongs to.
///
/// Declaration order is the fixed iteration order used for listing and
/// persisting stock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    /// One-day keys
    Day,
    /// One-week keys
    Week,
    /// One-month keys
    Month,
    /// Lifetime keys
    Lifetime,
}

impl Tier {
    /// Parse a tier name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use keystock_inventory::Tier;
    ///
    /// assert_eq!(Tier::parse("Week").unwrap(), Tier::Week);
    /// assert!(Tier::parse("year").is_err());
    /// ```
    #[track_caller]
    pub fn parse(name: &str) -> Result<Self, InventoryError> {
        name.parse()
            .map_err(|_| InventoryError::new(InventoryErrorKind::UnknownTier(name.to_string())))
    }

    /// Lowercase tier name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Tier name with a leading capital, for display in stock listings.
    pub fn title(self) -> &'static str {
        match self {
            Tier::Day => "Day",
            Tier::Week => "Week",
            Tier::Month => "Month",
            Tier::Lifetime => "Lifetime",
        }
    }

    /// All tiers in iteration order.
    pub fn all() -> impl Iterator<Item = Tier> {
        Tier::iter()
    }

    /// Whether `name` is exactly a lowercase tier name.
    ///
    /// The legacy stock layout treats such lines as tier headers.
    pub fn is_header(name: &str) -> bool {
        Tier::all().any(|tier| tier.name() == name)
    }
}
