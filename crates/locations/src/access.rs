use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lotkeeper_core::LocationId;

/// The set of locations a user may act on.
///
/// `All` is a sentinel for the universal set (super admins), not an
/// enumerated list: callers must handle it distinctly (typically by skipping
/// location filtering entirely) so that newly added locations are covered
/// without any grant changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessibleLocations {
    /// Every location, present and future.
    All,
    /// An explicit, possibly empty, set of locations.
    Specific(BTreeSet<LocationId>),
}

impl AccessibleLocations {
    /// An empty explicit set (no access at all).
    pub fn none() -> Self {
        AccessibleLocations::Specific(BTreeSet::new())
    }

    /// A singleton set (single-location roles).
    pub fn only(location: LocationId) -> Self {
        AccessibleLocations::Specific(BTreeSet::from([location]))
    }

    pub fn from_iter(locations: impl IntoIterator<Item = LocationId>) -> Self {
        AccessibleLocations::Specific(locations.into_iter().collect())
    }

    pub fn contains(&self, location: LocationId) -> bool {
        match self {
            AccessibleLocations::All => true,
            AccessibleLocations::Specific(set) => set.contains(&location),
        }
    }

    /// True when the user can act on no location whatsoever.
    ///
    /// `All` is never empty, even if the directory currently holds no
    /// locations: the sentinel covers locations added later.
    pub fn is_empty(&self) -> bool {
        match self {
            AccessibleLocations::All => false,
            AccessibleLocations::Specific(set) => set.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_any_location() {
        let access = AccessibleLocations::All;
        assert!(access.contains(LocationId::new()));
        assert!(!access.is_empty());
    }

    #[test]
    fn specific_contains_only_granted_locations() {
        let granted = LocationId::new();
        let other = LocationId::new();
        let access = AccessibleLocations::only(granted);
        assert!(access.contains(granted));
        assert!(!access.contains(other));
    }

    #[test]
    fn none_is_empty() {
        assert!(AccessibleLocations::none().is_empty());
    }
}
