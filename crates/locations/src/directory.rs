use std::collections::HashMap;

use tracing::warn;

use lotkeeper_core::{DomainError, LocationId};

use crate::access::AccessibleLocations;
use crate::location::{Location, LocationKind};

/// Read-only index over the location reference data.
///
/// The directory is the single classification point: every "is this a
/// warehouse?" question goes through it. A location ID that is missing from
/// the reference data cannot be classified and is reported as a
/// configuration defect — deny-by-default, never a silent fallback.
#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    locations: HashMap<LocationId, Location>,
}

impl LocationDirectory {
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            locations: locations.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Classify a location by ID.
    ///
    /// Unknown IDs are a configuration defect (stale grant, dangling
    /// reference), logged and surfaced as an error.
    pub fn kind_of(&self, id: LocationId) -> Result<LocationKind, DomainError> {
        match self.locations.get(&id) {
            Some(location) => Ok(location.kind),
            None => {
                warn!(location = %id, "location cannot be classified");
                Err(DomainError::configuration(format!(
                    "location {id} is not in the reference data"
                )))
            }
        }
    }

    pub fn is_warehouse(&self, id: LocationId) -> Result<bool, DomainError> {
        Ok(self.kind_of(id)? == LocationKind::Warehouse)
    }

    pub fn is_showroom(&self, id: LocationId) -> Result<bool, DomainError> {
        Ok(self.kind_of(id)? == LocationKind::Showroom)
    }

    /// Does the accessible set contain at least one location of `kind`?
    ///
    /// For the universal set this asks whether any location of that kind
    /// exists at all.
    pub fn contains_kind(
        &self,
        access: &AccessibleLocations,
        kind: LocationKind,
    ) -> Result<bool, DomainError> {
        match access {
            AccessibleLocations::All => {
                Ok(self.locations.values().any(|l| l.kind == kind))
            }
            AccessibleLocations::Specific(set) => {
                for id in set {
                    if self.kind_of(*id)? == kind {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    pub fn contains_warehouse(&self, access: &AccessibleLocations) -> Result<bool, DomainError> {
        self.contains_kind(access, LocationKind::Warehouse)
    }

    pub fn contains_showroom(&self, access: &AccessibleLocations) -> Result<bool, DomainError> {
        self.contains_kind(access, LocationKind::Showroom)
    }
}
