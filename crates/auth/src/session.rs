use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lotkeeper_core::{LocationId, UserId};
use lotkeeper_locations::AccessibleLocations;

use crate::Role;

/// The authenticated identity for one login.
///
/// Created by the session collaborator at login and destroyed at logout;
/// immutable in between. Every evaluator/resolver call receives the session
/// explicitly — there is no ambient "current user" state to reach for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    /// Single-location roles: where this user works.
    pub assigned_location: Option<LocationId>,
    /// Multi-location roles: the explicitly granted set.
    pub location_grants: BTreeSet<LocationId>,
}

impl Session {
    pub fn super_admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::SuperAdmin,
            assigned_location: None,
            location_grants: BTreeSet::new(),
        }
    }

    pub fn admin(user_id: UserId, grants: impl IntoIterator<Item = LocationId>) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            assigned_location: None,
            location_grants: grants.into_iter().collect(),
        }
    }

    pub fn sales_manager(user_id: UserId, assigned: Option<LocationId>) -> Self {
        Self {
            user_id,
            role: Role::SalesManager,
            assigned_location: assigned,
            location_grants: BTreeSet::new(),
        }
    }

    pub fn basic_user(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::User,
            assigned_location: None,
            location_grants: BTreeSet::new(),
        }
    }

    /// Derive the set of locations this session may act on.
    ///
    /// - super admin: the universal set (sentinel, not an enumeration)
    /// - admin: the explicit grant set
    /// - sales manager: the assigned location, or nothing if unassigned
    /// - anything else: nothing
    pub fn accessible_locations(&self) -> AccessibleLocations {
        match self.role {
            Role::SuperAdmin => AccessibleLocations::All,
            Role::Admin => {
                AccessibleLocations::from_iter(self.location_grants.iter().copied())
            }
            Role::SalesManager => match self.assigned_location {
                Some(location) => AccessibleLocations::only(location),
                None => AccessibleLocations::none(),
            },
            Role::User => AccessibleLocations::none(),
        }
    }
}
