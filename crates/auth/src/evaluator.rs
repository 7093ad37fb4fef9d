//! The single authorization decision point.
//!
//! Every UI gate and every transaction-level check funnels through
//! [`evaluate`]. The per-role rules live in lookup tables ([`Rule`] slices)
//! rather than nested conditionals, so the whole matrix can be audited in one
//! screenful and extended with a new role without touching the algorithm.
//!
//! The evaluator is a pure function of (session, module, action, location)
//! and the static location reference data: deterministic, idempotent,
//! side-effect-free. Denial is a normal [`AccessDecision::Denied`] value —
//! errors are reserved for malformed input (unknown module/action
//! identifiers, unclassifiable locations).

use serde::{Deserialize, Serialize};
use tracing::warn;

use lotkeeper_core::{DomainError, DomainResult, LocationId};
use lotkeeper_locations::LocationDirectory;

use crate::{Role, Session};

// ─────────────────────────────────────────────────────────────────────────────
// Modules & Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Application surface an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Products,
    Inventory,
    Sales,
    Customers,
    Suppliers,
    Categories,
    Samples,
}

impl Module {
    /// Parse a module identifier as supplied by the presentation layer.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "products" => Ok(Module::Products),
            "inventory" => Ok(Module::Inventory),
            "sales" => Ok(Module::Sales),
            "customers" => Ok(Module::Customers),
            "suppliers" => Ok(Module::Suppliers),
            "categories" => Ok(Module::Categories),
            "samples" => Ok(Module::Samples),
            other => {
                warn!(module = other, "unknown module identifier");
                Err(DomainError::configuration(format!(
                    "unknown module: {other}"
                )))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Products => "products",
            Module::Inventory => "inventory",
            Module::Sales => "sales",
            Module::Customers => "customers",
            Module::Suppliers => "suppliers",
            Module::Categories => "categories",
            Module::Samples => "samples",
        }
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
    Transfer,
}

impl Action {
    /// Parse an action identifier as supplied by the presentation layer.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "view" => Ok(Action::View),
            "add" => Ok(Action::Add),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            "transfer" => Ok(Action::Transfer),
            other => {
                warn!(action = other, "unknown action identifier");
                Err(DomainError::configuration(format!(
                    "unknown action: {other}"
                )))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Transfer => "transfer",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule tables
// ─────────────────────────────────────────────────────────────────────────────

/// Location constraint attached to a granted (module, action) pair.
///
/// Module-level checks (no location supplied) ask whether the accessible set
/// *could* satisfy the constraint; transaction-level checks (location
/// supplied) ask whether the concrete location does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationRequirement {
    /// No kind constraint; membership in the accessible set still applies.
    Unrestricted,
    /// Needs a warehouse (stock intake and transfers originate there).
    AnyWarehouse,
    /// Needs a showroom (sales happen there).
    AnyShowroom,
}

/// One row of a role's rule table.
///
/// A module listed with an empty action slice is explicitly shut: it does not
/// fall back to the view-only default for unlisted modules.
struct Rule {
    module: Module,
    actions: &'static [Action],
    requires: LocationRequirement,
}

const ADMIN_RULES: &[Rule] = &[
    Rule {
        module: Module::Products,
        actions: &[Action::View, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Products,
        actions: &[Action::Add],
        requires: LocationRequirement::AnyWarehouse,
    },
    Rule {
        module: Module::Inventory,
        actions: &[Action::View, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Inventory,
        actions: &[Action::Add, Action::Transfer],
        requires: LocationRequirement::AnyWarehouse,
    },
    Rule {
        module: Module::Sales,
        actions: &[Action::View, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Sales,
        actions: &[Action::Add],
        requires: LocationRequirement::AnyShowroom,
    },
    Rule {
        module: Module::Customers,
        actions: &[Action::View, Action::Add, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Suppliers,
        actions: &[Action::View, Action::Add, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Categories,
        actions: &[Action::View, Action::Add, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
];

const SALES_MANAGER_RULES: &[Rule] = &[
    Rule {
        module: Module::Sales,
        actions: &[Action::View, Action::Add, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Customers,
        actions: &[Action::View, Action::Add, Action::Edit],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Products,
        actions: &[Action::View],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Inventory,
        actions: &[Action::View],
        requires: LocationRequirement::Unrestricted,
    },
    // Shut entirely, including view.
    Rule {
        module: Module::Suppliers,
        actions: &[],
        requires: LocationRequirement::Unrestricted,
    },
    Rule {
        module: Module::Categories,
        actions: &[],
        requires: LocationRequirement::Unrestricted,
    },
];

enum TableLookup {
    Granted(LocationRequirement),
    ActionDenied,
    ModuleUnlisted,
}

fn lookup(rules: &[Rule], module: Module, action: Action) -> TableLookup {
    let mut module_listed = false;
    for rule in rules.iter().filter(|r| r.module == module) {
        module_listed = true;
        if rule.actions.contains(&action) {
            return TableLookup::Granted(rule.requires);
        }
    }
    if module_listed {
        TableLookup::ActionDenied
    } else {
        TableLookup::ModuleUnlisted
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Admins categorically cannot delete, regardless of module.
    AdminCannotDelete,
    /// The role's table lists the module but not this action.
    ActionNotPermitted,
    /// The module is shut for this role (or unlisted and the action is a
    /// mutation).
    ModuleNotPermitted,
    /// The action needs a warehouse the user cannot reach.
    NeedsWarehouseAccess,
    /// The action needs a showroom the user cannot reach.
    NeedsShowroomAccess,
    /// Single-location roles may not act outside their assignment.
    OutsideAssignedLocation,
    /// The supplied location is not in the user's accessible set.
    LocationNotAccessible,
    /// The role grants nothing at all.
    NoPermissions,
}

/// A denied decision, carrying everything the presentation layer needs to
/// name the missing capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub role: Role,
    pub module: Module,
    pub action: Action,
    pub location: Option<LocationId>,
    pub reason: DenialReason,
}

impl core::fmt::Display for Denial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.reason {
            DenialReason::AdminCannotDelete => {
                write!(f, "admins cannot delete {} records", self.module)
            }
            DenialReason::ActionNotPermitted => {
                write!(f, "{} may not {} in {}", self.role, self.action, self.module)
            }
            DenialReason::ModuleNotPermitted => {
                write!(f, "{} has no {} access to {}", self.role, self.action, self.module)
            }
            DenialReason::NeedsWarehouseAccess => {
                write!(f, "{} on {} requires warehouse access", self.action, self.module)
            }
            DenialReason::NeedsShowroomAccess => {
                write!(f, "{} on {} requires showroom access", self.action, self.module)
            }
            DenialReason::OutsideAssignedLocation => match self.location {
                Some(loc) => write!(f, "location {loc} is outside the assigned location"),
                None => write!(f, "no location is assigned to this user"),
            },
            DenialReason::LocationNotAccessible => match self.location {
                Some(loc) => write!(f, "location {loc} is not accessible to this user"),
                None => write!(f, "no accessible location for this user"),
            },
            DenialReason::NoPermissions => {
                write!(f, "{} grants no permissions", self.role)
            }
        }
    }
}

/// Outcome of an authorization check.
///
/// Denial is data, not an error: the presentation layer uses it to disable
/// buttons and explain why. Only [`AccessDecision::ensure`] turns a denial
/// into [`DomainError::PermissionDenied`], at mutation boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied(Denial),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    /// Convert a denial into an error, for use at the point of attempted
    /// mutation.
    pub fn ensure(&self) -> DomainResult<()> {
        match self {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::Denied(denial) => Err(DomainError::PermissionDenied {
                module: denial.module.to_string(),
                action: denial.action.to_string(),
                location: denial.location.map(|l| l.to_string()),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Decide whether `session` may perform `action` on `module`.
///
/// Without a location this is a module-level gate (can the UI offer the
/// action at all?). With a location it is a transaction-level check: the
/// location must be in the accessible set AND satisfy the rule's kind
/// constraint — a conjunction, never an override.
///
/// Ordered, first match wins:
/// 1. super admin → allowed
/// 2. admin + delete → denied
/// 3. per-role rule table
/// 4. location membership + kind constraint
pub fn evaluate(
    session: &Session,
    module: Module,
    action: Action,
    location: Option<LocationId>,
    directory: &LocationDirectory,
) -> Result<AccessDecision, DomainError> {
    let deny = |reason| {
        Ok(AccessDecision::Denied(Denial {
            role: session.role,
            module,
            action,
            location,
            reason,
        }))
    };

    if session.role == Role::SuperAdmin {
        return Ok(AccessDecision::Allowed);
    }

    if session.role == Role::Admin && action == Action::Delete {
        return deny(DenialReason::AdminCannotDelete);
    }

    let rules = match session.role {
        Role::Admin => ADMIN_RULES,
        Role::SalesManager => {
            if action == Action::Delete || action == Action::Transfer {
                return deny(DenialReason::ActionNotPermitted);
            }
            if let Some(loc) = location {
                if session.assigned_location != Some(loc) {
                    return deny(DenialReason::OutsideAssignedLocation);
                }
            }
            SALES_MANAGER_RULES
        }
        Role::User => return deny(DenialReason::NoPermissions),
        // Handled above.
        Role::SuperAdmin => unreachable!("super admin short-circuits"),
    };

    let requirement = match lookup(rules, module, action) {
        TableLookup::Granted(requirement) => requirement,
        TableLookup::ActionDenied => return deny(DenialReason::ActionNotPermitted),
        TableLookup::ModuleUnlisted => {
            // Unlisted modules default to view-only.
            if action == Action::View {
                LocationRequirement::Unrestricted
            } else {
                return deny(DenialReason::ModuleNotPermitted);
            }
        }
    };

    let access = session.accessible_locations();

    if let Some(loc) = location {
        if !access.contains(loc) {
            return deny(DenialReason::LocationNotAccessible);
        }
    }

    match requirement {
        LocationRequirement::Unrestricted => Ok(AccessDecision::Allowed),
        LocationRequirement::AnyWarehouse => {
            let satisfied = match location {
                Some(loc) => directory.is_warehouse(loc)?,
                None => directory.contains_warehouse(&access)?,
            };
            if satisfied {
                Ok(AccessDecision::Allowed)
            } else {
                deny(DenialReason::NeedsWarehouseAccess)
            }
        }
        LocationRequirement::AnyShowroom => {
            let satisfied = match location {
                Some(loc) => directory.is_showroom(loc)?,
                None => directory.contains_showroom(&access)?,
            };
            if satisfied {
                Ok(AccessDecision::Allowed)
            } else {
                deny(DenialReason::NeedsShowroomAccess)
            }
        }
    }
}

/// [`evaluate`] over raw module/action identifiers from the presentation
/// layer.
///
/// Identifiers outside the recognized set are a configuration defect, never
/// a silent denial (and certainly never a silent allow).
pub fn evaluate_named(
    session: &Session,
    module: &str,
    action: &str,
    location: Option<LocationId>,
    directory: &LocationDirectory,
) -> Result<AccessDecision, DomainError> {
    let module = Module::parse(module)?;
    let action = Action::parse(action)?;
    evaluate(session, module, action, location, directory)
}

/// Evaluate and turn a denial into [`DomainError::PermissionDenied`].
///
/// Use this at mutation boundaries; use [`evaluate`] when the denial itself
/// is the interesting value (e.g. for disabling UI affordances).
pub fn ensure(
    session: &Session,
    module: Module,
    action: Action,
    location: Option<LocationId>,
    directory: &LocationDirectory,
) -> DomainResult<()> {
    evaluate(session, module, action, location, directory)?.ensure()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lotkeeper_core::UserId;
    use lotkeeper_locations::{Location, LocationKind};

    struct Fixture {
        directory: LocationDirectory,
        warehouse_1: LocationId,
        warehouse_2: LocationId,
        showroom_3: LocationId,
        showroom_4: LocationId,
    }

    fn fixture() -> Fixture {
        let warehouse_1 = LocationId::new();
        let warehouse_2 = LocationId::new();
        let showroom_3 = LocationId::new();
        let showroom_4 = LocationId::new();
        let directory = LocationDirectory::new([
            Location::new(warehouse_1, LocationKind::Warehouse, "Warehouse 1"),
            Location::new(warehouse_2, LocationKind::Warehouse, "Warehouse 2"),
            Location::new(showroom_3, LocationKind::Showroom, "Showroom 3"),
            Location::new(showroom_4, LocationKind::Showroom, "Showroom 4"),
        ]);
        Fixture {
            directory,
            warehouse_1,
            warehouse_2,
            showroom_3,
            showroom_4,
        }
    }

    fn allowed(
        session: &Session,
        module: Module,
        action: Action,
        location: Option<LocationId>,
        directory: &LocationDirectory,
    ) -> bool {
        evaluate(session, module, action, location, directory)
            .unwrap()
            .is_allowed()
    }

    #[test]
    fn super_admin_is_always_allowed() {
        let f = fixture();
        let session = Session::super_admin(UserId::new());
        for module in [Module::Products, Module::Suppliers, Module::Samples] {
            for action in [Action::View, Action::Add, Action::Delete, Action::Transfer] {
                assert!(allowed(&session, module, action, None, &f.directory));
            }
        }
        assert!(allowed(
            &session,
            Module::Sales,
            Action::Add,
            Some(f.showroom_3),
            &f.directory
        ));
    }

    #[test]
    fn admin_cannot_delete_anywhere() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1, f.showroom_3]);
        for module in [Module::Products, Module::Sales, Module::Customers] {
            let decision =
                evaluate(&session, module, Action::Delete, None, &f.directory).unwrap();
            let AccessDecision::Denied(denial) = decision else {
                panic!("expected denial for admin delete");
            };
            assert_eq!(denial.reason, DenialReason::AdminCannotDelete);
        }
    }

    #[test]
    fn admin_without_warehouse_cannot_add_products_but_can_sell() {
        let f = fixture();
        // Both grants are showrooms.
        let session = Session::admin(UserId::new(), [f.showroom_3, f.showroom_4]);

        let decision =
            evaluate(&session, Module::Products, Action::Add, None, &f.directory).unwrap();
        let AccessDecision::Denied(denial) = decision else {
            panic!("expected denial without warehouse access");
        };
        assert_eq!(denial.reason, DenialReason::NeedsWarehouseAccess);

        assert!(allowed(&session, Module::Sales, Action::Add, None, &f.directory));
    }

    #[test]
    fn admin_with_warehouse_can_add_and_transfer() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1, f.showroom_3]);
        assert!(allowed(&session, Module::Products, Action::Add, None, &f.directory));
        assert!(allowed(&session, Module::Inventory, Action::Transfer, None, &f.directory));
        assert!(allowed(&session, Module::Sales, Action::Add, None, &f.directory));
    }

    #[test]
    fn admin_view_and_edit_need_no_location_kind() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.showroom_3]);
        assert!(allowed(&session, Module::Products, Action::View, None, &f.directory));
        assert!(allowed(&session, Module::Products, Action::Edit, None, &f.directory));
        assert!(allowed(&session, Module::Inventory, Action::Edit, None, &f.directory));
        assert!(allowed(&session, Module::Sales, Action::Edit, None, &f.directory));
        assert!(allowed(&session, Module::Suppliers, Action::Add, None, &f.directory));
    }

    #[test]
    fn unlisted_module_defaults_to_view_only() {
        let f = fixture();
        let admin = Session::admin(UserId::new(), [f.warehouse_1]);
        assert!(allowed(&admin, Module::Samples, Action::View, None, &f.directory));
        assert!(!allowed(&admin, Module::Samples, Action::Add, None, &f.directory));

        let manager = Session::sales_manager(UserId::new(), Some(f.showroom_3));
        assert!(allowed(&manager, Module::Samples, Action::View, None, &f.directory));
        assert!(!allowed(&manager, Module::Samples, Action::Edit, None, &f.directory));
    }

    #[test]
    fn sales_manager_never_transfers_or_deletes() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom_3));
        for module in [Module::Inventory, Module::Sales, Module::Products] {
            assert!(!allowed(&session, module, Action::Transfer, None, &f.directory));
            assert!(!allowed(&session, module, Action::Delete, None, &f.directory));
        }
        // Even at the assigned location.
        assert!(!allowed(
            &session,
            Module::Inventory,
            Action::Transfer,
            Some(f.showroom_3),
            &f.directory
        ));
    }

    #[test]
    fn sales_manager_is_fenced_to_the_assigned_location() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom_3));

        assert!(allowed(
            &session,
            Module::Sales,
            Action::Add,
            Some(f.showroom_3),
            &f.directory
        ));

        let decision = evaluate(
            &session,
            Module::Sales,
            Action::Add,
            Some(f.showroom_4),
            &f.directory,
        )
        .unwrap();
        let AccessDecision::Denied(denial) = decision else {
            panic!("expected denial outside the assigned location");
        };
        assert_eq!(denial.reason, DenialReason::OutsideAssignedLocation);
    }

    #[test]
    fn sales_manager_module_limits() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom_3));

        assert!(allowed(&session, Module::Sales, Action::Edit, None, &f.directory));
        assert!(allowed(&session, Module::Customers, Action::Add, None, &f.directory));
        assert!(allowed(&session, Module::Products, Action::View, None, &f.directory));
        assert!(!allowed(&session, Module::Products, Action::Add, None, &f.directory));
        assert!(!allowed(&session, Module::Inventory, Action::Edit, None, &f.directory));

        // Suppliers and categories are shut entirely, view included.
        assert!(!allowed(&session, Module::Suppliers, Action::View, None, &f.directory));
        assert!(!allowed(&session, Module::Categories, Action::View, None, &f.directory));
    }

    #[test]
    fn basic_user_is_denied_everything() {
        let f = fixture();
        let session = Session::basic_user(UserId::new());
        for module in [Module::Products, Module::Sales, Module::Customers] {
            for action in [Action::View, Action::Add, Action::Edit] {
                assert!(!allowed(&session, module, action, None, &f.directory));
            }
        }
    }

    #[test]
    fn transaction_check_is_a_conjunction() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1, f.showroom_3]);

        // Granted warehouse: both conditions hold.
        assert!(allowed(
            &session,
            Module::Products,
            Action::Add,
            Some(f.warehouse_1),
            &f.directory
        ));

        // Granted location of the wrong kind: membership holds, kind does not.
        let decision = evaluate(
            &session,
            Module::Products,
            Action::Add,
            Some(f.showroom_3),
            &f.directory,
        )
        .unwrap();
        let AccessDecision::Denied(denial) = decision else {
            panic!("expected denial at a showroom");
        };
        assert_eq!(denial.reason, DenialReason::NeedsWarehouseAccess);

        // Right kind, but not granted: kind holds, membership does not.
        let decision = evaluate(
            &session,
            Module::Products,
            Action::Add,
            Some(f.warehouse_2),
            &f.directory,
        )
        .unwrap();
        let AccessDecision::Denied(denial) = decision else {
            panic!("expected denial at an ungranted warehouse");
        };
        assert_eq!(denial.reason, DenialReason::LocationNotAccessible);
    }

    #[test]
    fn unknown_location_is_a_configuration_error_not_a_denial() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1]);
        // A location the admin is granted but the directory does not know:
        // build such a session directly.
        let stale = LocationId::new();
        let session = Session::admin(session.user_id, [stale]);
        let err = evaluate(&session, Module::Products, Action::Add, None, &f.directory)
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1, f.showroom_3]);
        let first = evaluate(
            &session,
            Module::Sales,
            Action::Add,
            Some(f.showroom_3),
            &f.directory,
        )
        .unwrap();
        let second = evaluate(
            &session,
            Module::Sales,
            Action::Add,
            Some(f.showroom_3),
            &f.directory,
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ensure_maps_denial_to_permission_denied() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom_3));
        let err = ensure(
            &session,
            Module::Inventory,
            Action::Transfer,
            None,
            &f.directory,
        )
        .unwrap_err();
        let DomainError::PermissionDenied { module, action, .. } = err else {
            panic!("expected PermissionDenied");
        };
        assert_eq!(module, "inventory");
        assert_eq!(action, "transfer");
    }

    #[test]
    fn denial_messages_name_the_missing_capability() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.showroom_3]);
        let decision =
            evaluate(&session, Module::Products, Action::Add, None, &f.directory).unwrap();
        let AccessDecision::Denied(denial) = decision else {
            panic!("expected denial");
        };
        let msg = denial.to_string();
        assert!(msg.contains("warehouse"));
        assert!(msg.contains("products"));
    }

    #[test]
    fn module_and_action_parse_reject_unknown_identifiers() {
        assert!(Module::parse("sales").is_ok());
        assert!(matches!(
            Module::parse("reports").unwrap_err(),
            DomainError::Configuration(_)
        ));
        assert!(Action::parse("edit").is_ok());
        assert!(matches!(
            Action::parse("approve").unwrap_err(),
            DomainError::Configuration(_)
        ));
    }

    #[test]
    fn named_evaluation_accepts_identifiers_and_rejects_garbage() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse_1]);

        let decision =
            evaluate_named(&session, "products", "add", None, &f.directory).unwrap();
        assert!(decision.is_allowed());

        let err = evaluate_named(&session, "products", "approve", None, &f.directory)
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }
}
