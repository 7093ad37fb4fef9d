//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants, authorization, stock integrity). Transient infrastructure
/// failures belong to the data-access collaborator, which also owns retries;
/// nothing in this taxonomy is retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource (product, lot, location) was not found.
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The evaluator denied an action at a mutation boundary.
    ///
    /// Names the missing capability so the presentation layer can surface an
    /// actionable message. A denial is never coerced into a success.
    #[error("permission denied: {action} on {module}{}", location_suffix(.location))]
    PermissionDenied {
        module: String,
        action: String,
        location: Option<String>,
    },

    /// A lot-quantity decrement would go negative.
    ///
    /// The whole transaction is rejected; no partial stock movement happens.
    #[error("insufficient stock in lot {lot}: requested {requested}, available {available}")]
    InsufficientStock {
        lot: String,
        requested: u64,
        available: u64,
    },

    /// Reference data or identifiers are inconsistent (unknown role, unknown
    /// module/action, unclassifiable location). A defect, not a user error;
    /// never silently defaults to "allow".
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(loc) => format!(" at location {loc}"),
        None => String::new(),
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
