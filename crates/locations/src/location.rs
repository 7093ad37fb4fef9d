use serde::{Deserialize, Serialize};

use lotkeeper_core::{DomainError, LocationId};

/// Physical location kind.
///
/// The kind drives the permission rules: stock intake and transfers happen at
/// warehouses, sales happen at showrooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Warehouse,
    Showroom,
}

impl LocationKind {
    /// Parse a kind identifier as supplied by the data-access collaborator.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "warehouse" => Ok(LocationKind::Warehouse),
            "showroom" => Ok(LocationKind::Showroom),
            other => Err(DomainError::configuration(format!(
                "unknown location kind: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Warehouse => "warehouse",
            LocationKind::Showroom => "showroom",
        }
    }
}

impl core::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warehouse or showroom.
///
/// Static reference data: classification depends only on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub kind: LocationKind,
    pub name: String,
}

impl Location {
    pub fn new(id: LocationId, kind: LocationKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }

    pub fn is_warehouse(&self) -> bool {
        self.kind == LocationKind::Warehouse
    }

    pub fn is_showroom(&self) -> bool {
        self.kind == LocationKind::Showroom
    }
}
