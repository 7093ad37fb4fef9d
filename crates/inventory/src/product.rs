use serde::{Deserialize, Serialize};

use lotkeeper_core::{LocationId, ProductId};

/// A product as supplied by the data-access collaborator.
///
/// `location_id` is the nominal/primary location: a denormalized display
/// default. It is **not** authoritative for any transaction — the selected
/// lot's location is (see the resolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub location_id: LocationId,
    /// Aggregate over all lots; maintained equal to the sum of lot quantities.
    pub total_stock: u64,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        sku: impl Into<String>,
        location_id: LocationId,
        total_stock: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sku: sku.into(),
            location_id,
            total_stock,
        }
    }
}
