use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotkeeper_core::{CustomerId, LocationId, LotId, ProductId, SaleId, TransferId, UserId};

/// A committed sale, handed to the data-access collaborator for persistence.
///
/// `location_id` is the **resolved** location — the selected lot's, never the
/// product's nominal one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub location_id: LocationId,
    pub quantity: u64,
    /// Price in smallest currency unit, taken from the lot.
    pub unit_price: u64,
    pub customer_id: Option<CustomerId>,
    pub sold_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl Sale {
    /// Total price of the sale in smallest currency unit.
    pub fn total_price(&self) -> u64 {
        self.quantity * self.unit_price
    }
}

/// A committed stock transfer.
///
/// `from_location_id` is resolved from the source lot; the moved quantity
/// continues life as `new_lot_id` at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub new_lot_id: LotId,
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    pub quantity: u64,
    pub moved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}
