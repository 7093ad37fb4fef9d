use serde::{Deserialize, Serialize};

use lotkeeper_core::{LocationId, LotId, ProductId};

/// A quantity of one product at one physical location.
///
/// Lots are the unit of location tracking: `location_id` here is where the
/// stock actually sits, and it is the location every sale or transfer of this
/// lot is attributed to. Lot numbers are per-product, strictly increasing
/// from 1.
///
/// A lot is never deleted by normal operation: once its quantity reaches
/// zero it stays behind as a historical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLot {
    pub id: LotId,
    pub product_id: ProductId,
    pub lot_number: u32,
    pub quantity: u64,
    pub location_id: LocationId,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl ProductLot {
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}
