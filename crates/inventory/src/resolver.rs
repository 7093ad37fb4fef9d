//! Lot visibility and location resolution.
//!
//! These are pure queries over collaborator-supplied records. The central
//! rule: visibility and transaction attribution follow the **lot's** own
//! location, never the product's nominal one. A product whose primary
//! location the user cannot reach is still sellable when one of its lots
//! sits somewhere accessible.

use lotkeeper_core::{LocationId, ProductId};
use lotkeeper_locations::AccessibleLocations;

use crate::lot::ProductLot;
use crate::product::Product;

/// Lots of `product` the user may select for a transaction.
///
/// Filters on the lot's own `location_id` (membership in `access`) and on
/// `quantity > 0`, ordered by lot number ascending. An empty result is a
/// normal outcome, not an error.
pub fn visible_lots(
    product: &Product,
    lots: &[ProductLot],
    access: &AccessibleLocations,
) -> Vec<ProductLot> {
    let mut visible: Vec<ProductLot> = lots
        .iter()
        .filter(|lot| {
            lot.product_id == product.id
                && lot.quantity > 0
                && access.contains(lot.location_id)
        })
        .cloned()
        .collect();
    visible.sort_by_key(|lot| lot.lot_number);
    visible
}

/// Audit variant of [`visible_lots`]: keeps depleted lots.
///
/// History screens want the full trail including lots sold down to zero;
/// transaction selection does not. Two queries, not one query with a flag.
pub fn lot_history(
    product: &Product,
    lots: &[ProductLot],
    access: &AccessibleLocations,
) -> Vec<ProductLot> {
    let mut history: Vec<ProductLot> = lots
        .iter()
        .filter(|lot| lot.product_id == product.id && access.contains(lot.location_id))
        .cloned()
        .collect();
    history.sort_by_key(|lot| lot.lot_number);
    history
}

/// Products the user can see: those with at least one visible lot.
///
/// Deliberately independent of `product.location_id` — filtering the listing
/// on the nominal location hides products whose stock actually sits at an
/// accessible location.
pub fn products_visible_to(
    products: &[Product],
    lots: &[ProductLot],
    access: &AccessibleLocations,
) -> Vec<Product> {
    products
        .iter()
        .filter(|product| {
            lots.iter().any(|lot| {
                lot.product_id == product.id
                    && lot.quantity > 0
                    && access.contains(lot.location_id)
            })
        })
        .cloned()
        .collect()
}

/// The location a transaction against `lot` is attributed to.
///
/// Always the lot's own location. Re-selecting a different lot re-resolves;
/// the transaction location is derived, never edited independently.
pub fn resolve_transaction_location(lot: &ProductLot) -> LocationId {
    lot.location_id
}

/// The lot number the next stock addition for `product_id` receives.
pub fn next_lot_number(product_id: ProductId, lots: &[ProductLot]) -> u32 {
    lots.iter()
        .filter(|lot| lot.product_id == product_id)
        .map(|lot| lot.lot_number)
        .max()
        .unwrap_or(0)
        + 1
}

/// Recompute a product's total stock from its lots.
///
/// Used to repair/verify the aggregate `total_stock` after bulk corrections.
pub fn recalculate_total_stock(product_id: ProductId, lots: &[ProductLot]) -> u64 {
    lots.iter()
        .filter(|lot| lot.product_id == product_id)
        .map(|lot| lot.quantity)
        .sum()
}
