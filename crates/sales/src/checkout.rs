//! The sale/transfer flow: gate, pick a lot, re-check, commit.
//!
//! UI action → module-level permission gate → lot selection from the visible
//! set → location resolved from the lot → transaction-level permission check
//! against that resolved location → command committed through the store.
//! The second check is not redundant: the first one gates the screen, the
//! second one binds the decision to the concrete location the stock actually
//! moves at.

use chrono::{DateTime, Utc};

use lotkeeper_auth::{ensure, Action, Module, Session};
use lotkeeper_core::{
    CustomerId, DomainError, DomainResult, LocationId, LotId, SaleId, TransferId,
};
use lotkeeper_inventory::{
    execute, resolver, Product, ProductLot, RecordSale, RecordTransfer, StockCommand,
    StockEventStore,
};
use lotkeeper_locations::LocationDirectory;

use crate::records::{Sale, Transfer};

// ─────────────────────────────────────────────────────────────────────────────
// Sale
// ─────────────────────────────────────────────────────────────────────────────

/// A sale in progress: the lot picker state.
///
/// `sale_location` is a derived field. It only ever changes by selecting a
/// different lot, which re-resolves it; there is no way to edit it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    product: Product,
    candidate_lots: Vec<ProductLot>,
    selected: Option<ProductLot>,
    sale_location: Option<LocationId>,
}

impl SaleDraft {
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Lots offered to the user, already filtered to the accessible ones.
    pub fn candidate_lots(&self) -> &[ProductLot] {
        &self.candidate_lots
    }

    pub fn selected_lot(&self) -> Option<&ProductLot> {
        self.selected.as_ref()
    }

    pub fn sale_location(&self) -> Option<LocationId> {
        self.sale_location
    }

    /// Select (or re-select) a lot and re-resolve the sale location from it.
    pub fn select_lot(&mut self, lot_id: LotId) -> DomainResult<LocationId> {
        let lot = self
            .candidate_lots
            .iter()
            .find(|l| l.id == lot_id)
            .ok_or(DomainError::NotFound)?
            .clone();
        let location = resolver::resolve_transaction_location(&lot);
        self.selected = Some(lot);
        self.sale_location = Some(location);
        Ok(location)
    }
}

/// Gate the sale screen and build the lot picker.
///
/// Fails with `PermissionDenied` when the session may not add sales at all;
/// an empty candidate list (nothing sellable from here) is a normal outcome.
pub fn begin_sale(
    session: &Session,
    product: &Product,
    lots: &[ProductLot],
    directory: &LocationDirectory,
) -> DomainResult<SaleDraft> {
    ensure(session, Module::Sales, Action::Add, None, directory)?;

    let access = session.accessible_locations();
    let candidate_lots = resolver::visible_lots(product, lots, &access);

    Ok(SaleDraft {
        product: product.clone(),
        candidate_lots,
        selected: None,
        sale_location: None,
    })
}

/// Commit a drafted sale.
///
/// Re-resolves the location from the selected lot, runs the transaction-level
/// check against it, and only then decrements stock through the store. The
/// returned record carries the resolved location for persistence.
#[allow(clippy::too_many_arguments)]
pub fn commit_sale(
    draft: &SaleDraft,
    session: &Session,
    directory: &LocationDirectory,
    store: &dyn StockEventStore,
    sale_id: SaleId,
    quantity: u64,
    customer_id: Option<CustomerId>,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Sale> {
    let lot = draft
        .selected_lot()
        .ok_or_else(|| DomainError::validation("no lot selected"))?;

    let location_id = resolver::resolve_transaction_location(lot);
    ensure(session, Module::Sales, Action::Add, Some(location_id), directory)?;

    execute(
        store,
        &StockCommand::RecordSale(RecordSale {
            product_id: draft.product.id,
            lot_id: lot.id,
            quantity,
            occurred_at,
        }),
    )?;

    Ok(Sale {
        id: sale_id,
        product_id: draft.product.id,
        lot_id: lot.id,
        location_id,
        quantity,
        unit_price: lot.unit_price,
        customer_id,
        sold_by: session.user_id,
        occurred_at,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfer
// ─────────────────────────────────────────────────────────────────────────────

/// A transfer in progress; mirrors [`SaleDraft`] for the move flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    product: Product,
    candidate_lots: Vec<ProductLot>,
    selected: Option<ProductLot>,
    source_location: Option<LocationId>,
}

impl TransferDraft {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn candidate_lots(&self) -> &[ProductLot] {
        &self.candidate_lots
    }

    pub fn selected_lot(&self) -> Option<&ProductLot> {
        self.selected.as_ref()
    }

    pub fn source_location(&self) -> Option<LocationId> {
        self.source_location
    }

    /// Select (or re-select) the source lot; the source location follows it.
    pub fn select_lot(&mut self, lot_id: LotId) -> DomainResult<LocationId> {
        let lot = self
            .candidate_lots
            .iter()
            .find(|l| l.id == lot_id)
            .ok_or(DomainError::NotFound)?
            .clone();
        let location = resolver::resolve_transaction_location(&lot);
        self.selected = Some(lot);
        self.source_location = Some(location);
        Ok(location)
    }
}

/// Gate the transfer screen and build the source-lot picker.
pub fn begin_transfer(
    session: &Session,
    product: &Product,
    lots: &[ProductLot],
    directory: &LocationDirectory,
) -> DomainResult<TransferDraft> {
    ensure(session, Module::Inventory, Action::Transfer, None, directory)?;

    let access = session.accessible_locations();
    let candidate_lots = resolver::visible_lots(product, lots, &access);

    Ok(TransferDraft {
        product: product.clone(),
        candidate_lots,
        selected: None,
        source_location: None,
    })
}

/// Commit a drafted transfer.
///
/// The source location is resolved from the selected lot and re-checked; the
/// destination must be classifiable and inside the user's accessible set.
#[allow(clippy::too_many_arguments)]
pub fn commit_transfer(
    draft: &TransferDraft,
    session: &Session,
    directory: &LocationDirectory,
    store: &dyn StockEventStore,
    transfer_id: TransferId,
    quantity: u64,
    to_location_id: LocationId,
    new_lot_id: LotId,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Transfer> {
    let lot = draft
        .selected_lot()
        .ok_or_else(|| DomainError::validation("no lot selected"))?;

    let from_location_id = resolver::resolve_transaction_location(lot);
    ensure(
        session,
        Module::Inventory,
        Action::Transfer,
        Some(from_location_id),
        directory,
    )?;

    // The destination carries no kind constraint (warehouse → showroom is the
    // normal replenishment move), but it must exist and be reachable.
    directory.kind_of(to_location_id)?;
    if !session.accessible_locations().contains(to_location_id) {
        return Err(DomainError::PermissionDenied {
            module: Module::Inventory.to_string(),
            action: Action::Transfer.to_string(),
            location: Some(to_location_id.to_string()),
        });
    }

    execute(
        store,
        &StockCommand::RecordTransfer(RecordTransfer {
            product_id: draft.product.id,
            lot_id: lot.id,
            quantity,
            to_location_id,
            new_lot_id,
            occurred_at,
        }),
    )?;

    Ok(Transfer {
        id: transfer_id,
        product_id: draft.product.id,
        lot_id: lot.id,
        new_lot_id,
        from_location_id,
        to_location_id,
        quantity,
        moved_by: session.user_id,
        occurred_at,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lotkeeper_core::{ProductId, UserId};
    use lotkeeper_inventory::{load_stock, AddStock, CreateProduct, InMemoryStockStore};
    use lotkeeper_locations::{Location, LocationKind};

    struct Fixture {
        directory: LocationDirectory,
        warehouse: LocationId,
        showroom: LocationId,
        other_showroom: LocationId,
        store: InMemoryStockStore,
        product_id: ProductId,
    }

    /// Product nominally at the warehouse, with lot #1 there and lot #2 in
    /// the showroom.
    fn fixture() -> Fixture {
        let warehouse = LocationId::new();
        let showroom = LocationId::new();
        let other_showroom = LocationId::new();
        let directory = LocationDirectory::new([
            Location::new(warehouse, LocationKind::Warehouse, "Back warehouse"),
            Location::new(showroom, LocationKind::Showroom, "City showroom"),
            Location::new(other_showroom, LocationKind::Showroom, "Mall showroom"),
        ]);

        let store = InMemoryStockStore::new();
        let product_id = ProductId::new();
        execute(
            &store,
            &StockCommand::CreateProduct(CreateProduct {
                product_id,
                name: "Leather armchair".to_string(),
                sku: "ARM-11".to_string(),
                location_id: warehouse,
                lot_id: LotId::new(),
                opening_quantity: 12,
                unit_price: 45_000,
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();
        execute(
            &store,
            &StockCommand::AddStock(AddStock {
                product_id,
                lot_id: LotId::new(),
                location_id: showroom,
                quantity: 4,
                unit_price: 45_000,
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();

        Fixture {
            directory,
            warehouse,
            showroom,
            other_showroom,
            store,
            product_id,
        }
    }

    fn product_and_lots(f: &Fixture) -> (Product, Vec<ProductLot>) {
        let stock = load_stock(&f.store, f.product_id).unwrap();
        (stock.snapshot().unwrap(), stock.lots().to_vec())
    }

    #[test]
    fn sales_manager_sells_from_the_showroom_lot() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom));
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_sale(&session, &product, &lots, &f.directory).unwrap();
        // Only the showroom lot is on offer; the warehouse lot is out of reach.
        assert_eq!(draft.candidate_lots().len(), 1);
        let lot_id = draft.candidate_lots()[0].id;

        let resolved = draft.select_lot(lot_id).unwrap();
        assert_eq!(resolved, f.showroom);

        let sale = commit_sale(
            &draft,
            &session,
            &f.directory,
            &f.store,
            SaleId::new(),
            2,
            Some(CustomerId::new()),
            Utc::now(),
        )
        .unwrap();

        // The sale is attributed to the lot's location, not the product's
        // nominal warehouse.
        assert_eq!(sale.location_id, f.showroom);
        assert_eq!(sale.total_price(), 90_000);

        let stock = load_stock(&f.store, f.product_id).unwrap();
        assert_eq!(stock.total_stock(), 14);
    }

    #[test]
    fn reselecting_a_lot_re_resolves_the_sale_location() {
        let f = fixture();
        let session = Session::super_admin(UserId::new());
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_sale(&session, &product, &lots, &f.directory).unwrap();
        assert_eq!(draft.candidate_lots().len(), 2);
        assert_eq!(draft.sale_location(), None);

        let warehouse_lot = draft.candidate_lots()[0].id;
        let showroom_lot = draft.candidate_lots()[1].id;

        draft.select_lot(warehouse_lot).unwrap();
        assert_eq!(draft.sale_location(), Some(f.warehouse));

        draft.select_lot(showroom_lot).unwrap();
        assert_eq!(draft.sale_location(), Some(f.showroom));
    }

    #[test]
    fn admin_without_showroom_grant_cannot_open_the_sale_screen() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse]);
        let (product, lots) = product_and_lots(&f);

        let err = begin_sale(&session, &product, &lots, &f.directory).unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied { .. }));
    }

    #[test]
    fn commit_without_a_selected_lot_is_a_validation_error() {
        let f = fixture();
        let session = Session::super_admin(UserId::new());
        let (product, lots) = product_and_lots(&f);

        let draft = begin_sale(&session, &product, &lots, &f.directory).unwrap();
        let err = commit_sale(
            &draft,
            &session,
            &f.directory,
            &f.store,
            SaleId::new(),
            1,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn overselling_rejects_the_sale_whole() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom));
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_sale(&session, &product, &lots, &f.directory).unwrap();
        let lot_id = draft.candidate_lots()[0].id;
        draft.select_lot(lot_id).unwrap();

        let err = commit_sale(
            &draft,
            &session,
            &f.directory,
            &f.store,
            SaleId::new(),
            99,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        // Nothing moved.
        let stock = load_stock(&f.store, f.product_id).unwrap();
        assert_eq!(stock.total_stock(), 16);
    }

    #[test]
    fn sales_manager_cannot_open_the_transfer_screen() {
        let f = fixture();
        let session = Session::sales_manager(UserId::new(), Some(f.showroom));
        let (product, lots) = product_and_lots(&f);

        let err = begin_transfer(&session, &product, &lots, &f.directory).unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied { .. }));
    }

    #[test]
    fn admin_moves_stock_from_warehouse_to_showroom() {
        let f = fixture();
        let session = Session::admin(UserId::new(), [f.warehouse, f.showroom]);
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_transfer(&session, &product, &lots, &f.directory).unwrap();
        let warehouse_lot = draft
            .candidate_lots()
            .iter()
            .find(|l| l.location_id == f.warehouse)
            .unwrap()
            .id;
        let resolved = draft.select_lot(warehouse_lot).unwrap();
        assert_eq!(resolved, f.warehouse);

        let transfer = commit_transfer(
            &draft,
            &session,
            &f.directory,
            &f.store,
            TransferId::new(),
            5,
            f.showroom,
            LotId::new(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(transfer.from_location_id, f.warehouse);
        assert_eq!(transfer.to_location_id, f.showroom);

        let stock = load_stock(&f.store, f.product_id).unwrap();
        assert_eq!(stock.total_stock(), 16);
        assert_eq!(stock.lot(transfer.new_lot_id).unwrap().location_id, f.showroom);
        assert_eq!(stock.lot(transfer.new_lot_id).unwrap().quantity, 5);
    }

    #[test]
    fn transfer_to_an_unreachable_destination_is_denied() {
        let f = fixture();
        // No grant on the second showroom.
        let session = Session::admin(UserId::new(), [f.warehouse, f.showroom]);
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_transfer(&session, &product, &lots, &f.directory).unwrap();
        let warehouse_lot = draft
            .candidate_lots()
            .iter()
            .find(|l| l.location_id == f.warehouse)
            .unwrap()
            .id;
        draft.select_lot(warehouse_lot).unwrap();

        let err = commit_transfer(
            &draft,
            &session,
            &f.directory,
            &f.store,
            TransferId::new(),
            5,
            f.other_showroom,
            LotId::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied { .. }));
    }

    #[test]
    fn transfer_to_an_unknown_destination_is_a_configuration_error() {
        let f = fixture();
        let session = Session::super_admin(UserId::new());
        let (product, lots) = product_and_lots(&f);

        let mut draft = begin_transfer(&session, &product, &lots, &f.directory).unwrap();
        let lot_id = draft.candidate_lots()[0].id;
        draft.select_lot(lot_id).unwrap();

        let err = commit_transfer(
            &draft,
            &session,
            &f.directory,
            &f.store,
            TransferId::new(),
            1,
            LocationId::new(),
            LotId::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }
}
