use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotkeeper_core::{
    Aggregate, AggregateRoot, DomainError, LocationId, LotId, ProductId,
};
use lotkeeper_events::Event;

use crate::lot::ProductLot;
use crate::product::Product;
use crate::resolver;

/// Aggregate root: the stock position of one product across all locations.
///
/// # Invariants
/// - `total_stock` equals the sum of all lot quantities after every applied
///   event.
/// - Lot numbers are assigned in `handle` (assign-and-insert is one unit)
///   and are strictly increasing by 1, starting at 1.
/// - A lot quantity never goes negative: a decrement past zero is rejected
///   whole, with no partial movement.
/// - Lots are never removed; a depleted lot stays as a historical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStock {
    id: ProductId,
    name: String,
    sku: String,
    nominal_location: Option<LocationId>,
    lots: Vec<ProductLot>,
    total_stock: u64,
    version: u64,
    created: bool,
}

impl ProductStock {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            sku: String::new(),
            nominal_location: None,
            lots: Vec::new(),
            total_stock: 0,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn lots(&self) -> &[ProductLot] {
        &self.lots
    }

    pub fn lot(&self, lot_id: LotId) -> Option<&ProductLot> {
        self.lots.iter().find(|l| l.id == lot_id)
    }

    pub fn total_stock(&self) -> u64 {
        self.total_stock
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Project the aggregate into the plain record the resolver queries.
    pub fn snapshot(&self) -> Option<Product> {
        let location_id = self.nominal_location?;
        Some(Product {
            id: self.id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            location_id,
            total_stock: self.total_stock,
        })
    }
}

impl AggregateRoot for ProductStock {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: CreateProduct. The opening stock becomes lot #1 at the product's
/// initial location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub location_id: LocationId,
    pub lot_id: LotId,
    pub opening_quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddStock. Opens the next-numbered lot at the given location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub location_id: LocationId,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordSale. Decrements the selected lot; the sale is attributed
/// to that lot's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordTransfer. Moves quantity out of the selected lot into a
/// fresh lot at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransfer {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub quantity: u64,
    pub to_location_id: LocationId,
    pub new_lot_id: LotId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    CreateProduct(CreateProduct),
    AddStock(AddStock),
    RecordSale(RecordSale),
    RecordTransfer(RecordTransfer),
}

impl StockCommand {
    pub fn product_id(&self) -> ProductId {
        match self {
            StockCommand::CreateProduct(cmd) => cmd.product_id,
            StockCommand::AddStock(cmd) => cmd.product_id,
            StockCommand::RecordSale(cmd) => cmd.product_id,
            StockCommand::RecordTransfer(cmd) => cmd.product_id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: ProductCreated (carries lot #1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub location_id: LocationId,
    pub lot_id: LotId,
    pub lot_number: u32,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub location_id: LocationId,
    pub lot_number: u32,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleRecorded. `location_id` is resolved from the lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecorded {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub location_id: LocationId,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransferRecorded. `from_location_id` is resolved from the source
/// lot; the moved quantity opens `new_lot_id` at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecorded {
    pub product_id: ProductId,
    pub lot_id: LotId,
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    pub new_lot_id: LotId,
    pub new_lot_number: u32,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    ProductCreated(ProductCreated),
    StockAdded(StockAdded),
    SaleRecorded(SaleRecorded),
    TransferRecorded(TransferRecorded),
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::ProductCreated(_) => "inventory.product.created",
            StockEvent::StockAdded(_) => "inventory.stock.added",
            StockEvent::SaleRecorded(_) => "inventory.stock.sale_recorded",
            StockEvent::TransferRecorded(_) => "inventory.stock.transfer_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::ProductCreated(e) => e.occurred_at,
            StockEvent::StockAdded(e) => e.occurred_at,
            StockEvent::SaleRecorded(e) => e.occurred_at,
            StockEvent::TransferRecorded(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for ProductStock {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::ProductCreated(e) => {
                self.id = e.product_id;
                self.name = e.name.clone();
                self.sku = e.sku.clone();
                self.nominal_location = Some(e.location_id);
                self.lots = vec![ProductLot {
                    id: e.lot_id,
                    product_id: e.product_id,
                    lot_number: e.lot_number,
                    quantity: e.quantity,
                    location_id: e.location_id,
                    unit_price: e.unit_price,
                }];
                self.total_stock = e.quantity;
                self.created = true;
            }
            StockEvent::StockAdded(e) => {
                self.lots.push(ProductLot {
                    id: e.lot_id,
                    product_id: e.product_id,
                    lot_number: e.lot_number,
                    quantity: e.quantity,
                    location_id: e.location_id,
                    unit_price: e.unit_price,
                });
                self.total_stock += e.quantity;
            }
            StockEvent::SaleRecorded(e) => {
                if let Some(lot) = self.lots.iter_mut().find(|l| l.id == e.lot_id) {
                    lot.quantity -= e.quantity;
                }
                self.total_stock -= e.quantity;
            }
            StockEvent::TransferRecorded(e) => {
                if let Some(lot) = self.lots.iter_mut().find(|l| l.id == e.lot_id) {
                    lot.quantity -= e.quantity;
                }
                // The moved quantity lands in a fresh lot; the total is
                // unchanged.
                self.lots.push(ProductLot {
                    id: e.new_lot_id,
                    product_id: e.product_id,
                    lot_number: e.new_lot_number,
                    quantity: e.quantity,
                    location_id: e.to_location_id,
                    unit_price: e.unit_price,
                });
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::CreateProduct(cmd) => self.handle_create(cmd),
            StockCommand::AddStock(cmd) => self.handle_add_stock(cmd),
            StockCommand::RecordSale(cmd) => self.handle_record_sale(cmd),
            StockCommand::RecordTransfer(cmd) => self.handle_record_transfer(cmd),
        }
    }
}

impl ProductStock {
    fn ensure_product_id(&self, product_id: ProductId) -> Result<(), DomainError> {
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn ensure_fresh_lot_id(&self, lot_id: LotId) -> Result<(), DomainError> {
        if self.lots.iter().any(|l| l.id == lot_id) {
            return Err(DomainError::conflict("lot id already exists"));
        }
        Ok(())
    }

    /// The selected lot, or `NotFound`.
    fn selected_lot(&self, lot_id: LotId) -> Result<&ProductLot, DomainError> {
        self.lot(lot_id).ok_or(DomainError::NotFound)
    }

    /// Reject a decrement that would take the lot below zero.
    fn ensure_sufficient(&self, lot: &ProductLot, requested: u64) -> Result<(), DomainError> {
        if requested > lot.quantity {
            return Err(DomainError::InsufficientStock {
                lot: lot.id.to_string(),
                requested,
                available: lot.quantity,
            });
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<StockEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already exists"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if cmd.opening_quantity == 0 {
            return Err(DomainError::validation("opening stock must be positive"));
        }

        Ok(vec![StockEvent::ProductCreated(ProductCreated {
            product_id: cmd.product_id,
            name: cmd.name.clone(),
            sku: cmd.sku.clone(),
            location_id: cmd.location_id,
            lot_id: cmd.lot_id,
            lot_number: 1,
            quantity: cmd.opening_quantity,
            unit_price: cmd.unit_price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_stock(&self, cmd: &AddStock) -> Result<Vec<StockEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_product_id(cmd.product_id)?;
        self.ensure_fresh_lot_id(cmd.lot_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        // The number is assigned here, against the current lots, so it is
        // committed atomically with the insert.
        let lot_number = resolver::next_lot_number(self.id, &self.lots);

        Ok(vec![StockEvent::StockAdded(StockAdded {
            product_id: cmd.product_id,
            lot_id: cmd.lot_id,
            location_id: cmd.location_id,
            lot_number,
            quantity: cmd.quantity,
            unit_price: cmd.unit_price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_sale(&self, cmd: &RecordSale) -> Result<Vec<StockEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_product_id(cmd.product_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let lot = self.selected_lot(cmd.lot_id)?;
        self.ensure_sufficient(lot, cmd.quantity)?;

        Ok(vec![StockEvent::SaleRecorded(SaleRecorded {
            product_id: cmd.product_id,
            lot_id: cmd.lot_id,
            location_id: resolver::resolve_transaction_location(lot),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_transfer(&self, cmd: &RecordTransfer) -> Result<Vec<StockEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_product_id(cmd.product_id)?;
        self.ensure_fresh_lot_id(cmd.new_lot_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let lot = self.selected_lot(cmd.lot_id)?;
        self.ensure_sufficient(lot, cmd.quantity)?;

        let from_location_id = resolver::resolve_transaction_location(lot);
        if from_location_id == cmd.to_location_id {
            return Err(DomainError::validation(
                "transfer destination must differ from the lot location",
            ));
        }

        Ok(vec![StockEvent::TransferRecorded(TransferRecorded {
            product_id: cmd.product_id,
            lot_id: cmd.lot_id,
            from_location_id,
            to_location_id: cmd.to_location_id,
            new_lot_id: cmd.new_lot_id,
            new_lot_number: resolver::next_lot_number(self.id, &self.lots),
            quantity: cmd.quantity,
            unit_price: lot.unit_price,
            occurred_at: cmd.occurred_at,
        })])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
