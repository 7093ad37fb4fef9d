//! `lotkeeper-sales` — sale/transfer records and the checkout flow.
//!
//! Wires the permission evaluator and the lot resolver into the two-phase
//! flow the screens drive: gate, pick a lot, re-check at the resolved
//! location, commit.

pub mod checkout;
pub mod records;

pub use checkout::{
    begin_sale, begin_transfer, commit_sale, commit_transfer, SaleDraft, TransferDraft,
};
pub use records::{Sale, Transfer};
