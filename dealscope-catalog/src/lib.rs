pub mod ledger;
pub mod store;

pub use ledger::{LedgerError, RedemptionLedger};
pub use store::{CatalogError, InMemoryCatalog, OfferStore, StoreError};
