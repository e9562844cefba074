//! The in-memory ledger owned by the store.

#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::Ledger;
