#![doc(test(attr(deny(warnings))))]

//! Expense Ledger records dated, categorized expenses in a CSV-backed
//! append-only ledger and computes the filtered summaries behind the
//! distribution and monthly-trend views.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{
    aggregator::{Aggregator, DashboardData, Summary},
    ledger_store::LedgerStore,
    tracker::ExpenseTracker,
};
pub use domain::{
    category::Category,
    filter::{CategoryFilter, FilterSpec, TimeWindow},
    record::Record,
};
pub use errors::LedgerError;
pub use ledger::Ledger;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense ledger tracing initialized.");
    });
}
