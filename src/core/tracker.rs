//! Entry points used by the presentation layer.

use std::path::Path;

use chrono::NaiveDate;

use crate::config::Config;
use crate::core::aggregator::{Aggregator, Dashboard};
use crate::core::clock::{Clock, SystemClock};
use crate::core::ledger_store::{LedgerStore, LoadMetadata};
use crate::domain::{filter::FilterSpec, record::Record};
use crate::errors::Result;

/// Owns one ledger store and the clock that anchors relative windows.
/// Several trackers can coexist, each over its own storage.
pub struct ExpenseTracker {
    store: LedgerStore,
    clock: Box<dyn Clock>,
}

impl ExpenseTracker {
    pub fn new(store: LedgerStore, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Opens the CSV ledger named by `config`, resolved against `base`.
    pub fn from_config(config: &Config, base: &Path) -> Self {
        let store = LedgerStore::open_csv(config.ledger_path(base));
        Self::new(store, Box::new(SystemClock))
    }

    /// Validates and records an expense typed in by the user.
    pub fn submit_expense(
        &mut self,
        date_text: &str,
        amount_text: &str,
        category_text: &str,
    ) -> Result<Record> {
        self.store.append(date_text, amount_text, category_text)
    }

    /// Every record, oldest first.
    pub fn list_records(&self) -> Vec<&Record> {
        self.store.ledger().chronological()
    }

    pub fn dashboard_data(&self, spec: &FilterSpec) -> Dashboard {
        Aggregator::dashboard(self.store.records(), spec, self.clock.today())
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn load_metadata(&self) -> &LoadMetadata {
        self.store.metadata()
    }
}
