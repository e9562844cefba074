use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::record::Record;
use crate::errors::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::storage::{CsvStorage, LoadReport, StorageBackend};

/// What happened when the ledger was last read from storage.
#[derive(Debug, Clone, Default)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub quarantined: Option<PathBuf>,
    pub path: PathBuf,
    pub records: usize,
}

/// Owns the authoritative ledger and mediates every read and write of it.
///
/// Appends are all-or-nothing: when the write fails the record is taken
/// back out, so memory always matches the last successful save.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    metadata: LoadMetadata,
}

impl LedgerStore {
    /// Builds a store and loads whatever the backend currently holds.
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        let mut store = Self {
            ledger: Ledger::new(),
            storage,
            metadata: LoadMetadata::default(),
        };
        store.load();
        store
    }

    pub fn open_csv(path: impl Into<PathBuf>) -> Self {
        Self::open(Box::new(CsvStorage::new(path)))
    }

    /// Replaces the in-memory ledger with the stored one. Never fails:
    /// unreadable data comes back as an empty ledger plus warnings.
    pub fn load(&mut self) -> &Ledger {
        let LoadReport {
            ledger,
            warnings,
            quarantined,
        } = self.storage.load();
        self.metadata = LoadMetadata {
            warnings,
            quarantined,
            path: self.storage.path().to_path_buf(),
            records: ledger.len(),
        };
        self.ledger = ledger;
        &self.ledger
    }

    /// Validates raw input, appends the record and persists the ledger.
    pub fn append(&mut self, date: &str, amount: &str, category: &str) -> Result<Record> {
        let record = Record::parse(date, amount, category)?;
        self.append_record(record)
    }

    /// Appends an already-validated record and persists the ledger.
    pub fn append_record(&mut self, record: Record) -> Result<Record> {
        self.ledger.push(record.clone());
        if let Err(err) = self.storage.save(&self.ledger) {
            self.ledger.pop();
            warn!(error = %err, "save failed; append rolled back");
            return Err(match err {
                LedgerError::Persistence(_) => err,
                other => LedgerError::Persistence(other.to_string()),
            });
        }
        info!(
            date = %record.date_label(),
            amount = %record.amount_label(),
            category = %record.category(),
            total_records = self.ledger.len(),
            "expense recorded"
        );
        Ok(record)
    }

    pub fn records(&self) -> &[Record] {
        self.ledger.records()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn metadata(&self) -> &LoadMetadata {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    /// Shares one `MemoryStorage` between the store and the test body.
    struct Shared(Arc<MemoryStorage>);

    impl StorageBackend for Shared {
        fn load(&self) -> LoadReport {
            self.0.load()
        }

        fn save(&self, ledger: &Ledger) -> Result<()> {
            self.0.save(ledger)
        }

        fn path(&self) -> &Path {
            self.0.path()
        }
    }

    fn shared_store() -> (LedgerStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        let store = LedgerStore::open(Box::new(Shared(backend.clone())));
        (store, backend)
    }

    #[test]
    fn append_persists_the_whole_ledger() {
        let (mut store, backend) = shared_store();
        store.append("2024-01-01", "10", "Food").unwrap();
        let record = store.append("2024-01-02", "2.5", "Transport").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(record.category(), &Category::Transport);
        assert_eq!(backend.snapshot(), *store.ledger());
    }

    #[test]
    fn invalid_input_leaves_ledger_unchanged() {
        let (mut store, backend) = shared_store();
        let err = store
            .append("invalid_date", "not_a_number", "Food")
            .expect_err("validation must fail");
        assert!(err.is_validation());
        let err = store.append("2024-13-01", "5", "Food").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDate(_)));
        assert!(store.is_empty());
        assert!(backend.snapshot().is_empty());
    }

    #[test]
    fn failed_write_rolls_back_the_append() {
        let (mut store, backend) = shared_store();
        store.append("2024-01-01", "10", "Food").unwrap();
        backend.set_fail_writes(true);

        let err = store.append("2024-01-02", "20", "Food").unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert_eq!(store.len(), 1);

        backend.set_fail_writes(false);
        store.append("2024-01-03", "30", "Food").unwrap();
        assert_eq!(backend.snapshot().len(), 2);
    }

    #[test]
    fn open_loads_existing_records() {
        let seeded = Ledger::from_records(vec![Record::parse("2024-05-05", "1", "Other").unwrap()]);
        let store = LedgerStore::open(Box::new(MemoryStorage::with_ledger(seeded)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.metadata().records, 1);
        assert!(store.metadata().warnings.is_empty());
    }
}
