pub mod csv_backend;
pub mod memory_backend;

use std::path::{Path, PathBuf};

use crate::{errors::Result, ledger::Ledger};

/// Abstraction over where the ledger lives between runs.
///
/// `load` is total: a backend that finds unreadable data recovers on its own
/// and reports what it did through the returned [`LoadReport`].
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> LoadReport;
    /// Persists the whole ledger, replacing any previous contents.
    fn save(&self, ledger: &Ledger) -> Result<()>;
    fn path(&self) -> &Path;
}

/// Outcome of loading the ledger at startup.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
    /// Where an unreadable file was moved, if recovery happened.
    pub quarantined: Option<PathBuf>,
}

impl LoadReport {
    pub fn loaded(ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    pub fn is_recovered(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub use csv_backend::{CsvStorage, Quarantine, BACKUP_SUFFIX, HEADER};
pub use memory_backend::MemoryStorage;
