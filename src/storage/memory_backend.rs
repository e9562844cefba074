use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use crate::{
    errors::{LedgerError, Result},
    ledger::Ledger,
};

use super::{LoadReport, StorageBackend};

/// Keeps the last saved ledger in memory. Handy for embedding the engine
/// without touching disk, and for exercising write failures in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Ledger>,
    fail_writes: AtomicBool,
    label: PathBuf,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            label: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        let storage = Self::new();
        if let Ok(mut saved) = storage.saved.lock() {
            *saved = ledger;
        }
        storage
    }

    /// Makes every following `save` fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Ledger {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> LoadReport {
        LoadReport::loaded(self.snapshot())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("simulated write failure".into()));
        }
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| LedgerError::Persistence("storage lock poisoned".into()))?;
        *saved = ledger.clone();
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.label
    }
}
