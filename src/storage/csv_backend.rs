use chrono::{NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    core::utils::{ensure_dir, with_suffix},
    domain::{
        category::Category,
        record::{parse_amount, parse_date, Record},
    },
    errors::{LedgerError, Result},
    ledger::Ledger,
};

use super::{LoadReport, StorageBackend};

/// Column names, in the order they are written.
pub const HEADER: [&str; 3] = ["Date", "Amount", "Category"];
pub const BACKUP_SUFFIX: &str = "bak";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const TMP_SUFFIX: &str = "tmp";

/// File operations quarantine depends on, swappable so tests can make
/// them fail.
#[derive(Debug, Clone, Copy)]
struct FileOps {
    rename: fn(&Path, &Path) -> io::Result<()>,
    remove: fn(&Path) -> io::Result<()>,
}

impl Default for FileOps {
    fn default() -> Self {
        Self {
            rename: |from: &Path, to: &Path| fs::rename(from, to),
            remove: |path: &Path| fs::remove_file(path),
        }
    }
}

/// Where quarantined data ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quarantine {
    /// The corrupt file is gone from its original location.
    Moved(PathBuf),
    /// A copy was saved but the corrupt file is still in place.
    Copied(PathBuf),
}

/// Ledger persisted as a `Date,Amount,Category` CSV file that is rewritten
/// in full on every save.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
    ops: FileOps,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ops: FileOps::default(),
        }
    }

    /// Reads the file without any recovery. `Ok(None)` means there is no file.
    pub fn read_ledger(&self) -> Result<Option<Ledger>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(LedgerError::corrupt(&self.path, err.to_string())),
        };
        parse_ledger(file, &self.path).map(Some)
    }

    /// Moves the current file aside. When it cannot be renamed it is copied
    /// and then removed. Existing backups are never overwritten.
    pub fn quarantine(&self) -> Result<Quarantine> {
        let target = self.next_backup_path();
        let rename_err = match (self.ops.rename)(&self.path, &target) {
            Ok(()) => return Ok(Quarantine::Moved(target)),
            Err(err) => err,
        };
        debug!(error = %rename_err, "rename failed, falling back to copy");
        fs::copy(&self.path, &target).map_err(|copy_err| {
            LedgerError::Persistence(format!(
                "could not move {} aside: {rename_err}; copy also failed: {copy_err}",
                self.path.display()
            ))
        })?;
        match (self.ops.remove)(&self.path) {
            Ok(()) => Ok(Quarantine::Moved(target)),
            Err(remove_err) => {
                warn!(error = %remove_err, "corrupt ledger copied but not removed");
                Ok(Quarantine::Copied(target))
            }
        }
    }

    fn next_backup_path(&self) -> PathBuf {
        let plain = with_suffix(&self.path, BACKUP_SUFFIX);
        if !plain.exists() {
            return plain;
        }
        let stamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stamped = with_suffix(&plain, &stamp);
        if !stamped.exists() {
            return stamped;
        }
        (1..)
            .map(|n| with_suffix(&plain, &format!("{stamp}-{n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(stamped)
    }

    fn recover(&self, err: LedgerError) -> LoadReport {
        warn!(path = %self.path.display(), error = %err, "ledger file unreadable; starting empty");
        let mut report = LoadReport::default();
        report.warnings.push(err.to_string());
        match self.quarantine() {
            Ok(Quarantine::Moved(backup)) => {
                info!(backup = %backup.display(), "quarantined unreadable ledger");
                report
                    .warnings
                    .push(format!("Previous data saved to {}", backup.display()));
                report.quarantined = Some(backup);
            }
            Ok(Quarantine::Copied(backup)) => {
                report.warnings.push(format!(
                    "Previous data copied to {}; the original file stays in place \
                     until the next save replaces it",
                    backup.display()
                ));
                report.quarantined = Some(backup);
            }
            Err(quarantine_err) => {
                warn!(error = %quarantine_err, "quarantine failed");
                report.warnings.push(format!(
                    "{quarantine_err}; the file will be replaced on the next save"
                ));
            }
        }
        report
    }
}

impl StorageBackend for CsvStorage {
    fn load(&self) -> LoadReport {
        match self.read_ledger() {
            Ok(Some(ledger)) => {
                info!(path = %self.path.display(), records = ledger.len(), "ledger loaded");
                LoadReport::loaded(ledger)
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no ledger file yet; starting empty");
                LoadReport::default()
            }
            Err(err) => self.recover(err),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        save_ledger_to_path(ledger, &self.path)
            .map_err(|err| LedgerError::Persistence(format!("{}: {err}", self.path.display())))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes the ledger by staging to `<file>.tmp` and renaming over the target.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = with_suffix(path, TMP_SUFFIX);
    let staged = write_csv(ledger, &tmp)
        .and_then(|()| fs::rename(&tmp, path).map_err(LedgerError::from));
    if staged.is_err() && tmp.is_file() {
        if let Err(err) = fs::remove_file(&tmp) {
            debug!(path = %tmp.display(), error = %err, "could not remove staging file");
        }
    }
    staged
}

fn write_csv(ledger: &Ledger, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(HEADER)?;
    for record in ledger.records() {
        writer.write_record([
            record.date_label(),
            record.amount_label(),
            record.category().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses CSV ledger data. Any structural problem is a `CorruptStorage` error.
pub fn parse_ledger(reader: impl Read, path: &Path) -> Result<Ledger> {
    let corrupt = |reason: String| LedgerError::corrupt(path, reason);
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv.headers().map_err(|err| corrupt(err.to_string()))?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Ok(Ledger::new());
    }
    let columns = ColumnMap::from_headers(headers.iter()).map_err(corrupt)?;

    let mut records = Vec::new();
    for (idx, row) in csv.records().enumerate() {
        let line = idx + 2;
        let row = row.map_err(|err| corrupt(format!("line {line}: {err}")))?;
        let date = parse_stored_date(&row[columns.date])
            .ok_or_else(|| corrupt(format!("line {line}: invalid date `{}`", &row[columns.date])))?;
        let amount = parse_amount(&row[columns.amount]).map_err(|_| {
            corrupt(format!("line {line}: invalid amount `{}`", &row[columns.amount]))
        })?;
        let category = Category::from(&row[columns.category]);
        let record = Record::new(date, amount, category)
            .map_err(|err| corrupt(format!("line {line}: {err}")))?;
        records.push(record);
    }
    Ok(Ledger::from_records(records))
}

/// Accepts the canonical date, or a timestamp whose date part is canonical.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    parse_date(raw).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|stamp| stamp.date())
    })
}

/// Position of each required column. Order is free but the set must match.
struct ColumnMap {
    date: usize,
    amount: usize,
    category: usize,
}

impl ColumnMap {
    fn from_headers<'a>(
        headers: impl Iterator<Item = &'a str>,
    ) -> std::result::Result<Self, String> {
        let names: Vec<&str> = headers.collect();
        let position = |wanted: &str| -> std::result::Result<usize, String> {
            let mut hits = names
                .iter()
                .enumerate()
                .filter(|(_, name)| **name == wanted)
                .map(|(idx, _)| idx);
            match (hits.next(), hits.next()) {
                (Some(idx), None) => Ok(idx),
                (None, _) => Err(format!("missing column {wanted}")),
                (Some(_), Some(_)) => Err(format!("duplicate column {wanted}")),
            }
        };
        let map = Self {
            date: position(HEADER[0])?,
            amount: position(HEADER[1])?,
            category: position(HEADER[2])?,
        };
        if names.len() != HEADER.len() {
            return Err(format!(
                "expected columns {}, found {}",
                HEADER.join(","),
                names.join(",")
            ));
        }
        Ok(map)
    }
}
