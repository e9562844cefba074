use crate::domain::record::Record;

/// Ordered, append-only collection of accepted records.
///
/// Insertion order is kept as-is; views that need chronological order sort
/// their own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Drops the most recent record. Only used to undo an append whose
    /// write failed.
    pub(crate) fn pop(&mut self) -> Option<Record> {
        self.records.pop()
    }

    /// Records sorted by date, ties kept in insertion order.
    pub fn chronological(&self) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.records.iter().collect();
        sorted.sort_by_key(|record| record.date());
        sorted
    }
}
