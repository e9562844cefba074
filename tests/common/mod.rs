#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate};
use expense_ledger::{
    core::{clock::FixedClock, ledger_store::LedgerStore},
    ExpenseTracker, Record,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub fn record(date: NaiveDate, amount: i64, category: &str) -> Record {
    Record::new(date, Decimal::from(amount), category.into()).expect("valid record")
}

/// Tracker over a fresh CSV file, with the clock pinned to [`today`].
pub fn csv_tracker() -> (ExpenseTracker, PathBuf) {
    let path = test_dir().join("expenses.csv");
    let store = LedgerStore::open_csv(&path);
    (ExpenseTracker::new(store, Box::new(FixedClock(today()))), path)
}
