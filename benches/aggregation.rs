use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_ledger::{
    storage::{CsvStorage, StorageBackend},
    Aggregator, Category, CategoryFilter, FilterSpec, Ledger, Record, TimeWindow,
};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn build_sample_ledger(count: usize) -> Ledger {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let records = (0..count)
        .map(|idx| {
            let category = Category::STANDARD[idx % Category::STANDARD.len()].clone();
            Record::new(
                start + Duration::days((idx % 730) as i64),
                Decimal::new(500 + (idx % 10_000) as i64, 2),
                category,
            )
            .expect("valid record")
        })
        .collect();
    Ledger::from_records(records)
}

fn bench_dashboard(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let specs = [
        FilterSpec::default(),
        FilterSpec::new(TimeWindow::Last6Months, CategoryFilter::Only(Category::Food)),
    ];

    c.bench_function("dashboard_all_time_10k", |b| {
        b.iter(|| black_box(Aggregator::dashboard(ledger.records(), &specs[0], today)))
    });
    c.bench_function("dashboard_6m_food_10k", |b| {
        b.iter(|| black_box(Aggregator::dashboard(ledger.records(), &specs[1], today)))
    });
}

fn bench_ledger_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(10_000);
    let dir = tempdir().expect("tempdir");
    let storage = CsvStorage::new(dir.path().join("expenses.csv"));

    c.bench_function("ledger_save_10k", |b| {
        b.iter(|| storage.save(&ledger).expect("save ledger"))
    });

    storage.save(&ledger).expect("seed");
    c.bench_function("ledger_load_10k", |b| {
        b.iter(|| black_box(storage.load()))
    });
}

criterion_group!(benches, bench_dashboard, bench_ledger_io);
criterion_main!(benches);
