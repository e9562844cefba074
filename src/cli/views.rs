//! Text renderings of ledger data for the shell.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::cli::table::{Alignment, Table, TableColumn};
use crate::core::aggregator::{Dashboard, DashboardData};
use crate::currency::{format_amount, CurrencyCode};
use crate::domain::{filter::FilterSpec, record::Record};

const BAR_WIDTH: u32 = 30;
const CATEGORY_WIDTH: usize = 20;
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";
pub const EMPTY_LEDGER_MESSAGE: &str = "No expenses recorded yet.";

pub fn records_table(records: &[&Record], currency: &CurrencyCode) -> String {
    if records.is_empty() {
        return EMPTY_LEDGER_MESSAGE.to_string();
    }
    let mut table = Table::new(vec![
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Amount", Alignment::Right),
        TableColumn::new("Category", Alignment::Left).max_width(CATEGORY_WIDTH),
    ]);
    for record in records {
        table.push_row(vec![
            record.date_label(),
            format_amount(record.amount(), currency),
            record.category().to_string(),
        ]);
    }
    table.render()
}

pub fn record_line(record: &Record, currency: &CurrencyCode) -> String {
    format!(
        "{}  {}  {}",
        record.date_label(),
        format_amount(record.amount(), currency),
        record.category()
    )
}

pub fn dashboard(view: &Dashboard, spec: &FilterSpec, currency: &CurrencyCode) -> String {
    let heading = format!("Window: {}, Category: {}", spec.window, spec.category);
    match view {
        Dashboard::NoData => format!("{heading}\n{NO_DATA_MESSAGE}"),
        Dashboard::Ready(data) => format!("{heading}\n{}", dashboard_body(data, currency)),
    }
}

fn dashboard_body(data: &DashboardData, currency: &CurrencyCode) -> String {
    let total = data.summary.total;

    let mut distribution = Table::new(vec![
        TableColumn::new("Category", Alignment::Left).max_width(CATEGORY_WIDTH),
        TableColumn::new("Spent", Alignment::Right),
        TableColumn::new("Share", Alignment::Right),
        TableColumn::new("", Alignment::Left),
    ]);
    let largest_category = data.distribution.values().copied().max().unwrap_or_default();
    for (category, amount) in &data.distribution {
        distribution.push_row(vec![
            category.to_string(),
            format_amount(*amount, currency),
            share_label(*amount, total),
            bar(*amount, largest_category),
        ]);
    }

    let mut monthly = Table::new(vec![
        TableColumn::new("Month", Alignment::Left),
        TableColumn::new("Spent", Alignment::Right),
        TableColumn::new("", Alignment::Left),
    ]);
    let largest_month = data.monthly.values().copied().max().unwrap_or_default();
    for (month, amount) in &data.monthly {
        monthly.push_row(vec![
            month.to_string(),
            format_amount(*amount, currency),
            bar(*amount, largest_month),
        ]);
    }

    format!(
        "\nExpense distribution\n{}\n\nMonthly trend\n{}\n\n\
         Total expenses: {}\nAverage monthly: {}",
        distribution.render(),
        monthly.render(),
        format_amount(total, currency),
        format_amount(data.summary.average_monthly, currency),
    )
}

fn share_label(amount: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "-".to_string();
    }
    // Divide first: `amount <= total`, so the ratio cannot overflow.
    let pct = (amount / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.1}%")
}

fn bar(amount: Decimal, largest: Decimal) -> String {
    if largest.is_zero() {
        return String::new();
    }
    let cells = (amount / largest * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0);
    "#".repeat(cells)
}
