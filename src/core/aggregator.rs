//! Stateless summaries over a ledger snapshot.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::domain::{category::Category, filter::FilterSpec, record::Record};

/// Calendar month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub type CategoryTotals = BTreeMap<Category, Decimal>;
pub type MonthlyTotals = BTreeMap<YearMonth, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: Decimal,
    /// Mean of the months that have spending, not of every calendar month
    /// in the window.
    pub average_monthly: Decimal,
}

/// Series behind the distribution chart, the monthly trend and the totals line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub distribution: CategoryTotals,
    pub monthly: MonthlyTotals,
    pub summary: Summary,
}

/// Result of a dashboard refresh. `NoData` tells the caller to show an
/// empty state instead of drawing charts from empty series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    Ready(DashboardData),
    NoData,
}

impl Dashboard {
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            Dashboard::Ready(data) => Some(data),
            Dashboard::NoData => None,
        }
    }

    /// Summary to display; zeros for the empty state.
    pub fn summary(&self) -> Summary {
        self.data().map(|data| data.summary).unwrap_or_default()
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Keeps the records inside the window (relative to `today`) whose
    /// category passes the filter. Input order is preserved.
    pub fn filter<'a>(
        records: &'a [Record],
        spec: &FilterSpec,
        today: NaiveDate,
    ) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|record| spec.matches(record, today))
            .collect()
    }

    /// Sum per category. Categories with no records are absent.
    ///
    /// Sums saturate at `Decimal::MAX` rather than overflow.
    pub fn group_by_category(filtered: &[&Record]) -> CategoryTotals {
        let mut totals = CategoryTotals::new();
        for record in filtered {
            let slot = totals.entry(record.category().clone()).or_default();
            *slot = slot.saturating_add(record.amount());
        }
        totals
    }

    /// Sum per calendar month, ascending. Months with no records are absent.
    pub fn group_by_month(filtered: &[&Record]) -> MonthlyTotals {
        let mut totals = MonthlyTotals::new();
        for record in filtered {
            let slot = totals.entry(YearMonth::of(record.date())).or_default();
            *slot = slot.saturating_add(record.amount());
        }
        totals
    }

    pub fn summary(filtered: &[&Record], monthly: &MonthlyTotals) -> Summary {
        let total = filtered
            .iter()
            .fold(Decimal::ZERO, |acc, record| acc.saturating_add(record.amount()));
        let average_monthly = if monthly.is_empty() {
            Decimal::ZERO
        } else {
            let sum = monthly
                .values()
                .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));
            (sum / Decimal::from(monthly.len()))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };
        Summary {
            total,
            average_monthly,
        }
    }

    pub fn dashboard(records: &[Record], spec: &FilterSpec, today: NaiveDate) -> Dashboard {
        let filtered = Self::filter(records, spec, today);
        debug!(
            window = %spec.window,
            category = %spec.category,
            input = records.len(),
            matched = filtered.len(),
            "dashboard refresh"
        );
        if filtered.is_empty() {
            return Dashboard::NoData;
        }
        let distribution = Self::group_by_category(&filtered);
        let monthly = Self::group_by_month(&filtered);
        let summary = Self::summary(&filtered, &monthly);
        Dashboard::Ready(DashboardData {
            distribution,
            monthly,
            summary,
        })
    }
}
