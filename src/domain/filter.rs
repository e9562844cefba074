//! Filter parameters for dashboard views.

use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::record::Record;

/// Relative date range ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    Last30Days,
    Last3Months,
    Last6Months,
    LastYear,
    #[default]
    AllTime,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Last30Days,
        TimeWindow::Last3Months,
        TimeWindow::Last6Months,
        TimeWindow::LastYear,
        TimeWindow::AllTime,
    ];

    /// Length of the window in days, `None` for an unbounded window.
    pub fn days(self) -> Option<i64> {
        match self {
            TimeWindow::Last30Days => Some(30),
            TimeWindow::Last3Months => Some(90),
            TimeWindow::Last6Months => Some(180),
            TimeWindow::LastYear => Some(365),
            TimeWindow::AllTime => None,
        }
    }

    /// Inclusive `(start, end)` bounds relative to `today`.
    pub fn bounds(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        self.days()
            .map(|days| (today - Duration::days(days), today))
    }

    pub fn contains(self, today: NaiveDate, date: NaiveDate) -> bool {
        match self.bounds(today) {
            Some((start, end)) => start <= date && date <= end,
            None => true,
        }
    }

    /// Short token accepted on the command line.
    pub fn token(self) -> &'static str {
        match self {
            TimeWindow::Last30Days => "30d",
            TimeWindow::Last3Months => "3m",
            TimeWindow::Last6Months => "6m",
            TimeWindow::LastYear => "1y",
            TimeWindow::AllTime => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeWindow::Last30Days => "Last 30 Days",
            TimeWindow::Last3Months => "Last 3 Months",
            TimeWindow::Last6Months => "Last 6 Months",
            TimeWindow::LastYear => "Last Year",
            TimeWindow::AllTime => "All Time",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time window `{0}` (expected one of 30d, 3m, 6m, 1y, all)")]
pub struct UnknownWindow(pub String);

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "30d" | "last30days" => Ok(TimeWindow::Last30Days),
            "3m" | "last3months" => Ok(TimeWindow::Last3Months),
            "6m" | "last6months" => Ok(TimeWindow::Last6Months),
            "1y" | "lastyear" => Ok(TimeWindow::LastYear),
            "all" | "alltime" => Ok(TimeWindow::AllTime),
            _ => Err(UnknownWindow(s.to_string())),
        }
    }
}

const ALL_LABEL: &str = "All";

/// Category predicate. `Only` matches by exact, case-sensitive label.
///
/// Parsing from text reserves the exact label `All`; any other spelling,
/// `all` included, selects a category of that name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_LABEL),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed == ALL_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from(trimmed))
        }
    }
}

/// Combined window and category selection for a dashboard refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub window: TimeWindow,
    pub category: CategoryFilter,
}

impl FilterSpec {
    pub fn new(window: TimeWindow, category: CategoryFilter) -> Self {
        Self { window, category }
    }

    /// Single combined predicate; the two checks are independent.
    pub fn matches(&self, record: &Record, today: NaiveDate) -> bool {
        self.window.contains(today, record.date()) && self.category.matches(record.category())
    }
}
