pub mod aggregator;
pub mod clock;
pub mod ledger_store;
pub mod tracker;
pub mod utils;

pub use aggregator::{Aggregator, Dashboard, DashboardData, Summary, YearMonth};
pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger_store::{LedgerStore, LoadMetadata};
pub use tracker::ExpenseTracker;
