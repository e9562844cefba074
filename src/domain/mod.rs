pub mod category;
pub mod filter;
pub mod record;

pub use category::Category;
pub use filter::{CategoryFilter, FilterSpec, TimeWindow};
pub use record::{Record, DATE_FORMAT};
