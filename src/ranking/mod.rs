pub mod filter;
pub mod select;

pub use filter::filter_excluded;
pub use select::{select, RankedEntry};
