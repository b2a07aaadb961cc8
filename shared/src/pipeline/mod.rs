pub mod canon;
pub mod parse;
pub mod table;

pub use canon::{canonical_key, CATEGORIES};
pub use table::{build_merged_series, CategoryMatch, MergedRow, MergedSeries};
