pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;

pub use chart::{render_chart, ChartStyle};
pub use config::{Config, DatePolicy};
pub use error::Error;
pub use fetch::{FlowPageClient, IndexClient, IndexPoint, IndexSeries, RawFlowTable};
pub use pipeline::{build_merged_series, CategoryMatch, MergedRow, MergedSeries};
