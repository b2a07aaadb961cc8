pub mod flow;
pub mod index;

pub use flow::{FlowPageClient, RawFlowTable};
pub use index::{IndexClient, IndexPoint, IndexSeries};
