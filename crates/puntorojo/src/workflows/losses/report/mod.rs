mod filter;
mod summary;
pub mod views;

pub use filter::{top_critical, PriorityFilter, DEFAULT_TOP_CRITICAL};
pub use summary::{fleet_indicators, summarize_sectors};
pub use views::{AnnotatedAsset, FleetIndicators, SectorSummary};
