pub mod config;
mod demo;
pub mod domain;
mod engine;
pub mod export;
mod metrics;
pub mod report;
pub mod rules;
mod scoring;

pub use config::{EngineConfig, RuleThresholds, ScoringConfig, TariffConfig, ZeroDeliveryPolicy};
pub use demo::demo_assets;
pub use domain::{
    AssetRecord, CanonicalField, DerivedMetrics, Intervention, LossBand, LossError,
    PriorityCategory, ScoreComponents, SkippedRecord,
};
pub use engine::{LossAnalysis, LossPrioritizationEngine};
pub use export::{render_table, ExportTable, LossExportError};
pub use metrics::derive_metrics;
pub use report::{
    top_critical, AnnotatedAsset, FleetIndicators, PriorityFilter, SectorSummary,
    DEFAULT_TOP_CRITICAL,
};
pub use scoring::{score_batch, MeasuredAsset, ScoredAsset};
