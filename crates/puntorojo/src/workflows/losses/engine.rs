use super::config::{EngineConfig, ZeroDeliveryPolicy};
use super::domain::{
    asset_label, AssetRecord, CanonicalField, Intervention, LossError, SkippedRecord,
};
use super::metrics::derive_metrics;
use super::report::{
    fleet_indicators, summarize_sectors, AnnotatedAsset, FleetIndicators, SectorSummary,
};
use super::rules::{categorize, loss_band, suggest, RuleInput};
use super::scoring::{score_batch, MeasuredAsset, ScoredAsset};
use crate::workflows::intake::{validate_columns, RawTable};
use serde::Serialize;
use tracing::{info, warn};

/// Everything one engine run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LossAnalysis {
    /// Ranked by descending priority score.
    pub assets: Vec<AnnotatedAsset>,
    pub sectors: Vec<SectorSummary>,
    pub fleet: FleetIndicators,
    pub skipped: Vec<SkippedRecord>,
}

/// Stateless pipeline from a raw table to a ranked, annotated batch.
///
/// The engine only holds configuration, so one instance can serve concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct LossPrioritizationEngine {
    config: EngineConfig,
}

impl LossPrioritizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates columns, types rows, then runs [`Self::analyze_rows`].
    pub fn run(&self, table: &RawTable) -> Result<LossAnalysis, LossError> {
        if table.is_empty() {
            return Ok(LossAnalysis::default());
        }

        let canonical = validate_columns(table)?;
        let (rows, skipped) = canonical.into_assets();
        self.analyze_rows(rows, skipped)
    }

    /// Runs the pipeline over already typed records; row numbers follow slice order.
    ///
    /// Records without a positive capacity are skipped as malformed, as they are on import.
    pub fn analyze(&self, records: Vec<AssetRecord>) -> Result<LossAnalysis, LossError> {
        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let row = index + 1;
            if record.capacity_kva > 0.0 {
                rows.push((row, record));
                continue;
            }

            let label = asset_label(&record.asset_id, row);
            skipped.push(SkippedRecord {
                row,
                asset_id: label.clone(),
                error: LossError::MalformedValue {
                    asset_id: label,
                    field: CanonicalField::CapacityKva,
                    value: record.capacity_kva.to_string(),
                },
            });
        }

        self.analyze_rows(rows, skipped)
    }

    fn analyze_rows(
        &self,
        rows: Vec<(usize, AssetRecord)>,
        mut skipped: Vec<SkippedRecord>,
    ) -> Result<LossAnalysis, LossError> {
        let measured = self.measure(rows, &mut skipped)?;
        let scored = score_batch(measured, &self.config.scoring);
        let assets: Vec<AnnotatedAsset> =
            scored.into_iter().map(|asset| self.annotate(asset)).collect();

        let sectors = summarize_sectors(&assets);
        let fleet = fleet_indicators(&assets);

        skipped.sort_by_key(|record| record.row);
        for record in &skipped {
            warn!(row = record.row, asset_id = %record.asset_id, reason = %record.error, "asset skipped");
        }

        info!(
            assets = assets.len(),
            sectors = sectors.len(),
            skipped = skipped.len(),
            critical = fleet.critical_count,
            "loss prioritization complete"
        );

        Ok(LossAnalysis {
            assets,
            sectors,
            fleet,
            skipped,
        })
    }

    fn measure(
        &self,
        rows: Vec<(usize, AssetRecord)>,
        skipped: &mut Vec<SkippedRecord>,
    ) -> Result<Vec<MeasuredAsset>, LossError> {
        let mut measured = Vec::with_capacity(rows.len());

        for (row, record) in rows {
            match derive_metrics(&record, &self.config.tariff) {
                Ok(metrics) => measured.push(MeasuredAsset { record, metrics }),
                Err(error) => match self.config.zero_delivery {
                    ZeroDeliveryPolicy::AbortBatch => return Err(error),
                    ZeroDeliveryPolicy::SkipRecord => skipped.push(SkippedRecord {
                        row,
                        asset_id: asset_label(&record.asset_id, row),
                        error,
                    }),
                },
            }
        }

        Ok(measured)
    }

    fn annotate(&self, asset: ScoredAsset) -> AnnotatedAsset {
        let thresholds = &self.config.rules;
        let input = RuleInput::from_scored(&asset);
        let category = categorize(&input, thresholds);
        let interventions = suggest(&input, thresholds);
        let band = loss_band(asset.metrics.loss_pct, thresholds);

        let directives = interventions.iter().map(Intervention::directive).collect();

        AnnotatedAsset {
            record: asset.record,
            metrics: asset.metrics,
            scores: asset.scores,
            priority_score: asset.priority_score,
            category,
            category_label: category.label(),
            action_label: category.action_label(),
            loss_band: band,
            interventions,
            directives,
        }
    }
}
