use super::super::domain::{
    directive_line, AssetRecord, DerivedMetrics, Intervention, LossBand, PriorityCategory,
    ScoreComponents,
};
use serde::Serialize;

/// A ranked asset with every annotation the engine produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedAsset {
    #[serde(flatten)]
    pub record: AssetRecord,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    #[serde(flatten)]
    pub scores: ScoreComponents,
    pub priority_score: f64,
    pub category: PriorityCategory,
    pub category_label: &'static str,
    pub action_label: &'static str,
    pub loss_band: LossBand,
    pub interventions: Vec<Intervention>,
    /// Display text for each intervention, same order.
    pub directives: Vec<String>,
}

impl AnnotatedAsset {
    pub fn directive_line(&self) -> String {
        directive_line(&self.interventions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorSummary {
    pub sector: String,
    pub total_loss_kwh: f64,
    pub mean_loss_pct: f64,
    pub total_monetary_loss: f64,
    pub asset_count: usize,
}

/// Headline totals across the whole scored batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FleetIndicators {
    pub asset_count: usize,
    pub total_delivered_kwh: f64,
    pub total_billed_kwh: f64,
    pub total_loss_kwh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_loss_pct: Option<f64>,
    pub total_monetary_loss: f64,
    pub critical_count: usize,
}

#[cfg(test)]
pub(crate) fn asset_for_tests(
    sector: &str,
    delivered: f64,
    billed: f64,
    category: PriorityCategory,
) -> AnnotatedAsset {
    let loss_kwh = delivered - billed;
    AnnotatedAsset {
        record: AssetRecord {
            asset_id: format!("TF-{sector}-{delivered}"),
            sector: sector.to_string(),
            latitude: 18.47,
            longitude: -69.93,
            capacity_kva: 150.0,
            energy_delivered_kwh: delivered,
            energy_billed_kwh: billed,
        },
        metrics: DerivedMetrics {
            loss_kwh,
            loss_pct: loss_kwh / delivered * 100.0,
            monetary_loss: loss_kwh * 12.5,
            load_pct: 50.0,
        },
        scores: ScoreComponents {
            volume_score: 0.0,
            pct_score: 0.0,
            overload_score: 0.0,
        },
        priority_score: 0.0,
        category,
        category_label: category.label(),
        action_label: category.action_label(),
        loss_band: LossBand::Normal,
        interventions: Vec::new(),
        directives: Vec::new(),
    }
}
