use super::super::domain::PriorityCategory;
use super::views::AnnotatedAsset;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_CRITICAL: usize = 10;

/// Narrows the ranked list for field crews. Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityFilter {
    pub categories: Vec<PriorityCategory>,
    pub sectors: Vec<String>,
    /// Inclusive lower bound on the loss percentage.
    pub min_loss_pct: Option<f64>,
}

impl PriorityFilter {
    pub fn matches(&self, asset: &AnnotatedAsset) -> bool {
        let category_ok = self.categories.is_empty() || self.categories.contains(&asset.category);
        let sector_ok = self.sectors.is_empty()
            || self
                .sectors
                .iter()
                .any(|sector| sector == &asset.record.sector);
        let loss_ok = self
            .min_loss_pct
            .map_or(true, |min| asset.metrics.loss_pct >= min);

        category_ok && sector_ok && loss_ok
    }

    /// Keeps ranking order.
    pub fn apply<'a>(&self, assets: &'a [AnnotatedAsset]) -> Vec<&'a AnnotatedAsset> {
        assets.iter().filter(|asset| self.matches(asset)).collect()
    }
}

/// The first `count` assets of an already ranked batch.
pub fn top_critical(assets: &[AnnotatedAsset], count: usize) -> &[AnnotatedAsset] {
    &assets[..assets.len().min(count)]
}
