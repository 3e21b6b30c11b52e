//! Ordered rule tables applied to every scored asset.
//!
//! The categorizer stops at the first matching rule; the suggestion table runs every rule
//! and keeps each directive that fires. Both read the same [`RuleInput`] and never each
//! other's output.

mod categorize;
mod suggest;

pub use categorize::{categorize, CategoryRule, CATEGORY_RULES};
pub use suggest::{suggest, SuggestionRule, SUGGESTION_RULES};

use super::config::RuleThresholds;
use super::domain::LossBand;
use super::scoring::ScoredAsset;

/// The slice of a scored asset the rules are allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInput<'a> {
    pub sector: &'a str,
    pub loss_pct: f64,
    pub load_pct: f64,
    pub priority_score: f64,
}

impl<'a> RuleInput<'a> {
    pub fn from_scored(asset: &'a ScoredAsset) -> Self {
        Self {
            sector: &asset.record.sector,
            loss_pct: asset.metrics.loss_pct,
            load_pct: asset.metrics.load_pct,
            priority_score: asset.priority_score,
        }
    }
}

pub fn loss_band(loss_pct: f64, thresholds: &RuleThresholds) -> LossBand {
    if loss_pct > thresholds.critical_band_loss_pct {
        LossBand::Critical
    } else if loss_pct > thresholds.elevated_band_loss_pct {
        LossBand::Elevated
    } else {
        LossBand::Normal
    }
}
