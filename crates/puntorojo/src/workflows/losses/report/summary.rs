use super::views::{AnnotatedAsset, FleetIndicators, SectorSummary};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct SectorTotals {
    loss_kwh: f64,
    loss_pct: f64,
    monetary_loss: f64,
    count: usize,
}

/// Groups the batch by sector, largest total loss first.
///
/// Sectors with equal totals keep the order in which they first appear in `assets`.
pub fn summarize_sectors(assets: &[AnnotatedAsset]) -> Vec<SectorSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, SectorTotals> = HashMap::new();

    for asset in assets {
        let sector = asset.record.sector.as_str();
        let entry = totals.entry(sector).or_insert_with(|| {
            order.push(sector);
            SectorTotals::default()
        });
        entry.loss_kwh += asset.metrics.loss_kwh;
        entry.loss_pct += asset.metrics.loss_pct;
        entry.monetary_loss += asset.metrics.monetary_loss;
        entry.count += 1;
    }

    let mut summaries: Vec<SectorSummary> = order
        .into_iter()
        .filter_map(|sector| {
            totals.get(sector).map(|total| SectorSummary {
                sector: sector.to_string(),
                total_loss_kwh: total.loss_kwh,
                mean_loss_pct: total.loss_pct / total.count as f64,
                total_monetary_loss: total.monetary_loss,
                asset_count: total.count,
            })
        })
        .collect();

    summaries.sort_by(|left, right| right.total_loss_kwh.total_cmp(&left.total_loss_kwh));
    summaries
}

pub fn fleet_indicators(assets: &[AnnotatedAsset]) -> FleetIndicators {
    let mut indicators = FleetIndicators {
        asset_count: assets.len(),
        ..FleetIndicators::default()
    };

    for asset in assets {
        indicators.total_delivered_kwh += asset.record.energy_delivered_kwh;
        indicators.total_billed_kwh += asset.record.energy_billed_kwh;
        indicators.total_loss_kwh += asset.metrics.loss_kwh;
        indicators.total_monetary_loss += asset.metrics.monetary_loss;
        if asset.category.is_critical() {
            indicators.critical_count += 1;
        }
    }

    if indicators.total_delivered_kwh != 0.0 {
        indicators.overall_loss_pct =
            Some(indicators.total_loss_kwh / indicators.total_delivered_kwh * 100.0);
    }

    indicators
}
