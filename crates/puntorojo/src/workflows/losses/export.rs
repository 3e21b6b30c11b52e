use super::engine::LossAnalysis;
use super::report::{top_critical, AnnotatedAsset, PriorityFilter, SectorSummary};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::io::Write;

const ASSET_COLUMNS: &[&str] = &[
    "asset_id",
    "sector",
    "latitude",
    "longitude",
    "capacity_kva",
    "energy_delivered_kwh",
    "energy_billed_kwh",
    "loss_kwh",
    "loss_pct",
    "monetary_loss",
    "load_pct",
    "volume_score",
    "pct_score",
    "overload_score",
    "priority_score",
    "category",
    "loss_band",
    "interventions",
];

const SECTOR_COLUMNS: &[&str] = &[
    "sector",
    "total_loss_kwh",
    "mean_loss_pct",
    "total_monetary_loss",
    "asset_count",
];

/// Which table of an analysis to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    Assets,
    Top,
    Sectors,
}

impl ExportTable {
    pub fn file_stem(self, top: usize) -> String {
        match self {
            Self::Assets => "loss_analysis".to_string(),
            Self::Top => format!("top{top}_critical"),
            Self::Sectors => "sector_summary".to_string(),
        }
    }

    /// `<stem>_<YYYYmmdd_HHMM>.csv`
    pub fn file_name<Tz: TimeZone>(self, top: usize, generated_at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "{}_{}.csv",
            self.file_stem(top),
            generated_at.format("%Y%m%d_%H%M")
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LossExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_assets<'a, W, I>(writer: W, assets: I) -> Result<(), LossExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a AnnotatedAsset>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(ASSET_COLUMNS)?;

    for asset in assets {
        csv_writer.write_record([
            asset.record.asset_id.clone(),
            asset.record.sector.clone(),
            asset.record.latitude.to_string(),
            asset.record.longitude.to_string(),
            asset.record.capacity_kva.to_string(),
            asset.record.energy_delivered_kwh.to_string(),
            asset.record.energy_billed_kwh.to_string(),
            asset.metrics.loss_kwh.to_string(),
            asset.metrics.loss_pct.to_string(),
            asset.metrics.monetary_loss.to_string(),
            asset.metrics.load_pct.to_string(),
            asset.scores.volume_score.to_string(),
            asset.scores.pct_score.to_string(),
            asset.scores.overload_score.to_string(),
            asset.priority_score.to_string(),
            asset.category.code().to_string(),
            asset.loss_band.label().to_string(),
            asset.directive_line(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_sectors<W: Write>(
    writer: W,
    sectors: &[SectorSummary],
) -> Result<(), LossExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(SECTOR_COLUMNS)?;

    for sector in sectors {
        csv_writer.write_record([
            sector.sector.clone(),
            sector.total_loss_kwh.to_string(),
            sector.mean_loss_pct.to_string(),
            sector.total_monetary_loss.to_string(),
            sector.asset_count.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serializes the requested table into an in-memory CSV document.
///
/// `filter` narrows the asset table only; the top slice always comes from the full ranking.
pub fn render_table(
    analysis: &LossAnalysis,
    table: ExportTable,
    filter: &PriorityFilter,
    top: usize,
) -> Result<Vec<u8>, LossExportError> {
    let mut buffer = Vec::new();
    match table {
        ExportTable::Assets => write_assets(&mut buffer, filter.apply(&analysis.assets))?,
        ExportTable::Top => write_assets(&mut buffer, top_critical(&analysis.assets, top))?,
        ExportTable::Sectors => write_sectors(&mut buffer, &analysis.sectors)?,
    }
    Ok(buffer)
}
