use chrono::{DateTime, TimeZone};
use metrics_exporter_prometheus::PrometheusHandle;
use puntorojo::error::AppError;
use puntorojo::workflows::losses::{
    render_table, ExportTable, LossAnalysis, LossPrioritizationEngine, PriorityCategory,
    PriorityFilter,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<LossPrioritizationEngine>,
}

pub(crate) fn parse_category(raw: &str) -> Result<PriorityCategory, String> {
    PriorityCategory::from_code(raw).ok_or_else(|| {
        let known = PriorityCategory::ordered()
            .iter()
            .map(|category| category.code())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown category '{raw}' (expected one of {known})")
    })
}

/// Writes the asset, top-N and sector tables into `dir`, returning the created paths.
pub(crate) fn write_exports<Tz>(
    dir: &Path,
    analysis: &LossAnalysis,
    filter: &PriorityFilter,
    top: usize,
    generated_at: &DateTime<Tz>,
) -> Result<Vec<PathBuf>, AppError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for table in [ExportTable::Assets, ExportTable::Top, ExportTable::Sectors] {
        let contents = render_table(analysis, table, filter, top)?;
        let path = dir.join(table.file_name(top, generated_at));
        std::fs::write(&path, contents)?;
        written.push(path);
    }

    Ok(written)
}
