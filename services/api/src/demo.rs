use crate::infra::{parse_category, write_exports};
use chrono::Local;
use clap::Args;
use puntorojo::config::AppConfig;
use puntorojo::error::AppError;
use puntorojo::workflows::intake::LossDatasetImporter;
use puntorojo::workflows::losses::{
    demo_assets, top_critical, AnnotatedAsset, LossAnalysis, LossPrioritizationEngine,
    PriorityCategory, PriorityFilter, DEFAULT_TOP_CRITICAL,
};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Asset dataset (.csv, .tsv or .json rows)
    pub(crate) path: PathBuf,
    /// Number of assets in the critical list
    #[arg(long, default_value_t = DEFAULT_TOP_CRITICAL)]
    pub(crate) top: usize,
    /// Only list assets at or above this loss percentage
    #[arg(long)]
    pub(crate) min_loss_pct: Option<f64>,
    /// Restrict the priority list to a sector (repeatable)
    #[arg(long)]
    pub(crate) sector: Vec<String>,
    /// Restrict the priority list to a category code such as HIGH (repeatable)
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Vec<PriorityCategory>,
    /// Write CSV exports into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn filter(&self) -> PriorityFilter {
        PriorityFilter {
            categories: self.category.clone(),
            sectors: self.sector.clone(),
            min_loss_pct: self.min_loss_pct,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of assets in the critical list
    #[arg(long, default_value_t = DEFAULT_TOP_CRITICAL)]
    pub(crate) top: usize,
    /// Write CSV exports into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let table = LossDatasetImporter::from_path(&args.path)?;
    let config = AppConfig::load()?;
    let engine = LossPrioritizationEngine::new(config.engine);
    let analysis = engine.run(&table)?;
    let filter = args.filter();

    println!("Loss prioritization report");
    println!("Data source: {}", args.path.display());
    render_analysis(&analysis, &filter, args.top);

    if let Some(dir) = args.export_dir.as_deref() {
        export_to(dir, &analysis, &filter, args.top)?;
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = LossPrioritizationEngine::new(config.engine);
    let analysis = engine.analyze(demo_assets())?;
    let filter = PriorityFilter::default();

    println!("Loss prioritization demo");
    println!("Data source: built-in eastern corridor fleet");
    render_analysis(&analysis, &filter, args.top);

    if let Some(dir) = args.export_dir.as_deref() {
        export_to(dir, &analysis, &filter, args.top)?;
    }

    Ok(())
}

fn export_to(
    dir: &Path,
    analysis: &LossAnalysis,
    filter: &PriorityFilter,
    top: usize,
) -> Result<(), AppError> {
    let written = write_exports(dir, analysis, filter, top, &Local::now())?;
    println!("\nExports");
    for path in written {
        println!("- {}", path.display());
    }
    Ok(())
}

fn render_analysis(analysis: &LossAnalysis, filter: &PriorityFilter, top: usize) {
    let fleet = &analysis.fleet;
    println!(
        "\nFleet: {} transformers | {:.0} kWh delivered | {:.0} kWh billed",
        fleet.asset_count, fleet.total_delivered_kwh, fleet.total_billed_kwh
    );
    match fleet.overall_loss_pct {
        Some(pct) => println!(
            "Losses: {:.0} kWh ({:.1}%) | {:.2} estimated monetary loss",
            fleet.total_loss_kwh, pct, fleet.total_monetary_loss
        ),
        None => println!("Losses: no delivered energy recorded"),
    }
    println!("Critical transformers: {}", fleet.critical_count);

    let critical = top_critical(&analysis.assets, top);
    if critical.is_empty() {
        println!("\nTop critical: none");
    } else {
        println!("\nTop {} critical", critical.len());
        for (rank, asset) in critical.iter().enumerate() {
            render_asset(rank + 1, asset);
        }
    }

    if analysis.sectors.is_empty() {
        println!("\nSector summary: none");
    } else {
        println!("\nSector summary");
        for sector in &analysis.sectors {
            println!(
                "- {}: {:.0} kWh lost | mean {:.1}% | {:.2} monetary | {} transformers",
                sector.sector,
                sector.total_loss_kwh,
                sector.mean_loss_pct,
                sector.total_monetary_loss,
                sector.asset_count
            );
        }
    }

    if *filter != PriorityFilter::default() {
        let listed = filter.apply(&analysis.assets);
        println!(
            "\nFiltered priority list ({} of {})",
            listed.len(),
            analysis.assets.len()
        );
        for asset in listed {
            println!(
                "- {} ({}) | score {:.1} | loss {:.1}% | {}",
                asset.record.asset_id,
                asset.record.sector,
                asset.priority_score,
                asset.metrics.loss_pct,
                asset.category_label
            );
        }
    }

    if !analysis.skipped.is_empty() {
        println!("\nSkipped rows");
        for skipped in &analysis.skipped {
            println!("- row {} ({}): {}", skipped.row, skipped.asset_id, skipped.error);
        }
    }
}

fn render_asset(rank: usize, asset: &AnnotatedAsset) {
    println!(
        "{:>2}. {} ({}) | score {:.1} | loss {:.0} kWh ({:.1}%) | load {:.0}% | {} band",
        rank,
        asset.record.asset_id,
        asset.record.sector,
        asset.priority_score,
        asset.metrics.loss_kwh,
        asset.metrics.loss_pct,
        asset.metrics.load_pct,
        asset.loss_band.label()
    );
    println!("    {} - {}", asset.category_label, asset.action_label);
    println!("    {}", asset.directive_line());
}
