use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use meridian_core::measurement::MeasurementStore;

use super::{load_config, spacing_from_args};
use crate::summary::print_measurement_report;

#[derive(Args)]
pub struct ReportArgs {
    /// Measurement file (JSON array as written by the store export)
    pub file: PathBuf,

    /// Only report measurements of this series
    #[arg(long)]
    pub series: Option<String>,

    /// Row spacing in mm; recomputes metrics when given
    #[arg(long)]
    pub row_spacing: Option<f64>,

    /// Column spacing in mm (defaults to the row spacing)
    #[arg(long)]
    pub col_spacing: Option<f64>,

    /// Print the (recomputed) measurements as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ReportArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read measurements {}", args.file.display()))?;

    let mut store = MeasurementStore::new(config.measurement);
    let imported = store
        .import_json(&contents)
        .with_context(|| format!("Invalid measurement file {}", args.file.display()))?;
    tracing::info!(count = imported, file = %args.file.display(), "Measurements loaded");

    let spacing = spacing_from_args(args.row_spacing, args.col_spacing);
    let mut measurements = store.export_measurements(args.series.as_deref());
    if spacing.is_some() {
        for m in &mut measurements {
            m.recompute_metrics(spacing);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&measurements)?);
    } else {
        print_measurement_report(&measurements, spacing);
    }
    Ok(())
}
