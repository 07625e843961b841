use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use meridian_core::geometry::{calculate_polygon_area_mm2, calculate_volume_from_contours};
use meridian_core::types::Point2D;

use super::spacing_from_args;

#[derive(Args)]
pub struct VolumeArgs {
    /// Contour file: JSON object mapping slice index to a list of {x, y} points
    pub file: PathBuf,

    /// Row spacing in mm
    #[arg(long)]
    pub row_spacing: f64,

    /// Column spacing in mm (defaults to the row spacing)
    #[arg(long)]
    pub col_spacing: Option<f64>,

    /// Distance between adjacent slices in mm
    #[arg(long)]
    pub thickness: f64,
}

pub fn run(args: &VolumeArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read contours {}", args.file.display()))?;
    let contours: BTreeMap<usize, Vec<Point2D>> =
        serde_json::from_str(&contents).context("Invalid contour file")?;
    if contours.is_empty() {
        bail!("{} contains no contours", args.file.display());
    }

    let spacing = spacing_from_args(Some(args.row_spacing), args.col_spacing);
    println!("Slices:      {}", contours.len());
    for (slice, points) in &contours {
        let area = calculate_polygon_area_mm2(points, spacing).unwrap_or(0.0);
        println!("  slice {:<5} {:>4} pts  {:>12.2} mm\u{b2}", slice, points.len(), area);
    }

    match calculate_volume_from_contours(&contours, spacing, args.thickness) {
        Some(volume) => println!("Volume:      {:.2} mm\u{b3} ({:.3} mL)", volume, volume / 1000.0),
        None => bail!("volume needs contours on at least two slices"),
    }
    Ok(())
}
