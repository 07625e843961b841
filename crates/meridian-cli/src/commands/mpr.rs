use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use meridian_core::mpr::{MprSyncEngine, Plane, VolumeIndex, VolumeInfo};

use super::load_config;
use crate::summary::print_mpr_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum PlaneArg {
    Axial,
    Coronal,
    Sagittal,
}

impl From<PlaneArg> for Plane {
    fn from(arg: PlaneArg) -> Self {
        match arg {
            PlaneArg::Axial => Plane::Axial,
            PlaneArg::Coronal => Plane::Coronal,
            PlaneArg::Sagittal => Plane::Sagittal,
        }
    }
}

#[derive(Args)]
pub struct MprArgs {
    /// Volume dimensions as I,J,K voxel counts
    #[arg(long, value_delimiter = ',', num_args = 3, required = true)]
    pub dims: Vec<usize>,

    /// Voxel spacing in mm as I,J,K
    #[arg(long, value_delimiter = ',', num_args = 3, default_value = "1,1,1")]
    pub spacing: Vec<f64>,

    /// Modality used to pick the default window (CT, MR, ...)
    #[arg(long, default_value = "")]
    pub modality: String,

    /// Move the crosshair to I,J,K after loading (clamped into the volume)
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    pub crosshair: Option<Vec<i64>>,

    /// Unlink the views before moving the crosshair
    #[arg(long)]
    pub unlinked: bool,

    /// Set one plane's slice after the crosshair move
    #[arg(long, value_enum, requires = "slice")]
    pub plane: Option<PlaneArg>,

    /// Slice index for `--plane`
    #[arg(long, requires = "plane", allow_hyphen_values = true)]
    pub slice: Option<i64>,

    /// Print the resulting state as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &MprArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let (Ok(dims), Ok(spacing)) = (
        <[usize; 3]>::try_from(args.dims.as_slice()),
        <[f64; 3]>::try_from(args.spacing.as_slice()),
    ) else {
        bail!("--dims and --spacing take exactly three comma-separated values");
    };

    let mut engine = MprSyncEngine::new(config.window_presets);
    engine.set_volume_info(VolumeInfo::new(dims, spacing).with_modality(args.modality.as_str()));

    if args.unlinked {
        engine.toggle_linked();
    }
    if let Some(ref c) = args.crosshair {
        if let [i, j, k] = c.as_slice() {
            engine.set_crosshair_position(VolumeIndex::new(*i, *j, *k));
        }
    }
    if let (Some(plane), Some(slice)) = (args.plane, args.slice) {
        engine.set_slice_index(plane.into(), slice);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(engine.state())?);
    } else {
        print_mpr_summary(&engine);
    }
    Ok(())
}
