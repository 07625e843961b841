pub mod config;
pub mod mpr;
pub mod report;
pub mod transform;
pub mod volume;

use std::path::Path;

use anyhow::{bail, Context, Result};
use meridian_core::config::ViewerConfig;
use meridian_core::types::PixelSpacing;

/// Load and validate a viewer config, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ViewerConfig = toml::from_str(&contents).context("Invalid viewer config")?;
    config
        .validate()
        .with_context(|| format!("Invalid viewer config {}", path.display()))?;
    Ok(config)
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<(f64, f64)> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got '{s}'");
    };
    let w: f64 = w.trim().parse().with_context(|| format!("bad width in '{s}'"))?;
    let h: f64 = h.trim().parse().with_context(|| format!("bad height in '{s}'"))?;
    if w < 0.0 || h < 0.0 {
        bail!("size must not be negative, got '{s}'");
    }
    Ok((w, h))
}

/// Spacing from the optional `--row-spacing` / `--col-spacing` pair.
pub fn spacing_from_args(row: Option<f64>, col: Option<f64>) -> Option<PixelSpacing> {
    match (row, col) {
        (Some(r), Some(c)) => Some(PixelSpacing::new(r, c)),
        (Some(s), None) | (None, Some(s)) => Some(PixelSpacing::isotropic(s)),
        (None, None) => None,
    }
}
