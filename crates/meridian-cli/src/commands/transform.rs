use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Args;
use meridian_core::transform::{image_to_screen, is_point_in_image_bounds, screen_to_image};
use meridian_core::types::{ImageDimensions, Point2D, ViewportSize};
use meridian_core::viewport::ViewportState;

use super::{load_config, parse_size};

#[derive(Args)]
pub struct TransformArgs {
    /// X coordinate of the input point
    #[arg(allow_hyphen_values = true)]
    pub x: f64,

    /// Y coordinate of the input point
    #[arg(allow_hyphen_values = true)]
    pub y: f64,

    /// Viewport size in screen pixels
    #[arg(long, default_value = "512x512")]
    pub viewport: String,

    /// Image size in columns x rows
    #[arg(long, default_value = "512x512")]
    pub image: String,

    /// Zoom factor (clamped to the configured range)
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Horizontal pan in screen pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub pan_x: f64,

    /// Vertical pan in screen pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub pan_y: f64,

    /// Rotation in degrees
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub rotation: f64,

    /// Treat the input as an image point and convert it to screen space
    #[arg(long)]
    pub to_screen: bool,
}

pub fn run(args: &TransformArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let (vw, vh) = parse_size(&args.viewport)?;
    let (cols, rows) = parse_size(&args.image)?;
    let viewport_size = ViewportSize::new(vw, vh);
    let dims = ImageDimensions::new(cols as u32, rows as u32);

    let mut state = ViewportState::new(&config.viewport);
    state.set_zoom(args.zoom);
    state.set_pan(Point2D::new(args.pan_x, args.pan_y));
    state.set_rotation(args.rotation);
    let ctx = state.transform_context(viewport_size, dims);

    println!("Base scale:  {:.6}", ctx.base_scale);
    println!("Zoom:        {:.4}", ctx.zoom);
    println!("Rotation:    {:.1}\u{b0}", ctx.rotation);

    if args.to_screen {
        let screen = image_to_screen(args.x, args.y, &ctx)
            .ok_or_else(|| anyhow!("transform is not invertible for these parameters"))?;
        println!("Image:       ({:.3}, {:.3})", args.x, args.y);
        println!("Screen:      ({:.3}, {:.3})", screen.x, screen.y);
    } else {
        let image = screen_to_image(args.x, args.y, &ctx)
            .ok_or_else(|| anyhow!("transform is not invertible for these parameters"))?;
        println!("Screen:      ({:.3}, {:.3})", args.x, args.y);
        println!("Image:       ({:.3}, {:.3})", image.x, image.y);
        println!(
            "In bounds:   {}",
            if is_point_in_image_bounds(image, dims) { "yes" } else { "no" }
        );
    }

    Ok(())
}
