use meridian_core::config::ViewerConfig;
use meridian_core::measurement::{MeasurementGeometry, MeasurementScope};
use meridian_core::types::{ImageDimensions, PixelSpacing, Point2D, ViewportSize};
use meridian_core::viewport::{FrameContext, ViewportInteractionController};

pub const SERIES: &str = "1.2.840.1";
pub const FRAME: &str = "frame-0";

/// Axis-aligned square with its top-left corner at `(x, y)`.
pub fn square(x: f64, y: f64, side: f64) -> Vec<Point2D> {
    vec![
        Point2D::new(x, y),
        Point2D::new(x + side, y),
        Point2D::new(x + side, y + side),
        Point2D::new(x, y + side),
    ]
}

pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> MeasurementGeometry {
    MeasurementGeometry::Line {
        points: [Point2D::new(x0, y0), Point2D::new(x1, y1)],
    }
}

pub fn unit_spacing() -> Option<PixelSpacing> {
    Some(PixelSpacing::isotropic(1.0))
}

/// A 512x512 frame shown in a 512x512 viewport, so screen and image pixels
/// coincide at zoom 1 with no pan or rotation.
pub fn frame_context(scope: MeasurementScope) -> FrameContext {
    FrameContext {
        series_uid: SERIES.to_string(),
        frame_key: FRAME.to_string(),
        spacing: unit_spacing(),
        image_dimensions: ImageDimensions::new(512, 512),
        slice_count: 20,
        scope,
    }
}

pub fn controller() -> ViewportInteractionController {
    let mut c = ViewportInteractionController::new(ViewerConfig::default());
    c.set_viewport_size(ViewportSize::new(512.0, 512.0));
    c.set_frame(frame_context(MeasurementScope::Frame));
    c
}
