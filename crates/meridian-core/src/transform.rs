//! Screen ↔ image coordinate conversion under pan, zoom and rotation.
//!
//! The forward pipeline (image → screen) is:
//!
//! 1. subtract the image center, so rotation and scaling happen about it,
//! 2. rotate by the viewport rotation,
//! 3. scale by `base_scale * zoom`,
//! 4. add the viewport center and the pan offset.
//!
//! [`screen_to_image`] runs the same steps backwards. Both directions are
//! built from the same context so that composing them reproduces the input
//! up to floating-point error.

use serde::{Deserialize, Serialize};

use crate::numeric::{clamp, normalize_degrees};
use crate::types::{ImageDimensions, Point2D, ViewportSize};

/// Everything a transform function needs to know about one viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransformContext {
    pub viewport_size: ViewportSize,
    pub image_dimensions: ImageDimensions,
    pub zoom: f64,
    pub pan: Point2D,
    /// Degrees, clockwise on screen.
    pub rotation: f64,
    /// Fit-to-viewport scale at zoom 1.
    pub base_scale: f64,
}

impl CoordinateTransformContext {
    /// Build a context, deriving `base_scale` from the two sizes.
    pub fn new(
        viewport_size: ViewportSize,
        image_dimensions: ImageDimensions,
        zoom: f64,
        pan: Point2D,
        rotation: f64,
    ) -> Self {
        Self {
            viewport_size,
            image_dimensions,
            zoom,
            pan,
            rotation,
            base_scale: calculate_base_scale(viewport_size, image_dimensions),
        }
    }

    /// Screen pixels per image pixel.
    pub fn effective_scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    fn is_valid(&self) -> bool {
        let scale = self.effective_scale();
        scale.is_finite()
            && scale > 0.0
            && self.pan.is_finite()
            && self.rotation.is_finite()
            && self.viewport_size.width.is_finite()
            && self.viewport_size.height.is_finite()
    }
}

/// Rotate `(x, y)` about the origin by `angle_deg`.
///
/// Right angles are handled with exact swaps so that repeated quarter turns
/// accumulate no error.
pub fn rotate_point(x: f64, y: f64, angle_deg: f64) -> Point2D {
    let angle = normalize_degrees(angle_deg);
    if angle == 0.0 {
        Point2D::new(x, y)
    } else if angle == 90.0 {
        Point2D::new(-y, x)
    } else if angle == 180.0 {
        Point2D::new(-x, -y)
    } else if angle == 270.0 {
        Point2D::new(y, -x)
    } else {
        let (sin, cos) = angle.to_radians().sin_cos();
        Point2D::new(x * cos - y * sin, x * sin + y * cos)
    }
}

/// Rotate `point` about `center` by `angle_deg`.
pub fn rotate_point_around(point: Point2D, center: Point2D, angle_deg: f64) -> Point2D {
    let rotated = rotate_point(point.x - center.x, point.y - center.y, angle_deg);
    rotated + center
}

/// Scale that fits the whole image into the viewport at zoom 1.
///
/// Returns 1 when either size has a zero dimension.
pub fn calculate_base_scale(viewport_size: ViewportSize, image_dimensions: ImageDimensions) -> f64 {
    if viewport_size.is_empty() || image_dimensions.is_empty() {
        return 1.0;
    }
    let sx = viewport_size.width / image_dimensions.columns as f64;
    let sy = viewport_size.height / image_dimensions.rows as f64;
    sx.min(sy)
}

/// Convert a screen position to image pixel coordinates.
///
/// Returns `None` only when the context cannot be inverted (zero or
/// non-finite scale, non-finite inputs). Points outside the image are
/// returned as-is; use [`is_point_in_image_bounds`] to reject them.
pub fn screen_to_image(
    screen_x: f64,
    screen_y: f64,
    ctx: &CoordinateTransformContext,
) -> Option<Point2D> {
    if !ctx.is_valid() || !screen_x.is_finite() || !screen_y.is_finite() {
        return None;
    }
    let center = ctx.viewport_size.center();
    let scale = ctx.effective_scale();

    let dx = (screen_x - center.x - ctx.pan.x) / scale;
    let dy = (screen_y - center.y - ctx.pan.y) / scale;
    let unrotated = rotate_point(dx, dy, -ctx.rotation);

    Some(unrotated + ctx.image_dimensions.center())
}

/// Convert image pixel coordinates to a screen position.
pub fn image_to_screen(
    image_x: f64,
    image_y: f64,
    ctx: &CoordinateTransformContext,
) -> Option<Point2D> {
    if !ctx.is_valid() || !image_x.is_finite() || !image_y.is_finite() {
        return None;
    }
    let image_center = ctx.image_dimensions.center();
    let scale = ctx.effective_scale();

    let rotated = rotate_point(image_x - image_center.x, image_y - image_center.y, ctx.rotation);
    let center = ctx.viewport_size.center();

    Some(Point2D::new(
        rotated.x * scale + center.x + ctx.pan.x,
        rotated.y * scale + center.y + ctx.pan.y,
    ))
}

/// Map a polyline to screen space. An invalid context yields an empty vector.
pub fn image_points_to_screen(points: &[Point2D], ctx: &CoordinateTransformContext) -> Vec<Point2D> {
    points
        .iter()
        .map(|p| image_to_screen(p.x, p.y, ctx))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Length in image pixels of a screen-space distance.
pub fn screen_distance_to_image(distance: f64, ctx: &CoordinateTransformContext) -> f64 {
    let scale = ctx.effective_scale();
    if scale > 0.0 && scale.is_finite() {
        distance / scale
    } else {
        distance
    }
}

/// Length in screen pixels of an image-space distance.
pub fn image_distance_to_screen(distance: f64, ctx: &CoordinateTransformContext) -> f64 {
    distance * ctx.effective_scale()
}

/// Inclusive bounds test against `[0, columns] x [0, rows]`.
pub fn is_point_in_image_bounds(point: Point2D, dims: ImageDimensions) -> bool {
    point.x >= 0.0
        && point.x <= dims.columns as f64
        && point.y >= 0.0
        && point.y <= dims.rows as f64
}

/// Clamp each axis of `point` into the inclusive image bounds.
pub fn clamp_point_to_image(point: Point2D, dims: ImageDimensions) -> Point2D {
    Point2D::new(
        clamp(point.x, 0.0, dims.columns as f64),
        clamp(point.y, 0.0, dims.rows as f64),
    )
}

/// Pan offset that keeps the image point under the cursor fixed while the
/// zoom changes from `old_zoom` to `new_zoom`.
///
/// If the cursor cannot be resolved to an image point the current pan is
/// returned unchanged.
#[allow(clippy::too_many_arguments)]
pub fn calculate_zoom_at_point(
    cursor_x: f64,
    cursor_y: f64,
    old_zoom: f64,
    new_zoom: f64,
    pan: Point2D,
    viewport_size: ViewportSize,
    image_dimensions: ImageDimensions,
    base_scale: f64,
    rotation: f64,
) -> Point2D {
    let before = CoordinateTransformContext {
        viewport_size,
        image_dimensions,
        zoom: old_zoom,
        pan,
        rotation,
        base_scale,
    };
    let Some(anchor) = screen_to_image(cursor_x, cursor_y, &before) else {
        return pan;
    };

    let after = CoordinateTransformContext {
        zoom: new_zoom,
        pan: Point2D::ORIGIN,
        ..before
    };
    match image_to_screen(anchor.x, anchor.y, &after) {
        Some(unpanned) => Point2D::new(cursor_x - unpanned.x, cursor_y - unpanned.y),
        None => pan,
    }
}
