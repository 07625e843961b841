use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::types::{PixelSpacing, Point2D};

/// Twice the signed shoelace area, in squared pixels.
fn shoelace_sum(points: &[Point2D]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Polygon area in pixels. Fewer than three points yield `0.0`.
pub fn calculate_polygon_area_pixels(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    (shoelace_sum(points) / 2.0).abs()
}

/// Polygon area in square millimetres.
///
/// `None` for fewer than three points or unknown spacing. The winding
/// direction does not affect the result.
pub fn calculate_polygon_area_mm2(
    points: &[Point2D],
    spacing: Option<PixelSpacing>,
) -> Option<f64> {
    let spacing = spacing?;
    if points.len() < 3 {
        return None;
    }
    Some(calculate_polygon_area_pixels(points) * spacing.column_spacing * spacing.row_spacing)
}

/// Ellipse area from pixel radii: `pi * (rx * col) * (ry * row)`.
pub fn calculate_ellipse_area_mm2(
    radius_x_pixels: f64,
    radius_y_pixels: f64,
    spacing: Option<PixelSpacing>,
) -> Option<f64> {
    let spacing = spacing?;
    Some(
        PI * (radius_x_pixels.abs() * spacing.column_spacing)
            * (radius_y_pixels.abs() * spacing.row_spacing),
    )
}

/// Ellipse circumference (Ramanujan's second approximation) on the physical
/// radii.
pub fn calculate_ellipse_perimeter_mm(
    radius_x_pixels: f64,
    radius_y_pixels: f64,
    spacing: Option<PixelSpacing>,
) -> Option<f64> {
    let spacing = spacing?;
    let a = radius_x_pixels.abs() * spacing.column_spacing;
    let b = radius_y_pixels.abs() * spacing.row_spacing;
    if a + b == 0.0 {
        return Some(0.0);
    }
    let h = (a - b).powi(2) / (a + b).powi(2);
    Some(PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt())))
}

pub fn calculate_rectangle_area_mm2(
    width_pixels: f64,
    height_pixels: f64,
    spacing: Option<PixelSpacing>,
) -> Option<f64> {
    let spacing = spacing?;
    Some((width_pixels.abs() * spacing.column_spacing) * (height_pixels.abs() * spacing.row_spacing))
}

/// Volume in cubic millimetres of a structure outlined on stacked slices.
///
/// Adjacent slices (in index order) contribute the mean of their areas times
/// `slice_thickness_mm`. Contours with fewer than three points count as zero
/// area. Returns `None` with fewer than two slices or unknown spacing.
pub fn calculate_volume_from_contours(
    contours_by_slice: &BTreeMap<usize, Vec<Point2D>>,
    spacing: Option<PixelSpacing>,
    slice_thickness_mm: f64,
) -> Option<f64> {
    let spacing = spacing?;
    if contours_by_slice.len() < 2 {
        return None;
    }

    let areas: Vec<f64> = contours_by_slice
        .values()
        .map(|points| calculate_polygon_area_mm2(points, Some(spacing)).unwrap_or(0.0))
        .collect();

    Some(
        areas
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0 * slice_thickness_mm)
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_perimeter_matches_closed_form() {
        let p = calculate_ellipse_perimeter_mm(10.0, 10.0, Some(PixelSpacing::isotropic(1.0)))
            .unwrap();
        assert!((p - 2.0 * PI * 10.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_ellipse_has_zero_perimeter() {
        let p = calculate_ellipse_perimeter_mm(0.0, 0.0, Some(PixelSpacing::isotropic(1.0)));
        assert_eq!(p, Some(0.0));
    }
}
