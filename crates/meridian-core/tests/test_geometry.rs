#[allow(dead_code)]
mod common;

use std::collections::BTreeMap;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use meridian_core::geometry::{
    calculate_distance_mm, calculate_ellipse_area_mm2, calculate_perimeter_mm,
    calculate_polygon_area_mm2, calculate_polygon_area_pixels, calculate_rectangle_area_mm2,
    calculate_segment_lengths, calculate_volume_from_contours, centroid, distance_pixels,
    distance_to_line_segment, get_bounding_box, is_point_in_ellipse, is_point_in_polygon,
    midpoint,
};
use meridian_core::types::{PixelSpacing, Point2D};

use common::{square, unit_spacing};

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

#[test]
fn test_distance_pixels() {
    assert_abs_diff_eq!(
        distance_pixels(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0)),
        5.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_distance_mm_uses_anisotropic_spacing() {
    let spacing = Some(PixelSpacing::new(2.0, 0.5));
    // dx = 10 columns * 0.5, dy = 0 rows
    let d = calculate_distance_mm(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), spacing).unwrap();
    assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
    // dy = 10 rows * 2.0
    let d = calculate_distance_mm(Point2D::new(0.0, 0.0), Point2D::new(0.0, 10.0), spacing).unwrap();
    assert_abs_diff_eq!(d, 20.0, epsilon = 1e-12);
}

#[test]
fn test_distance_mm_without_spacing_is_none() {
    assert!(calculate_distance_mm(Point2D::ORIGIN, Point2D::new(1.0, 1.0), None).is_none());
}

#[test]
fn test_midpoint_and_centroid() {
    assert_eq!(
        midpoint(Point2D::new(0.0, 0.0), Point2D::new(4.0, 2.0)),
        Point2D::new(2.0, 1.0)
    );
    assert_eq!(centroid(&square(0.0, 0.0, 10.0)), Point2D::new(5.0, 5.0));
    assert_eq!(centroid(&[]), Point2D::ORIGIN);
}

#[test]
fn test_distance_to_line_segment_cases() {
    let a = Point2D::new(0.0, 0.0);
    let b = Point2D::new(10.0, 0.0);
    // perpendicular foot inside the segment
    assert_abs_diff_eq!(distance_to_line_segment(Point2D::new(5.0, 3.0), a, b), 3.0, epsilon = 1e-12);
    // beyond each end the nearest endpoint counts
    assert_abs_diff_eq!(distance_to_line_segment(Point2D::new(-3.0, 4.0), a, b), 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(distance_to_line_segment(Point2D::new(13.0, 4.0), a, b), 5.0, epsilon = 1e-12);
    // degenerate segment
    assert_abs_diff_eq!(distance_to_line_segment(Point2D::new(3.0, 4.0), a, a), 5.0, epsilon = 1e-12);
}

#[test]
fn test_segment_lengths_and_perimeter() {
    let pts = square(0.0, 0.0, 10.0);
    let lengths = calculate_segment_lengths(&pts, unit_spacing()).unwrap();
    assert_eq!(lengths.len(), 3);
    assert_abs_diff_eq!(calculate_perimeter_mm(&pts, unit_spacing(), false).unwrap(), 30.0, epsilon = 1e-9);
    assert_abs_diff_eq!(calculate_perimeter_mm(&pts, unit_spacing(), true).unwrap(), 40.0, epsilon = 1e-9);

    // A closed two-point path is not counted twice.
    let two = [Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0)];
    assert_abs_diff_eq!(calculate_perimeter_mm(&two, unit_spacing(), true).unwrap(), 5.0, epsilon = 1e-9);

    assert!(calculate_perimeter_mm(&pts, None, true).is_none());
}

// ---------------------------------------------------------------------------
// Areas
// ---------------------------------------------------------------------------

#[test]
fn test_square_area_is_winding_independent() {
    let cw = square(0.0, 0.0, 100.0);
    let mut ccw = cw.clone();
    ccw.reverse();
    assert_abs_diff_eq!(calculate_polygon_area_pixels(&cw), 10000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(calculate_polygon_area_pixels(&ccw), 10000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        calculate_polygon_area_mm2(&ccw, unit_spacing()).unwrap(),
        10000.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_polygon_area_scales_with_spacing() {
    let area = calculate_polygon_area_mm2(&square(0.0, 0.0, 10.0), Some(PixelSpacing::new(0.5, 2.0)))
        .unwrap();
    assert_relative_eq!(area, 100.0);
}

#[test]
fn test_polygon_area_sentinels() {
    let two = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)];
    assert_eq!(calculate_polygon_area_pixels(&two), 0.0);
    assert!(calculate_polygon_area_mm2(&two, unit_spacing()).is_none());
    assert!(calculate_polygon_area_mm2(&square(0.0, 0.0, 1.0), None).is_none());
}

#[test]
fn test_ellipse_and_rectangle_area() {
    let area = calculate_ellipse_area_mm2(10.0, 5.0, Some(PixelSpacing::isotropic(2.0))).unwrap();
    assert_relative_eq!(area, std::f64::consts::PI * 20.0 * 10.0);
    // radii are taken as magnitudes
    let neg = calculate_ellipse_area_mm2(-10.0, 5.0, Some(PixelSpacing::isotropic(2.0))).unwrap();
    assert_relative_eq!(neg, area);

    let rect = calculate_rectangle_area_mm2(-4.0, 3.0, Some(PixelSpacing::new(1.0, 0.5))).unwrap();
    assert_relative_eq!(rect, 6.0);
    assert!(calculate_rectangle_area_mm2(4.0, 3.0, None).is_none());
}

// ---------------------------------------------------------------------------
// Volume
// ---------------------------------------------------------------------------

#[test]
fn test_volume_of_identical_contours() {
    let mut contours = BTreeMap::new();
    for slice in 0..5 {
        contours.insert(slice, square(0.0, 0.0, 10.0));
    }
    // (N - 1) * A * T
    let v = calculate_volume_from_contours(&contours, unit_spacing(), 2.5).unwrap();
    assert_relative_eq!(v, 4.0 * 100.0 * 2.5);
}

#[test]
fn test_volume_trapezoid_between_different_areas() {
    let mut contours = BTreeMap::new();
    contours.insert(3, square(0.0, 0.0, 10.0));
    contours.insert(7, square(0.0, 0.0, 20.0));
    let v = calculate_volume_from_contours(&contours, unit_spacing(), 1.0).unwrap();
    assert_relative_eq!(v, (100.0 + 400.0) / 2.0);
}

#[test]
fn test_volume_small_contour_counts_as_zero() {
    let mut contours = BTreeMap::new();
    contours.insert(0, square(0.0, 0.0, 10.0));
    contours.insert(1, vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)]);
    let v = calculate_volume_from_contours(&contours, unit_spacing(), 2.0).unwrap();
    assert_relative_eq!(v, 100.0);
}

#[test]
fn test_volume_needs_two_slices_and_spacing() {
    let mut contours = BTreeMap::new();
    contours.insert(0, square(0.0, 0.0, 10.0));
    assert!(calculate_volume_from_contours(&contours, unit_spacing(), 1.0).is_none());
    contours.insert(1, square(0.0, 0.0, 10.0));
    assert!(calculate_volume_from_contours(&contours, None, 1.0).is_none());
}

// ---------------------------------------------------------------------------
// Containment and bounds
// ---------------------------------------------------------------------------

#[test]
fn test_point_in_concave_polygon() {
    // Arrow pointing right with a notch cut into its left side.
    let arrow = vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(10.0, 5.0),
        Point2D::new(0.0, 10.0),
        Point2D::new(4.0, 5.0),
    ];
    assert!(is_point_in_polygon(Point2D::new(6.0, 5.0), &arrow));
    assert!(!is_point_in_polygon(Point2D::new(2.0, 5.0), &arrow));
    assert!(!is_point_in_polygon(Point2D::new(11.0, 5.0), &arrow));
}

#[test]
fn test_point_in_polygon_needs_three_vertices() {
    let two = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    assert!(!is_point_in_polygon(Point2D::new(5.0, 5.0), &two));
}

#[test]
fn test_point_in_ellipse() {
    let c = Point2D::new(10.0, 10.0);
    assert!(is_point_in_ellipse(Point2D::new(19.0, 10.0), c, 10.0, 5.0));
    assert!(is_point_in_ellipse(Point2D::new(20.0, 10.0), c, 10.0, 5.0));
    assert!(!is_point_in_ellipse(Point2D::new(10.0, 16.0), c, 10.0, 5.0));
    assert!(!is_point_in_ellipse(c, c, 0.0, 5.0));
}

#[test]
fn test_bounding_box() {
    let bb = get_bounding_box(&[
        Point2D::new(3.0, -1.0),
        Point2D::new(-2.0, 4.0),
        Point2D::new(1.0, 1.0),
    ]);
    assert_eq!((bb.min_x, bb.min_y, bb.max_x, bb.max_y), (-2.0, -1.0, 3.0, 4.0));
    assert_eq!(bb.width(), 5.0);
    assert_eq!(bb.height(), 5.0);

    let empty = get_bounding_box(&[]);
    assert_eq!(empty.width(), 0.0);
}
