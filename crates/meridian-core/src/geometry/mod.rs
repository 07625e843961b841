//! Lengths, areas, volumes and hit-testing in image pixel space.
//!
//! Functions with an `_mm` suffix take an optional [`PixelSpacing`] and return
//! `None` when it is absent: the physical size is unknown, which callers show
//! as "N/A" rather than treat as an error.
//!
//! [`PixelSpacing`]: crate::types::PixelSpacing

pub mod area;
pub mod containment;
pub mod distance;

pub use area::{
    calculate_ellipse_area_mm2, calculate_ellipse_perimeter_mm, calculate_polygon_area_mm2,
    calculate_polygon_area_pixels, calculate_rectangle_area_mm2, calculate_volume_from_contours,
};
pub use containment::{get_bounding_box, is_point_in_ellipse, is_point_in_polygon};
pub use distance::{
    calculate_distance_mm, calculate_perimeter_mm, calculate_segment_lengths, centroid,
    distance_pixels, distance_to_line_segment, midpoint,
};
pub use hit_test::{hit_test_measurements, HitResult};
