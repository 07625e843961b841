use crate::numeric::clamp;
use crate::types::{PixelSpacing, Point2D};

/// Euclidean distance in pixels.
pub fn distance_pixels(a: Point2D, b: Point2D) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Physical distance, scaling x by column spacing and y by row spacing.
pub fn calculate_distance_mm(a: Point2D, b: Point2D, spacing: Option<PixelSpacing>) -> Option<f64> {
    let spacing = spacing?;
    let dx = (b.x - a.x) * spacing.column_spacing;
    let dy = (b.y - a.y) * spacing.row_spacing;
    Some(dx.hypot(dy))
}

pub fn midpoint(a: Point2D, b: Point2D) -> Point2D {
    Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Mean of the points, or the origin for an empty slice.
pub fn centroid(points: &[Point2D]) -> Point2D {
    if points.is_empty() {
        return Point2D::ORIGIN;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}

/// Sum of edge lengths in millimetres. When `closed`, the edge from the last
/// point back to the first is included (only for three or more points, so a
/// two-point path is not counted twice).
pub fn calculate_perimeter_mm(
    points: &[Point2D],
    spacing: Option<PixelSpacing>,
    closed: bool,
) -> Option<f64> {
    let lengths = calculate_segment_lengths(points, spacing)?;
    let mut total: f64 = lengths.iter().sum();
    if closed && points.len() > 2 {
        total += calculate_distance_mm(points[points.len() - 1], points[0], spacing)?;
    }
    Some(total)
}

/// Physical length of each consecutive edge: `n - 1` values for `n` points.
pub fn calculate_segment_lengths(
    points: &[Point2D],
    spacing: Option<PixelSpacing>,
) -> Option<Vec<f64>> {
    let spacing = spacing?;
    Some(
        points
            .windows(2)
            .filter_map(|w| calculate_distance_mm(w[0], w[1], Some(spacing)))
            .collect(),
    )
}

/// Shortest pixel distance from `point` to the segment `start..end`.
pub fn distance_to_line_segment(point: Point2D, start: Point2D, end: Point2D) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance_pixels(point, start);
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / len_sq;
    let t = clamp(t, 0.0, 1.0);
    let projection = Point2D::new(start.x + t * dx, start.y + t * dy);
    distance_pixels(point, projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_edge_not_doubled_for_two_points() {
        let pts = [Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0)];
        let p = calculate_perimeter_mm(&pts, Some(PixelSpacing::isotropic(1.0)), true);
        assert_eq!(p, Some(5.0));
    }
}
