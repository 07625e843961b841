use crate::types::{BoundingBox, Point2D};

/// Even-odd ray casting. Concave polygons are handled; fewer than three
/// vertices never contain anything.
pub fn is_point_in_polygon(point: Point2D, polygon: &[Point2D]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// `((x - cx) / rx)^2 + ((y - cy) / ry)^2 <= 1`. A zero radius contains
/// nothing.
pub fn is_point_in_ellipse(point: Point2D, center: Point2D, radius_x: f64, radius_y: f64) -> bool {
    if radius_x == 0.0 || radius_y == 0.0 {
        return false;
    }
    let nx = (point.x - center.x) / radius_x;
    let ny = (point.y - center.y) / radius_y;
    nx * nx + ny * ny <= 1.0
}

/// Bounds of `points`, all zero for an empty slice.
pub fn get_bounding_box(points: &[Point2D]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };
    points.iter().skip(1).fold(
        BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        },
        |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        },
    )
}
