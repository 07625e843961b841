use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{OTHER_WINDOW_CENTER, OTHER_WINDOW_WIDTH};

/// A point in pixel units. Whether it is a screen or an image point is
/// decided by the caller; the two spaces are never mixed in one value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Physical size of one pixel in millimetres.
///
/// `row_spacing` is the distance between rows (applies to y),
/// `column_spacing` the distance between columns (applies to x).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelSpacing {
    pub row_spacing: f64,
    pub column_spacing: f64,
}

impl PixelSpacing {
    pub const fn new(row_spacing: f64, column_spacing: f64) -> Self {
        Self {
            row_spacing,
            column_spacing,
        }
    }

    pub const fn isotropic(spacing: f64) -> Self {
        Self::new(spacing, spacing)
    }
}

/// Image size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub columns: u32,
    pub rows: u32,
}

impl ImageDimensions {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.columns as f64 / 2.0, self.rows as f64 / 2.0)
    }
}

/// On-screen size of a viewport in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Window center/width pair controlling the display contrast mapping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowLevel {
    pub center: f64,
    pub width: f64,
}

impl WindowLevel {
    pub const fn new(center: f64, width: f64) -> Self {
        Self { center, width }
    }
}

impl Default for WindowLevel {
    fn default() -> Self {
        Self::new(OTHER_WINDOW_CENTER, OTHER_WINDOW_WIDTH)
    }
}

/// Axis-aligned bounds of a point set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
