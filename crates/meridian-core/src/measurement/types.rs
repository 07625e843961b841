use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{
    calculate_distance_mm, calculate_ellipse_area_mm2, calculate_ellipse_perimeter_mm,
    calculate_perimeter_mm, calculate_polygon_area_mm2, calculate_rectangle_area_mm2,
};
use crate::types::{PixelSpacing, Point2D};

/// Whether a measurement belongs to one frame or to every frame of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementScope {
    #[default]
    Frame,
    /// Shown on every frame (cine).
    Series,
}

impl fmt::Display for MeasurementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame => write!(f, "Frame"),
            Self::Series => write!(f, "Series"),
        }
    }
}

/// Shape discriminant, used to start a drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Line,
    Polygon,
    Ellipse,
    Rectangle,
}

impl MeasurementKind {
    pub const ALL: &[Self] = &[Self::Line, Self::Polygon, Self::Ellipse, Self::Rectangle];
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "Line"),
            Self::Polygon => write!(f, "Polygon"),
            Self::Ellipse => write!(f, "Ellipse"),
            Self::Rectangle => write!(f, "Rectangle"),
        }
    }
}

/// Geometry payload of a measurement, in image pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeasurementGeometry {
    Line { points: [Point2D; 2] },
    /// Always closed.
    Polygon { points: Vec<Point2D> },
    /// Axis-aligned ellipse; radii are the per-axis distances to `corner`.
    Ellipse { center: Point2D, corner: Point2D },
    /// Axis-aligned rectangle spanned by two opposite corners.
    Rectangle { start: Point2D, end: Point2D },
}

impl MeasurementGeometry {
    /// Geometry of a shape whose drawing has just started at `first`.
    pub fn start(kind: MeasurementKind, first: Point2D) -> Self {
        match kind {
            MeasurementKind::Line => Self::Line {
                points: [first, first],
            },
            MeasurementKind::Polygon => Self::Polygon {
                points: vec![first],
            },
            MeasurementKind::Ellipse => Self::Ellipse {
                center: first,
                corner: first,
            },
            MeasurementKind::Rectangle => Self::Rectangle {
                start: first,
                end: first,
            },
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::Line { .. } => MeasurementKind::Line,
            Self::Polygon { .. } => MeasurementKind::Polygon,
            Self::Ellipse { .. } => MeasurementKind::Ellipse,
            Self::Rectangle { .. } => MeasurementKind::Rectangle,
        }
    }

    /// Draggable handles, in index order.
    pub fn control_points(&self) -> Vec<Point2D> {
        match self {
            Self::Line { points } => points.to_vec(),
            Self::Polygon { points } => points.clone(),
            Self::Ellipse { center, corner } => vec![*center, *corner],
            Self::Rectangle { start, end } => vec![*start, *end],
        }
    }

    /// Closed outline used for edge and interior hit-testing. Ellipses have
    /// no polygonal outline and return an empty vector.
    pub fn outline(&self) -> Vec<Point2D> {
        match self {
            Self::Line { points } => points.to_vec(),
            Self::Polygon { points } => points.clone(),
            Self::Ellipse { .. } => Vec::new(),
            Self::Rectangle { start, end } => vec![
                *start,
                Point2D::new(end.x, start.y),
                *end,
                Point2D::new(start.x, end.y),
            ],
        }
    }

    /// Replace one control point. Returns `false` for an out-of-range index.
    pub fn set_control_point(&mut self, index: usize, point: Point2D) -> bool {
        let slot = match self {
            Self::Line { points } => points.get_mut(index),
            Self::Polygon { points } => points.get_mut(index),
            Self::Ellipse { center, corner } => match index {
                0 => Some(center),
                1 => Some(corner),
                _ => None,
            },
            Self::Rectangle { start, end } => match index {
                0 => Some(start),
                1 => Some(end),
                _ => None,
            },
        };
        match slot {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    pub fn translate(&mut self, delta: Point2D) {
        match self {
            Self::Line { points } => points.iter_mut().for_each(|p| *p = *p + delta),
            Self::Polygon { points } => points.iter_mut().for_each(|p| *p = *p + delta),
            Self::Ellipse { center, corner } => {
                *center = *center + delta;
                *corner = *corner + delta;
            }
            Self::Rectangle { start, end } => {
                *start = *start + delta;
                *end = *end + delta;
            }
        }
    }

    /// Whether the shape satisfies its minimum-point invariant and may be
    /// committed.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Polygon { points } => points.len() >= 3,
            Self::Line { .. } | Self::Ellipse { .. } | Self::Rectangle { .. } => true,
        }
    }

    /// Physical metrics of the shape under `spacing`.
    pub fn compute_metrics(&self, spacing: Option<PixelSpacing>) -> MeasurementMetrics {
        match self {
            Self::Line { points } => MeasurementMetrics {
                length_mm: calculate_distance_mm(points[0], points[1], spacing),
                ..Default::default()
            },
            Self::Polygon { points } => MeasurementMetrics {
                area_mm2: calculate_polygon_area_mm2(points, spacing),
                perimeter_mm: calculate_perimeter_mm(points, spacing, true),
                ..Default::default()
            },
            Self::Ellipse { center, corner } => {
                let rx = corner.x - center.x;
                let ry = corner.y - center.y;
                MeasurementMetrics {
                    area_mm2: calculate_ellipse_area_mm2(rx, ry, spacing),
                    perimeter_mm: calculate_ellipse_perimeter_mm(rx, ry, spacing),
                    ..Default::default()
                }
            }
            Self::Rectangle { start, end } => MeasurementMetrics {
                area_mm2: calculate_rectangle_area_mm2(end.x - start.x, end.y - start.y, spacing),
                perimeter_mm: calculate_perimeter_mm(&self.outline(), spacing, true),
                ..Default::default()
            },
        }
    }
}

/// Derived physical metrics; `None` when not applicable or not computable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementMetrics {
    pub length_mm: Option<f64>,
    pub area_mm2: Option<f64>,
    pub perimeter_mm: Option<f64>,
}

/// Volume derived from contours on several slices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeData {
    pub volume_mm3: f64,
    pub slice_count: usize,
    pub slice_thickness_mm: f64,
}

/// Per-frame geometry supplied by an external tracker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingData {
    pub frames: BTreeMap<String, Vec<Point2D>>,
    #[serde(default)]
    pub in_progress: bool,
}

/// A persisted measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: String,
    pub series_uid: String,
    /// `None` means the measurement is not tied to one frame.
    pub frame_key: Option<String>,
    pub scope: MeasurementScope,
    pub geometry: MeasurementGeometry,
    #[serde(default)]
    pub metrics: MeasurementMetrics,
    #[serde(default)]
    pub volume: Option<VolumeData>,
    #[serde(default)]
    pub label: String,
    pub color: String,
    pub visible: bool,
    pub locked: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub modified_at: u64,
    #[serde(default)]
    pub tracking: Option<TrackingData>,
}

impl Measurement {
    pub fn kind(&self) -> MeasurementKind {
        self.geometry.kind()
    }

    /// Whether the measurement shows on `frame_key` of its series.
    pub fn is_shown_on_frame(&self, frame_key: &str) -> bool {
        match (self.scope, self.frame_key.as_deref()) {
            (MeasurementScope::Series, _) | (_, None) => true,
            (MeasurementScope::Frame, Some(key)) => key == frame_key,
        }
    }

    /// Visible and not locked: the only state pointer interaction touches.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn recompute_metrics(&mut self, spacing: Option<PixelSpacing>) {
        self.metrics = self.geometry.compute_metrics(spacing);
    }
}

/// Everything needed to create a measurement programmatically.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementDraft {
    pub series_uid: String,
    pub frame_key: Option<String>,
    pub scope: MeasurementScope,
    pub geometry: MeasurementGeometry,
    pub label: String,
    /// Falls back to the configured default color.
    pub color: Option<String>,
    pub visible: bool,
    pub locked: bool,
}

impl MeasurementDraft {
    pub fn new(series_uid: impl Into<String>, geometry: MeasurementGeometry) -> Self {
        Self {
            series_uid: series_uid.into(),
            frame_key: None,
            scope: MeasurementScope::Series,
            geometry,
            label: String::new(),
            color: None,
            visible: true,
            locked: false,
        }
    }

    pub fn on_frame(mut self, frame_key: impl Into<String>) -> Self {
        self.frame_key = Some(frame_key.into());
        self.scope = MeasurementScope::Frame;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Partial update for [`MeasurementStore::update_measurement`]; `None`
/// fields are left unchanged.
///
/// [`MeasurementStore::update_measurement`]: crate::measurement::MeasurementStore::update_measurement
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementUpdate {
    pub label: Option<String>,
    pub color: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub scope: Option<MeasurementScope>,
    pub frame_key: Option<Option<String>>,
    pub volume: Option<Option<VolumeData>>,
    /// Replaces the shape wholesale. Metrics are recomputed with `spacing`
    /// unless `metrics` is given too.
    pub geometry: Option<MeasurementGeometry>,
    pub metrics: Option<MeasurementMetrics>,
    pub spacing: Option<PixelSpacing>,
}

/// Where a new drawing belongs.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingContext {
    pub series_uid: String,
    pub frame_key: Option<String>,
    pub scope: MeasurementScope,
}

impl DrawingContext {
    pub fn frame(series_uid: impl Into<String>, frame_key: impl Into<String>) -> Self {
        Self {
            series_uid: series_uid.into(),
            frame_key: Some(frame_key.into()),
            scope: MeasurementScope::Frame,
        }
    }

    pub fn series(series_uid: impl Into<String>) -> Self {
        Self {
            series_uid: series_uid.into(),
            frame_key: None,
            scope: MeasurementScope::Series,
        }
    }
}
