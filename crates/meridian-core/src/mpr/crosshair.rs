use serde::{Deserialize, Serialize};

use super::state::{Axis, Plane, VolumeIndex};
use crate::numeric::{clamp_index, fraction_to_index, index_to_percent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOrientation {
    Horizontal,
    Vertical,
}

/// A crosshair line drawn over one plane, marking where another plane cuts
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrosshairLine {
    pub source_plane: Plane,
    pub orientation: LineOrientation,
    /// Offset along the perpendicular image axis, 0..=100.
    pub position_percent: f64,
}

/// The two planes shown as lines over `displayed`, with their orientation.
pub fn crosshair_sources(displayed: Plane) -> [(Plane, LineOrientation); 2] {
    match displayed {
        Plane::Axial => [
            (Plane::Sagittal, LineOrientation::Vertical),
            (Plane::Coronal, LineOrientation::Horizontal),
        ],
        Plane::Coronal => [
            (Plane::Sagittal, LineOrientation::Vertical),
            (Plane::Axial, LineOrientation::Horizontal),
        ],
        Plane::Sagittal => [
            (Plane::Coronal, LineOrientation::Vertical),
            (Plane::Axial, LineOrientation::Horizontal),
        ],
    }
}

/// Crosshair lines for `displayed`, positioned from `crosshair` within a
/// volume of `dimensions` voxels.
pub fn get_crosshair_lines_for_view(
    displayed: Plane,
    crosshair: VolumeIndex,
    dimensions: [usize; 3],
) -> [CrosshairLine; 2] {
    crosshair_sources(displayed).map(|(source_plane, orientation)| {
        let axis = source_plane.axis();
        let len = dimensions[axis.index()];
        let coordinate = clamp_index(crosshair.get(axis), len);
        CrosshairLine {
            source_plane,
            orientation,
            position_percent: index_to_percent(coordinate, len),
        }
    })
}

/// Axis and voxel index written when the `source` line is dragged to
/// `fraction` (0..1 along the drag axis) over `displayed`.
///
/// `None` when `source` is not drawn over `displayed`.
pub fn crosshair_drag_target(
    displayed: Plane,
    source: Plane,
    fraction: f64,
    dimensions: [usize; 3],
) -> Option<(Axis, usize)> {
    let drawn = crosshair_sources(displayed)
        .iter()
        .any(|(plane, _)| *plane == source);
    if !drawn {
        return None;
    }
    let axis = source.axis();
    Some((axis, fraction_to_index(fraction, dimensions[axis.index()])))
}
