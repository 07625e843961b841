use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::types::{Point2D, WindowLevel};

/// One of the three orthogonal reconstruction planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    Axial,
    Coronal,
    Sagittal,
}

impl Plane {
    pub const ALL: [Self; 3] = [Self::Axial, Self::Coronal, Self::Sagittal];

    /// Volume axis along this plane's normal; the plane's slice index is the
    /// crosshair coordinate on that axis.
    pub fn axis(self) -> Axis {
        match self {
            Self::Axial => Axis::K,
            Self::Coronal => Axis::J,
            Self::Sagittal => Axis::I,
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axial => write!(f, "Axial"),
            Self::Coronal => write!(f, "Coronal"),
            Self::Sagittal => write!(f, "Sagittal"),
        }
    }
}

/// Voxel axis: `I` runs left-right (sagittal slices), `J` front-back
/// (coronal slices), `K` head-foot (axial slices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    I,
    J,
    K,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Self::I => 0,
            Self::J => 1,
            Self::K => 2,
        }
    }
}

/// Voxel coordinates. Signed so that out-of-range requests can be expressed
/// and clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeIndex {
    pub i: i64,
    pub j: i64,
    pub k: i64,
}

impl VolumeIndex {
    pub const fn new(i: i64, j: i64, k: i64) -> Self {
        Self { i, j, k }
    }

    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::I => self.i,
            Axis::J => self.j,
            Axis::K => self.k,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i64) {
        match axis {
            Axis::I => self.i = value,
            Axis::J => self.j = value,
            Axis::K => self.k = value,
        }
    }

    pub fn with(mut self, axis: Axis, value: i64) -> Self {
        self.set(axis, value);
        self
    }
}

impl Add for VolumeIndex {
    type Output = VolumeIndex;

    fn add(self, rhs: VolumeIndex) -> VolumeIndex {
        VolumeIndex::new(
            self.i.saturating_add(rhs.i),
            self.j.saturating_add(rhs.j),
            self.k.saturating_add(rhs.k),
        )
    }
}

impl fmt::Display for VolumeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub min: f64,
    pub max: f64,
}

/// Geometry and provenance of a reconstructed volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Voxel counts along i, j, k.
    pub dimensions: [usize; 3],
    /// Millimetres per voxel along i, j, k.
    pub spacing: [f64; 3],
    /// Patient coordinates of voxel (0, 0, 0).
    #[serde(default)]
    pub origin: [f64; 3],
    /// Row and column direction cosines.
    #[serde(default = "default_orientation")]
    pub orientation: [f64; 6],
    #[serde(default)]
    pub modality: String,
    #[serde(default)]
    pub series_uid: String,
    #[serde(default)]
    pub pixel_range: PixelRange,
}

fn default_orientation() -> [f64; 6] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
}

impl VolumeInfo {
    pub fn new(dimensions: [usize; 3], spacing: [f64; 3]) -> Self {
        Self {
            dimensions,
            spacing,
            origin: [0.0; 3],
            orientation: default_orientation(),
            modality: String::new(),
            series_uid: String::new(),
            pixel_range: PixelRange::default(),
        }
    }

    pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
        self.modality = modality.into();
        self
    }

    pub fn dimension(&self, axis: Axis) -> usize {
        self.dimensions[axis.index()]
    }

    /// Number of slices a plane can show.
    pub fn slice_count(&self, plane: Plane) -> usize {
        self.dimension(plane.axis())
    }

    /// Integer center voxel, `floor(dim / 2)` per axis.
    pub fn center(&self) -> VolumeIndex {
        VolumeIndex::new(
            (self.dimensions[0] / 2) as i64,
            (self.dimensions[1] / 2) as i64,
            (self.dimensions[2] / 2) as i64,
        )
    }
}

/// How a slab thicker than one voxel is collapsed for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Normal,
    Mip,
    MinIp,
    Average,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Mip => write!(f, "MIP"),
            Self::MinIp => write!(f, "MinIP"),
            Self::Average => write!(f, "Average"),
        }
    }
}

/// Display state of one MPR plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MprViewState {
    pub slice_index: usize,
    pub zoom: f64,
    pub pan: Point2D,
    pub window_level: WindowLevel,
    pub show_crosshair: bool,
    /// Slab thickness in mm; 0 shows a single slice.
    pub thickness: f64,
    pub render_mode: RenderMode,
}

impl Default for MprViewState {
    fn default() -> Self {
        Self {
            slice_index: 0,
            zoom: 1.0,
            pan: Point2D::ORIGIN,
            window_level: WindowLevel::default(),
            show_crosshair: true,
            thickness: 0.0,
            render_mode: RenderMode::Normal,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MprViews {
    pub axial: MprViewState,
    pub coronal: MprViewState,
    pub sagittal: MprViewState,
}

impl MprViews {
    pub fn get(&self, plane: Plane) -> &MprViewState {
        match plane {
            Plane::Axial => &self.axial,
            Plane::Coronal => &self.coronal,
            Plane::Sagittal => &self.sagittal,
        }
    }

    pub fn get_mut(&mut self, plane: Plane) -> &mut MprViewState {
        match plane {
            Plane::Axial => &mut self.axial,
            Plane::Coronal => &mut self.coronal,
            Plane::Sagittal => &mut self.sagittal,
        }
    }
}

/// Shared state of the three linked MPR views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MprState {
    pub crosshair: VolumeIndex,
    pub views: MprViews,
    pub volume_info: Option<VolumeInfo>,
    pub active_view: Plane,
    pub linked: bool,
    pub show_crosshairs: bool,
}

impl Default for MprState {
    fn default() -> Self {
        Self {
            crosshair: VolumeIndex::default(),
            views: MprViews::default(),
            volume_info: None,
            active_view: Plane::Axial,
            linked: true,
            show_crosshairs: true,
        }
    }
}

/// What a slice-raster collaborator needs to fetch the image for a plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliceRequest {
    pub plane: Plane,
    pub slice_index: usize,
    pub window_level: WindowLevel,
    pub thickness: f64,
    pub render_mode: RenderMode,
}
