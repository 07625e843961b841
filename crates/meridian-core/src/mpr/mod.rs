//! Multi-planar reconstruction: three orthogonal views around one shared
//! crosshair.
//!
//! Axis convention: the axial plane's slice index is the crosshair `k`, the
//! coronal one `j`, the sagittal one `i`.

mod crosshair;
mod state;
mod sync;

pub use crosshair::{
    crosshair_drag_target, crosshair_sources, get_crosshair_lines_for_view, CrosshairLine,
    LineOrientation,
};
pub use state::{
    Axis, MprState, MprViewState, MprViews, PixelRange, Plane, RenderMode, SliceRequest,
    VolumeIndex, VolumeInfo,
};
pub use sync::{MprEvent, MprSyncEngine};
