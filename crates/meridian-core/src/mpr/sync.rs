use tracing::{debug, info};

use super::crosshair::{crosshair_drag_target, get_crosshair_lines_for_view, CrosshairLine};
use super::state::{MprState, MprViewState, Plane, RenderMode, SliceRequest, VolumeIndex, VolumeInfo};
use crate::config::WindowLevelPresets;
use crate::notify::{SubscriptionId, Subscribers};
use crate::numeric::clamp_index;
use crate::types::{Point2D, WindowLevel};

/// Notification sent to subscribers after each MPR state change.
#[derive(Clone, Debug, PartialEq)]
pub enum MprEvent {
    VolumeLoaded,
    VolumeCleared,
    CrosshairMoved(VolumeIndex),
    SliceChanged { plane: Plane, slice_index: usize },
    ViewChanged(Plane),
    ActiveViewChanged(Plane),
    LinkedChanged(bool),
    CrosshairVisibilityChanged,
    WindowLevelChanged,
}

/// Keeps the three MPR planes and the shared crosshair consistent.
///
/// With `linked` set, every slice- or crosshair-changing call leaves each
/// plane's slice index equal to the crosshair coordinate on that plane's
/// axis. Without a volume every mutating call except view toggles is a
/// no-op.
#[derive(Debug, Default)]
pub struct MprSyncEngine {
    state: MprState,
    presets: WindowLevelPresets,
    subscribers: Subscribers<MprEvent>,
}

impl MprSyncEngine {
    pub fn new(presets: WindowLevelPresets) -> Self {
        Self {
            state: MprState::default(),
            presets,
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &MprState {
        &self.state
    }

    pub fn crosshair(&self) -> VolumeIndex {
        self.state.crosshair
    }

    pub fn view(&self, plane: Plane) -> &MprViewState {
        self.state.views.get(plane)
    }

    pub fn volume_info(&self) -> Option<&VolumeInfo> {
        self.state.volume_info.as_ref()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&MprEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn emit(&mut self, event: MprEvent) {
        self.subscribers.notify(&event);
    }

    /// Load a volume: crosshair to the center voxel, every plane on its
    /// center slice with the modality's default window.
    pub fn set_volume_info(&mut self, info: VolumeInfo) {
        let center = info.center();
        let window_level = self.presets.for_modality(&info.modality);
        info!(
            dims = ?info.dimensions,
            modality = %info.modality,
            crosshair = %center,
            "MPR volume loaded"
        );

        for plane in Plane::ALL {
            *self.state.views.get_mut(plane) = MprViewState {
                slice_index: clamp_index(center.get(plane.axis()), info.slice_count(plane)),
                window_level,
                ..MprViewState::default()
            };
        }
        self.state.crosshair = center;
        self.state.volume_info = Some(info);
        self.emit(MprEvent::VolumeLoaded);
    }

    /// Forget the volume and return to defaults.
    pub fn clear_volume(&mut self) {
        self.state = MprState::default();
        debug!("MPR volume cleared");
        self.emit(MprEvent::VolumeCleared);
    }

    fn dimensions(&self) -> Option<[usize; 3]> {
        self.state.volume_info.as_ref().map(|v| v.dimensions)
    }

    /// Move the crosshair, clamping each axis into the volume. When linked,
    /// all three planes follow.
    pub fn set_crosshair_position(&mut self, position: VolumeIndex) {
        let Some(dims) = self.dimensions() else {
            return;
        };
        let clamped = VolumeIndex::new(
            clamp_index(position.i, dims[0]) as i64,
            clamp_index(position.j, dims[1]) as i64,
            clamp_index(position.k, dims[2]) as i64,
        );
        self.state.crosshair = clamped;
        if self.state.linked {
            for plane in Plane::ALL {
                self.state.views.get_mut(plane).slice_index = clamped.get(plane.axis()) as usize;
            }
        }
        debug!(crosshair = %clamped, linked = self.state.linked, "Crosshair moved");
        self.emit(MprEvent::CrosshairMoved(clamped));
    }

    pub fn move_crosshair_by(&mut self, delta: VolumeIndex) {
        self.set_crosshair_position(self.state.crosshair + delta);
    }

    /// Show `index` on `plane`, clamped to the plane's slice range. When
    /// linked, only the crosshair coordinate owned by this plane is updated.
    pub fn set_slice_index(&mut self, plane: Plane, index: i64) {
        let Some(info) = self.state.volume_info.as_ref() else {
            return;
        };
        let clamped = clamp_index(index, info.slice_count(plane));
        self.state.views.get_mut(plane).slice_index = clamped;
        if self.state.linked {
            self.state.crosshair.set(plane.axis(), clamped as i64);
        }
        self.emit(MprEvent::SliceChanged {
            plane,
            slice_index: clamped,
        });
    }

    /// Step `plane` by `delta` slices.
    pub fn scroll_slice(&mut self, plane: Plane, delta: i64) {
        let current = self.state.views.get(plane).slice_index as i64;
        self.set_slice_index(plane, current.saturating_add(delta));
    }

    /// Zoom 1, no pan, slice taken from the crosshair.
    pub fn reset_view(&mut self, plane: Plane) {
        let snapshot = self.state.crosshair;
        self.reset_view_from(plane, snapshot);
        self.emit(MprEvent::ViewChanged(plane));
    }

    /// Reset every plane from a single crosshair snapshot.
    pub fn reset_all_views(&mut self) {
        let snapshot = self.state.crosshair;
        for plane in Plane::ALL {
            self.reset_view_from(plane, snapshot);
        }
        for plane in Plane::ALL {
            self.emit(MprEvent::ViewChanged(plane));
        }
    }

    fn reset_view_from(&mut self, plane: Plane, snapshot: VolumeIndex) {
        let slice_count = self
            .state
            .volume_info
            .as_ref()
            .map_or(0, |info| info.slice_count(plane));
        let view = self.state.views.get_mut(plane);
        view.zoom = 1.0;
        view.pan = Point2D::ORIGIN;
        view.slice_index = clamp_index(snapshot.get(plane.axis()), slice_count);
    }

    /// Toggle linking. Re-linking does not resynchronize the planes; the
    /// next slice or crosshair change does.
    pub fn toggle_linked(&mut self) {
        self.state.linked = !self.state.linked;
        debug!(linked = self.state.linked, "MPR link toggled");
        self.emit(MprEvent::LinkedChanged(self.state.linked));
    }

    pub fn toggle_crosshairs(&mut self) {
        self.state.show_crosshairs = !self.state.show_crosshairs;
        self.emit(MprEvent::CrosshairVisibilityChanged);
    }

    pub fn set_show_crosshair(&mut self, plane: Plane, show: bool) {
        self.state.views.get_mut(plane).show_crosshair = show;
        self.emit(MprEvent::CrosshairVisibilityChanged);
    }

    pub fn sync_window_level_to_all(&mut self, window_level: WindowLevel) {
        for plane in Plane::ALL {
            self.state.views.get_mut(plane).window_level = window_level;
        }
        self.emit(MprEvent::WindowLevelChanged);
    }

    pub fn set_window_level(&mut self, plane: Plane, window_level: WindowLevel) {
        self.state.views.get_mut(plane).window_level = window_level;
        self.emit(MprEvent::WindowLevelChanged);
    }

    pub fn set_active_view(&mut self, plane: Plane) {
        if self.state.active_view != plane {
            self.state.active_view = plane;
            self.emit(MprEvent::ActiveViewChanged(plane));
        }
    }

    /// Zoom is only required to be positive; non-positive values are ignored.
    pub fn set_zoom(&mut self, plane: Plane, zoom: f64) {
        if !(zoom > 0.0 && zoom.is_finite()) {
            return;
        }
        self.state.views.get_mut(plane).zoom = zoom;
        self.emit(MprEvent::ViewChanged(plane));
    }

    pub fn set_pan(&mut self, plane: Plane, pan: Point2D) {
        self.state.views.get_mut(plane).pan = pan;
        self.emit(MprEvent::ViewChanged(plane));
    }

    pub fn set_thickness(&mut self, plane: Plane, thickness_mm: f64) {
        self.state.views.get_mut(plane).thickness = thickness_mm.max(0.0);
        self.emit(MprEvent::ViewChanged(plane));
    }

    pub fn set_render_mode(&mut self, plane: Plane, mode: RenderMode) {
        self.state.views.get_mut(plane).render_mode = mode;
        self.emit(MprEvent::ViewChanged(plane));
    }

    /// Crosshair lines to draw over `plane` for the current state. Empty when
    /// no volume is loaded or crosshairs are hidden.
    pub fn crosshair_lines(&self, plane: Plane) -> Vec<CrosshairLine> {
        match self.dimensions() {
            Some(dims) if self.state.show_crosshairs && self.view(plane).show_crosshair => {
                get_crosshair_lines_for_view(plane, self.state.crosshair, dims).to_vec()
            }
            _ => Vec::new(),
        }
    }

    /// Apply a crosshair line drag: the `source` line over `displayed` was
    /// moved to `fraction` (0..1) along its drag axis.
    pub fn drag_crosshair(&mut self, displayed: Plane, source: Plane, fraction: f64) {
        let Some(dims) = self.dimensions() else {
            return;
        };
        let Some((axis, index)) = crosshair_drag_target(displayed, source, fraction, dims) else {
            debug!(%displayed, %source, "Ignoring drag of a line not drawn on this plane");
            return;
        };
        let target = self.state.crosshair.with(axis, index as i64);
        self.set_crosshair_position(target);
    }

    pub fn slice_request(&self, plane: Plane) -> Option<SliceRequest> {
        self.state.volume_info.as_ref()?;
        let view = self.view(plane);
        Some(SliceRequest {
            plane,
            slice_index: view.slice_index,
            window_level: view.window_level,
            thickness: view.thickness,
            render_mode: view.render_mode,
        })
    }
}
