use crate::config::ViewportConfig;
use crate::consts::MIN_WINDOW_WIDTH;
use crate::numeric::{clamp, clamp_index, normalize_degrees};
use crate::transform::{calculate_zoom_at_point, CoordinateTransformContext};
use crate::types::{ImageDimensions, Point2D, ViewportSize, WindowLevel};

/// Pan/zoom/rotation/contrast state of a 2D viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan: Point2D,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    pub window_level: WindowLevel,
    pub slice_index: usize,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

impl ViewportState {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Point2D::ORIGIN,
            rotation: 0.0,
            window_level: WindowLevel::default(),
            slice_index: 0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = clamp(zoom, self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Change zoom while keeping the image point under `cursor` in place.
    pub fn zoom_at(
        &mut self,
        cursor: Point2D,
        new_zoom: f64,
        viewport_size: ViewportSize,
        image_dimensions: ImageDimensions,
    ) {
        let old_zoom = self.zoom;
        self.set_zoom(new_zoom);
        if self.zoom == old_zoom {
            return;
        }
        let ctx = self.transform_context(viewport_size, image_dimensions);
        self.pan = calculate_zoom_at_point(
            cursor.x,
            cursor.y,
            old_zoom,
            self.zoom,
            self.pan,
            viewport_size,
            image_dimensions,
            ctx.base_scale,
            self.rotation,
        );
    }

    pub fn set_pan(&mut self, pan: Point2D) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    pub fn pan_by(&mut self, delta: Point2D) {
        self.set_pan(self.pan + delta);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.rotation = normalize_degrees(degrees);
        }
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.set_rotation(self.rotation + degrees);
    }

    pub fn set_window_level(&mut self, window_level: WindowLevel) {
        self.window_level = WindowLevel::new(
            window_level.center,
            window_level.width.max(MIN_WINDOW_WIDTH),
        );
    }

    /// Window/level drag: horizontal motion changes the width, vertical
    /// motion the center.
    pub fn adjust_window_level(&mut self, dx: f64, dy: f64) {
        let wl = self.window_level;
        self.set_window_level(WindowLevel::new(wl.center + dy, wl.width + dx));
    }

    pub fn set_slice_index(&mut self, index: i64, slice_count: usize) {
        self.slice_index = clamp_index(index, slice_count);
    }

    pub fn scroll_slices(&mut self, delta: i64, slice_count: usize) {
        self.set_slice_index((self.slice_index as i64).saturating_add(delta), slice_count);
    }

    /// Zoom 1 already fits the image, so fitting only clears zoom and pan.
    pub fn fit_to_viewport(&mut self) {
        self.zoom = clamp(1.0, self.min_zoom, self.max_zoom);
        self.pan = Point2D::ORIGIN;
    }

    /// Back to defaults, keeping the configured zoom limits.
    pub fn reset(&mut self) {
        *self = Self {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            ..Self::new(&ViewportConfig::default())
        };
        self.fit_to_viewport();
    }

    pub fn transform_context(
        &self,
        viewport_size: ViewportSize,
        image_dimensions: ImageDimensions,
    ) -> CoordinateTransformContext {
        CoordinateTransformContext::new(
            viewport_size,
            image_dimensions,
            self.zoom,
            self.pan,
            self.rotation,
        )
    }
}
