use tracing::debug;

use super::events::{Key, PointerButton, PointerEvent, Tool, WheelEvent};
use super::state::ViewportState;
use crate::config::ViewerConfig;
use crate::error::{MeridianError, Result};
use crate::geometry::hit_test_measurements;
use crate::measurement::{
    DrawingContext, Measurement, MeasurementKind, MeasurementScope, MeasurementStore,
};
use crate::transform::{
    clamp_point_to_image, is_point_in_image_bounds, screen_distance_to_image, screen_to_image,
    CoordinateTransformContext,
};
use crate::types::{ImageDimensions, PixelSpacing, Point2D, ViewportSize};

/// The frame currently shown in the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameContext {
    pub series_uid: String,
    pub frame_key: String,
    pub spacing: Option<PixelSpacing>,
    pub image_dimensions: ImageDimensions,
    pub slice_count: usize,
    /// Scope given to newly drawn measurements.
    pub scope: MeasurementScope,
}

#[derive(Clone, Debug, PartialEq)]
enum DragKind {
    Pan,
    Zoom,
    WindowLevel,
    Draw,
    MovePoint { id: String, index: usize },
    MoveMeasurement { id: String, last_image: Point2D },
}

/// A drag in progress. Exactly one may exist; every exit path goes through
/// [`ViewportInteractionController::end_drag`].
#[derive(Clone, Debug, PartialEq)]
struct DragSession {
    kind: DragKind,
    last_screen: Point2D,
}

/// Routes pointer, wheel and key input to the viewport state and the
/// measurement store.
#[derive(Debug)]
pub struct ViewportInteractionController {
    viewport: ViewportState,
    store: MeasurementStore,
    config: ViewerConfig,
    viewport_size: ViewportSize,
    frame: Option<FrameContext>,
    tool: Tool,
    drag: Option<DragSession>,
}

impl ViewportInteractionController {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            viewport: ViewportState::new(&config.viewport),
            store: MeasurementStore::new(config.measurement.clone()),
            config,
            viewport_size: ViewportSize::default(),
            frame: None,
            tool: Tool::default(),
            drag: None,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MeasurementStore {
        &mut self.store
    }

    pub fn frame(&self) -> Option<&FrameContext> {
        self.frame.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: ViewportSize) {
        self.viewport_size = size;
    }

    /// Switch tools. Any drag ends and an unfinished drawing is discarded.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.end_drag();
        self.store.cancel_drawing();
        debug!(%tool, "Tool changed");
        self.tool = tool;
    }

    /// Show another frame. An unfinished drawing belongs to the old frame and
    /// is discarded.
    pub fn set_frame(&mut self, frame: FrameContext) {
        self.end_drag();
        self.store.cancel_drawing();
        let slice_count = frame.slice_count;
        self.frame = Some(frame);
        let index = self.viewport.slice_index as i64;
        self.viewport.set_slice_index(index, slice_count);
    }

    /// Clear the frame and return the viewport to defaults.
    pub fn clear_frame(&mut self) {
        self.teardown();
        self.frame = None;
        self.viewport.reset();
    }

    pub fn transform_context(&self) -> Option<CoordinateTransformContext> {
        let frame = self.frame.as_ref()?;
        Some(
            self.viewport
                .transform_context(self.viewport_size, frame.image_dimensions),
        )
    }

    fn to_image(&self, screen: Point2D) -> Option<Point2D> {
        let ctx = self.transform_context()?;
        screen_to_image(screen.x, screen.y, &ctx)
    }

    /// Image point clamped into the image, for drawing and editing.
    fn to_clamped_image(&self, screen: Point2D) -> Option<Point2D> {
        let dims = self.frame.as_ref()?.image_dimensions;
        self.to_image(screen).map(|p| clamp_point_to_image(p, dims))
    }

    fn spacing(&self) -> Option<PixelSpacing> {
        self.frame.as_ref().and_then(|f| f.spacing)
    }

    fn drawing_context(&self) -> Option<DrawingContext> {
        let frame = self.frame.as_ref()?;
        Some(DrawingContext {
            series_uid: frame.series_uid.clone(),
            frame_key: Some(frame.frame_key.clone()),
            scope: frame.scope,
        })
    }

    fn visible_measurements(&self) -> Vec<&Measurement> {
        match self.frame.as_ref() {
            Some(frame) => self
                .store
                .get_visible_measurements(&frame.series_uid, &frame.frame_key, None),
            None => Vec::new(),
        }
    }

    fn hit_test(&self, screen: Point2D) -> Option<crate::geometry::HitResult> {
        let ctx = self.transform_context()?;
        let image = screen_to_image(screen.x, screen.y, &ctx)?;
        let tolerance = screen_distance_to_image(self.config.measurement.hit_tolerance_px, &ctx);
        hit_test_measurements(image, &self.visible_measurements(), tolerance)
    }

    fn begin_drag(&mut self, kind: DragKind, at: Point2D) {
        self.drag = Some(DragSession {
            kind,
            last_screen: at,
        });
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Start an interaction. Fails if a drag is already active.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Result<()> {
        if self.drag.is_some() {
            return Err(MeridianError::DragAlreadyActive);
        }
        let pos = event.position;

        let pan_gesture = event.button == PointerButton::Middle
            || (event.button == PointerButton::Primary && event.modifiers.ctrl);
        if pan_gesture {
            self.begin_drag(DragKind::Pan, pos);
            return Ok(());
        }
        if event.button != PointerButton::Primary {
            return Ok(());
        }

        match self.tool {
            Tool::Pan => self.begin_drag(DragKind::Pan, pos),
            Tool::Zoom => self.begin_drag(DragKind::Zoom, pos),
            Tool::WindowLevel => self.begin_drag(DragKind::WindowLevel, pos),
            Tool::Select => self.select_at(pos),
            Tool::Polygon => self.polygon_click(pos),
            Tool::Line | Tool::Ellipse | Tool::Rectangle => {
                if let Some(kind) = self.tool.measurement_kind() {
                    self.start_shape(kind, pos);
                }
            }
        }
        Ok(())
    }

    fn select_at(&mut self, pos: Point2D) {
        let Some(hit) = self.hit_test(pos) else {
            self.store.select_measurement(None);
            return;
        };
        self.store.select_measurement(Some(hit.measurement_id.as_str()));
        self.store.begin_transaction();
        let kind = match hit.point_index {
            Some(index) => DragKind::MovePoint {
                id: hit.measurement_id,
                index,
            },
            None => match self.to_image(pos) {
                Some(last_image) => DragKind::MoveMeasurement {
                    id: hit.measurement_id,
                    last_image,
                },
                None => {
                    self.store.end_transaction();
                    return;
                }
            },
        };
        self.begin_drag(kind, pos);
    }

    fn image_point_for_new_shape(&self, pos: Point2D) -> Option<Point2D> {
        let dims = self.frame.as_ref()?.image_dimensions;
        self.to_image(pos)
            .filter(|p| is_point_in_image_bounds(*p, dims))
    }

    fn start_shape(&mut self, kind: MeasurementKind, pos: Point2D) {
        let (Some(point), Some(context)) = (self.image_point_for_new_shape(pos), self.drawing_context())
        else {
            return;
        };
        self.store.start_drawing(kind, point, context);
        self.begin_drag(DragKind::Draw, pos);
    }

    fn polygon_click(&mut self, pos: Point2D) {
        let Some(point) = self.image_point_for_new_shape(pos) else {
            return;
        };
        let drawing_polygon = self
            .store
            .active_drawing()
            .is_some_and(|a| a.measurement.kind() == MeasurementKind::Polygon);
        if drawing_polygon {
            let spacing = self.spacing();
            self.store.add_polygon_point(point, spacing);
        } else if let Some(context) = self.drawing_context() {
            self.store
                .start_drawing(MeasurementKind::Polygon, point, context);
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        let pos = event.position;
        let Some(session) = self.drag.clone() else {
            self.hover(pos);
            return;
        };
        let delta = pos - session.last_screen;
        let spacing = self.spacing();

        match session.kind {
            DragKind::Pan => self.viewport.pan_by(delta),
            DragKind::Zoom => {
                let factor = (-delta.y * self.config.viewport.drag_zoom_sensitivity).exp();
                self.viewport.zoom_by(factor);
            }
            DragKind::WindowLevel => self.viewport.adjust_window_level(delta.x, delta.y),
            DragKind::Draw => {
                if let Some(point) = self.to_clamped_image(pos) {
                    self.store.continue_drawing(point, spacing);
                }
            }
            DragKind::MovePoint { ref id, index } => {
                if let Some(point) = self.to_clamped_image(pos) {
                    self.store.move_point(id, index, point, spacing);
                }
            }
            DragKind::MoveMeasurement { ref id, last_image } => {
                if let Some(point) = self.to_image(pos) {
                    self.store.move_measurement(id, point - last_image, spacing);
                    if let Some(DragSession {
                        kind: DragKind::MoveMeasurement { last_image, .. },
                        ..
                    }) = self.drag.as_mut()
                    {
                        *last_image = point;
                    }
                }
            }
        }
        if let Some(session) = self.drag.as_mut() {
            session.last_screen = pos;
        }
    }

    fn hover(&mut self, pos: Point2D) {
        let drawing_polygon = self
            .store
            .active_drawing()
            .is_some_and(|a| a.measurement.kind() == MeasurementKind::Polygon);
        if drawing_polygon {
            if let Some(point) = self.to_clamped_image(pos) {
                let spacing = self.spacing();
                self.store.continue_drawing(point, spacing);
            }
            return;
        }
        if self.tool == Tool::Select {
            let hovered = self.hit_test(pos).map(|h| h.measurement_id);
            self.store.set_hovered_measurement(hovered.as_deref());
        }
    }

    pub fn pointer_up(&mut self, _event: PointerEvent) {
        self.end_drag();
    }

    /// The pointer left the viewport: ends the drag exactly like a release.
    pub fn pointer_leave(&mut self) {
        self.end_drag();
        self.store.set_hovered_measurement(None);
    }

    /// Finishes a polygon in progress.
    pub fn double_click(&mut self, _event: PointerEvent) {
        if self.tool == Tool::Polygon {
            let spacing = self.spacing();
            self.store.finish_drawing(spacing);
        }
    }

    /// End the active drag, committing a drawn shape and closing the edit
    /// transaction. Safe to call when no drag is active.
    pub fn end_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        match session.kind {
            DragKind::Draw => {
                let spacing = self.spacing();
                self.store.finish_drawing(spacing);
            }
            DragKind::MovePoint { .. } | DragKind::MoveMeasurement { .. } => {
                self.store.end_transaction();
            }
            DragKind::Pan | DragKind::Zoom | DragKind::WindowLevel => {}
        }
    }

    /// Abandon the active drag: a drawn shape is discarded and an edit is
    /// rolled back.
    pub fn cancel_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        match session.kind {
            DragKind::Draw => self.store.cancel_drawing(),
            DragKind::MovePoint { .. } | DragKind::MoveMeasurement { .. } => {
                self.store.abort_transaction();
            }
            DragKind::Pan | DragKind::Zoom | DragKind::WindowLevel => {}
        }
    }

    /// Release everything held by the viewport before it goes away. A drag
    /// in progress ends as if the pointer were released; a polygon still
    /// collecting clicks is discarded.
    pub fn teardown(&mut self) {
        self.end_drag();
        self.store.cancel_drawing();
    }

    // ------------------------------------------------------------------
    // Wheel and keys
    // ------------------------------------------------------------------

    /// Plain wheel zooms about the cursor, shift+wheel steps slices.
    pub fn wheel(&mut self, event: WheelEvent) {
        if event.delta_y == 0.0 || !event.delta_y.is_finite() {
            return;
        }
        if event.modifiers.shift {
            let slice_count = self.frame.as_ref().map_or(0, |f| f.slice_count);
            let step = if event.delta_y > 0.0 { 1 } else { -1 };
            self.viewport.scroll_slices(step, slice_count);
            return;
        }
        let Some(dims) = self.frame.as_ref().map(|f| f.image_dimensions) else {
            return;
        };
        let factor = (-event.delta_y * self.config.viewport.wheel_zoom_sensitivity).exp();
        let new_zoom = self.viewport.zoom * factor;
        self.viewport
            .zoom_at(event.position, new_zoom, self.viewport_size, dims);
    }

    pub fn key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.cancel_drag();
                self.store.cancel_drawing();
            }
            Key::Enter => {
                if self.drag.is_none() {
                    let spacing = self.spacing();
                    self.store.finish_drawing(spacing);
                }
            }
            Key::Delete => {
                if let Some(id) = self.store.selected_id().map(str::to_string) {
                    let deletable = self.store.get(&id).is_some_and(Measurement::is_interactive);
                    if deletable {
                        self.store.delete_measurement(&id);
                    }
                }
            }
            Key::Undo => {
                if self.drag.is_none() {
                    self.store.undo();
                }
            }
            Key::Redo => {
                if self.drag.is_none() {
                    self.store.redo();
                }
            }
        }
    }
}
