use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::history::{apply_snapshot, Change, History};
use super::types::{
    DrawingContext, Measurement, MeasurementDraft, MeasurementGeometry, MeasurementKind,
    MeasurementScope, MeasurementUpdate, TrackingData,
};
use crate::config::MeasurementConfig;
use crate::error::{MeridianError, Result};
use crate::notify::{SubscriptionId, Subscribers};
use crate::types::{PixelSpacing, Point2D};

/// Notification sent to subscribers after each store mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    Added(String),
    Updated(String),
    Removed(String),
    Cleared { series_uid: String, count: usize },
    Imported { count: usize },
    SelectionChanged(Option<String>),
    HoverChanged(Option<String>),
    /// The uncommitted drawing started, changed, or was discarded.
    DrawingChanged,
    /// An undo or redo was applied.
    HistoryApplied,
    TrackingChanged(String),
    Reset,
}

/// A shape being drawn that has not been committed yet. It may violate the
/// minimum-point invariant of its kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDrawing {
    pub measurement: Measurement,
    /// Rubber-band position of the next polygon vertex.
    pub preview: Option<Point2D>,
}

/// Owns every measurement of the session, the in-progress drawing and the
/// undo/redo history.
#[derive(Debug)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
    selected: Option<String>,
    hovered: Option<String>,
    active: Option<ActiveDrawing>,
    history: History,
    subscribers: Subscribers<StoreEvent>,
    config: MeasurementConfig,
    next_id: u64,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new(MeasurementConfig::default())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl MeasurementStore {
    pub fn new(config: MeasurementConfig) -> Self {
        Self {
            measurements: Vec::new(),
            selected: None,
            hovered: None,
            active: None,
            history: History::new(config.max_history),
            subscribers: Subscribers::default(),
            config,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.notify(&event);
    }

    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("msr-{}", self.next_id);
            self.next_id += 1;
            if !self.measurements.iter().any(|m| m.id == id) {
                return id;
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.measurements.iter().position(|m| m.id == id)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == id)
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn active_drawing(&self) -> Option<&ActiveDrawing> {
        self.active.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Insert a complete measurement, compute its metrics, and select it.
    pub fn create_measurement(
        &mut self,
        draft: MeasurementDraft,
        spacing: Option<PixelSpacing>,
    ) -> Result<String> {
        check_geometry("draft", &draft.geometry)?;
        let id = self.generate_id();
        let now = now_millis();
        let mut measurement = Measurement {
            id: id.clone(),
            series_uid: draft.series_uid,
            frame_key: draft.frame_key,
            scope: draft.scope,
            geometry: draft.geometry,
            metrics: Default::default(),
            volume: None,
            label: draft.label,
            color: draft
                .color
                .unwrap_or_else(|| self.config.default_color.clone()),
            visible: draft.visible,
            locked: draft.locked,
            created_at: now,
            modified_at: now,
            tracking: None,
        };
        measurement.recompute_metrics(spacing);
        self.insert_committed(measurement);
        Ok(id)
    }

    fn insert_committed(&mut self, measurement: Measurement) {
        let id = measurement.id.clone();
        debug!(id = %id, kind = %measurement.kind(), "Measurement added");
        self.history.record(Change {
            id: id.clone(),
            index: self.measurements.len(),
            before: None,
            after: Some(measurement.clone()),
        });
        self.measurements.push(measurement);
        self.emit(StoreEvent::Added(id.clone()));
        self.select_measurement(Some(id.as_str()));
    }

    /// Apply a partial update. Unknown ids are ignored; an incomplete
    /// replacement geometry is rejected and nothing changes.
    pub fn update_measurement(&mut self, id: &str, update: MeasurementUpdate) -> Result<()> {
        if let Some(geometry) = &update.geometry {
            check_geometry(id, geometry)?;
        }
        self.mutate(id, false, |m| {
            if let Some(label) = update.label {
                m.label = label;
            }
            if let Some(color) = update.color {
                m.color = color;
            }
            if let Some(visible) = update.visible {
                m.visible = visible;
            }
            if let Some(locked) = update.locked {
                m.locked = locked;
            }
            if let Some(scope) = update.scope {
                m.scope = scope;
            }
            if let Some(frame_key) = update.frame_key {
                m.frame_key = frame_key;
            }
            if let Some(volume) = update.volume {
                m.volume = volume;
            }
            if let Some(geometry) = update.geometry {
                m.geometry = geometry;
                m.recompute_metrics(update.spacing);
            }
            if let Some(metrics) = update.metrics {
                m.metrics = metrics;
            }
        });
        Ok(())
    }

    /// Run `f` on measurement `id` and record the change. When
    /// `interactive_only` is set, hidden or locked measurements are skipped.
    fn mutate(&mut self, id: &str, interactive_only: bool, f: impl FnOnce(&mut Measurement)) {
        let Some(index) = self.position(id) else {
            return;
        };
        if interactive_only && !self.measurements[index].is_interactive() {
            debug!(id, "Ignoring edit of hidden or locked measurement");
            return;
        }
        let before = self.measurements[index].clone();
        let measurement = &mut self.measurements[index];
        f(measurement);
        if *measurement == before {
            return;
        }
        measurement.modified_at = now_millis().max(before.modified_at);
        let after = measurement.clone();
        self.history.record(Change {
            id: id.to_string(),
            index,
            before: Some(before),
            after: Some(after),
        });
        self.emit(StoreEvent::Updated(id.to_string()));
    }

    pub fn delete_measurement(&mut self, id: &str) {
        let Some(index) = self.position(id) else {
            return;
        };
        let removed = self.measurements.remove(index);
        self.history.record(Change {
            id: id.to_string(),
            index,
            before: Some(removed),
            after: None,
        });
        debug!(id, "Measurement deleted");
        self.forget_references(id);
        self.emit(StoreEvent::Removed(id.to_string()));
    }

    /// Remove every measurement of a series as one undoable action.
    pub fn clear_measurements(&mut self, series_uid: &str) {
        let mut changes = Vec::new();
        let mut index = 0;
        while index < self.measurements.len() {
            if self.measurements[index].series_uid == series_uid {
                let removed = self.measurements.remove(index);
                changes.push(Change {
                    id: removed.id.clone(),
                    index,
                    before: Some(removed),
                    after: None,
                });
            } else {
                index += 1;
            }
        }
        if changes.is_empty() {
            return;
        }
        let count = changes.len();
        for change in &changes {
            self.forget_references(&change.id);
        }
        self.history.record_all(changes);
        debug!(series_uid, count, "Measurements cleared");
        self.emit(StoreEvent::Cleared {
            series_uid: series_uid.to_string(),
            count,
        });
    }

    /// Drop selection and hover pointing at a measurement that no longer exists.
    fn forget_references(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.emit(StoreEvent::SelectionChanged(None));
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
            self.emit(StoreEvent::HoverChanged(None));
        }
    }

    /// Select a measurement, or clear the selection with `None`. Unknown ids
    /// clear the selection.
    pub fn select_measurement(&mut self, id: Option<&str>) {
        let next = id.filter(|id| self.get(id).is_some()).map(str::to_string);
        if next != self.selected {
            self.selected = next.clone();
            self.emit(StoreEvent::SelectionChanged(next));
        }
    }

    pub fn set_hovered_measurement(&mut self, id: Option<&str>) {
        let next = id.filter(|id| self.get(id).is_some()).map(str::to_string);
        if next != self.hovered {
            self.hovered = next.clone();
            self.emit(StoreEvent::HoverChanged(next));
        }
    }

    // ------------------------------------------------------------------
    // Drawing state machine
    // ------------------------------------------------------------------

    /// Begin an uncommitted shape at `first_point`. An unfinished drawing is
    /// discarded.
    pub fn start_drawing(
        &mut self,
        kind: MeasurementKind,
        first_point: Point2D,
        context: DrawingContext,
    ) {
        if self.active.is_some() {
            debug!("Discarding unfinished drawing");
        }
        let frame_key = match context.scope {
            MeasurementScope::Series => None,
            MeasurementScope::Frame => context.frame_key,
        };
        let now = now_millis();
        let measurement = Measurement {
            id: self.generate_id(),
            series_uid: context.series_uid,
            frame_key,
            scope: context.scope,
            geometry: MeasurementGeometry::start(kind, first_point),
            metrics: Default::default(),
            volume: None,
            label: String::new(),
            color: self.config.default_color.clone(),
            visible: true,
            locked: false,
            created_at: now,
            modified_at: now,
            tracking: None,
        };
        debug!(id = %measurement.id, %kind, "Drawing started");
        self.active = Some(ActiveDrawing {
            measurement,
            preview: None,
        });
        self.emit(StoreEvent::DrawingChanged);
    }

    /// Move the free end of the shape being drawn (line end, ellipse corner,
    /// rectangle corner) or the rubber-band vertex of a polygon.
    pub fn continue_drawing(&mut self, point: Point2D, spacing: Option<PixelSpacing>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        match &mut active.measurement.geometry {
            MeasurementGeometry::Line { points } => points[1] = point,
            MeasurementGeometry::Ellipse { corner, .. } => *corner = point,
            MeasurementGeometry::Rectangle { end, .. } => *end = point,
            MeasurementGeometry::Polygon { .. } => active.preview = Some(point),
        }
        active.measurement.recompute_metrics(spacing);
        self.emit(StoreEvent::DrawingChanged);
    }

    /// Append a vertex to the polygon being drawn. Ignored for other kinds.
    pub fn add_polygon_point(&mut self, point: Point2D, spacing: Option<PixelSpacing>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let MeasurementGeometry::Polygon { points } = &mut active.measurement.geometry else {
            return;
        };
        points.push(point);
        active.preview = None;
        active.measurement.recompute_metrics(spacing);
        self.emit(StoreEvent::DrawingChanged);
    }

    /// Commit the drawing if it satisfies its minimum-point invariant.
    ///
    /// An under-sized polygon is discarded and `None` is returned; this is
    /// not an error.
    pub fn finish_drawing(&mut self, spacing: Option<PixelSpacing>) -> Option<String> {
        let active = self.active.take()?;
        let mut measurement = active.measurement;
        if !measurement.geometry.is_complete() {
            debug!(id = %measurement.id, "Discarding incomplete drawing");
            self.emit(StoreEvent::DrawingChanged);
            return None;
        }
        measurement.recompute_metrics(spacing);
        measurement.modified_at = now_millis().max(measurement.created_at);
        let id = measurement.id.clone();
        self.emit(StoreEvent::DrawingChanged);
        self.insert_committed(measurement);
        Some(id)
    }

    pub fn cancel_drawing(&mut self) {
        if self.active.take().is_some() {
            debug!("Drawing cancelled");
            self.emit(StoreEvent::DrawingChanged);
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Move one control point. Hidden, locked and unknown measurements and
    /// out-of-range indices are ignored.
    pub fn move_point(
        &mut self,
        id: &str,
        point_index: usize,
        new_point: Point2D,
        spacing: Option<PixelSpacing>,
    ) {
        self.mutate(id, true, |m| {
            if m.geometry.set_control_point(point_index, new_point) {
                m.recompute_metrics(spacing);
            }
        });
    }

    /// Translate the whole measurement by `delta`.
    pub fn move_measurement(&mut self, id: &str, delta: Point2D, spacing: Option<PixelSpacing>) {
        self.mutate(id, true, |m| {
            m.geometry.translate(delta);
            m.recompute_metrics(spacing);
        });
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Group every change until [`end_transaction`](Self::end_transaction)
    /// into one undo step. Returns `false` if a transaction is already open.
    pub fn begin_transaction(&mut self) -> bool {
        self.history.begin()
    }

    pub fn end_transaction(&mut self) -> bool {
        self.history.end()
    }

    /// Roll back every change since [`begin_transaction`](Self::begin_transaction)
    /// and close it. Nothing lands on the undo or redo stack. Returns `true`
    /// if anything was reverted.
    pub fn abort_transaction(&mut self) -> bool {
        let Some(entry) = self.history.abort() else {
            return false;
        };
        if entry.changes.is_empty() {
            return false;
        }
        for change in entry.changes.iter().rev() {
            apply_snapshot(
                &mut self.measurements,
                &change.id,
                change.index,
                change.before.as_ref(),
            );
        }
        self.prune_references();
        debug!(changes = entry.changes.len(), "Transaction rolled back");
        for change in &entry.changes {
            self.emit(StoreEvent::Updated(change.id.clone()));
        }
        true
    }

    pub fn in_transaction(&self) -> bool {
        self.history.in_transaction()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recent action. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        self.history.end();
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        for change in entry.changes.iter().rev() {
            apply_snapshot(
                &mut self.measurements,
                &change.id,
                change.index,
                change.before.as_ref(),
            );
        }
        self.prune_references();
        self.history.push_redo(entry);
        debug!("Undo applied");
        self.emit(StoreEvent::HistoryApplied);
        true
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        for change in &entry.changes {
            apply_snapshot(
                &mut self.measurements,
                &change.id,
                change.index,
                change.after.as_ref(),
            );
        }
        self.prune_references();
        self.history.push_undo(entry);
        debug!("Redo applied");
        self.emit(StoreEvent::HistoryApplied);
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn prune_references(&mut self) {
        for id in [self.selected.clone(), self.hovered.clone()]
            .into_iter()
            .flatten()
        {
            if self.get(&id).is_none() {
                self.forget_references(&id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_measurements_for_series(&self, series_uid: &str) -> Vec<&Measurement> {
        self.measurements
            .iter()
            .filter(|m| m.series_uid == series_uid)
            .collect()
    }

    /// Measurements pinned to exactly this frame.
    pub fn get_measurements_for_frame(&self, series_uid: &str, frame_key: &str) -> Vec<&Measurement> {
        self.measurements
            .iter()
            .filter(|m| m.series_uid == series_uid && m.frame_key.as_deref() == Some(frame_key))
            .collect()
    }

    /// Visible measurements to draw on `frame_key`: frame-scoped ones of
    /// that frame plus every series-scoped one. `scope` narrows the result to
    /// one scope.
    pub fn get_visible_measurements(
        &self,
        series_uid: &str,
        frame_key: &str,
        scope: Option<MeasurementScope>,
    ) -> Vec<&Measurement> {
        self.measurements
            .iter()
            .filter(|m| m.visible && m.series_uid == series_uid)
            .filter(|m| scope.map_or(true, |s| m.scope == s))
            .filter(|m| m.is_shown_on_frame(frame_key))
            .collect()
    }

    // ------------------------------------------------------------------
    // Tracking data
    // ------------------------------------------------------------------

    /// Attach externally computed per-frame geometry. Not recorded in the
    /// undo history.
    pub fn set_tracking_data(&mut self, id: &str, data: TrackingData) {
        if let Some(index) = self.position(id) {
            self.measurements[index].tracking = Some(data);
            self.emit(StoreEvent::TrackingChanged(id.to_string()));
        }
    }

    pub fn set_tracking_in_progress(&mut self, id: &str, in_progress: bool) {
        if let Some(index) = self.position(id) {
            self.measurements[index]
                .tracking
                .get_or_insert_with(TrackingData::default)
                .in_progress = in_progress;
            self.emit(StoreEvent::TrackingChanged(id.to_string()));
        }
    }

    pub fn clear_tracking_data(&mut self, id: &str) {
        if let Some(index) = self.position(id) {
            if self.measurements[index].tracking.take().is_some() {
                self.emit(StoreEvent::TrackingChanged(id.to_string()));
            }
        }
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Clone measurements out of the store, optionally for one series.
    pub fn export_measurements(&self, series_uid: Option<&str>) -> Vec<Measurement> {
        self.measurements
            .iter()
            .filter(|m| series_uid.map_or(true, |uid| m.series_uid == uid))
            .cloned()
            .collect()
    }

    /// Insert measurements, replacing any with the same id. The whole list
    /// is validated first and imported as one undoable action.
    pub fn import_measurements(&mut self, list: Vec<Measurement>) -> Result<usize> {
        for m in &list {
            validate(m)?;
        }
        let mut changes = Vec::with_capacity(list.len());
        for m in list {
            let after = Some(m.clone());
            match self.position(&m.id) {
                Some(index) => {
                    let before = std::mem::replace(&mut self.measurements[index], m);
                    changes.push(Change {
                        id: before.id.clone(),
                        index,
                        before: Some(before),
                        after,
                    });
                }
                None => {
                    changes.push(Change {
                        id: m.id.clone(),
                        index: self.measurements.len(),
                        before: None,
                        after,
                    });
                    self.measurements.push(m);
                }
            }
        }
        let count = changes.len();
        self.history.record_all(changes);
        debug!(count, "Measurements imported");
        self.emit(StoreEvent::Imported { count });
        Ok(count)
    }

    pub fn export_json(&self, series_uid: Option<&str>) -> Result<String> {
        Ok(serde_json::to_string_pretty(
            &self.export_measurements(series_uid),
        )?)
    }

    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let list: Vec<Measurement> = serde_json::from_str(json)?;
        self.import_measurements(list)
    }

    /// Drop all measurements, the drawing in progress and the history.
    pub fn reset(&mut self) {
        self.measurements.clear();
        self.selected = None;
        self.hovered = None;
        self.active = None;
        self.history.clear();
        self.emit(StoreEvent::Reset);
    }
}

fn validate(m: &Measurement) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        warn!(id = %m.id, reason, "Rejecting measurement");
        Err(MeridianError::InvalidMeasurement {
            id: m.id.clone(),
            reason: reason.to_string(),
        })
    };
    if m.id.is_empty() {
        return invalid("empty id");
    }
    check_geometry(&m.id, &m.geometry)
}

fn check_geometry(id: &str, geometry: &MeasurementGeometry) -> Result<()> {
    let reason = if !geometry.is_complete() {
        "polygon needs at least 3 points"
    } else if geometry.control_points().iter().any(|p| !p.is_finite()) {
        "non-finite coordinate"
    } else {
        return Ok(());
    };
    warn!(id, reason, "Rejecting measurement");
    Err(MeridianError::InvalidMeasurement {
        id: id.to_string(),
        reason: reason.to_string(),
    })
}
