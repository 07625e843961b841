/// Smallest zoom factor a 2D viewport accepts.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor a 2D viewport accepts.
pub const DEFAULT_MAX_ZOOM: f64 = 20.0;

/// Multiplicative zoom change per wheel unit: `exp(delta * sensitivity)`.
pub const DEFAULT_WHEEL_ZOOM_SENSITIVITY: f64 = 0.005;

/// Zoom change per screen pixel of vertical drag with the zoom tool.
pub const DEFAULT_DRAG_ZOOM_SENSITIVITY: f64 = 0.01;

/// Hit tolerance in screen pixels for control points and edges.
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 8.0;

/// Maximum number of undo entries kept by the measurement store.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Default stroke color of new measurements.
pub const DEFAULT_MEASUREMENT_COLOR: &str = "#00ff00";

/// CT soft-tissue window: center 40, width 400.
pub const CT_WINDOW_CENTER: f64 = 40.0;
pub const CT_WINDOW_WIDTH: f64 = 400.0;

/// MR window: center 400, width 800.
pub const MR_WINDOW_CENTER: f64 = 400.0;
pub const MR_WINDOW_WIDTH: f64 = 800.0;

/// Fallback window for any other modality (8-bit display range).
pub const OTHER_WINDOW_CENTER: f64 = 128.0;
pub const OTHER_WINDOW_WIDTH: f64 = 256.0;

/// Narrowest window width reachable by window/level dragging.
pub const MIN_WINDOW_WIDTH: f64 = 1.0;
