use std::fmt;

use serde::{Deserialize, Serialize};

use crate::measurement::MeasurementKind;
use crate::types::Point2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Pointer event in screen pixels, relative to the viewport's top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point2D,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Wheel event; positive `delta_y` scrolls down (away from the user).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub position: Point2D,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Undo,
    Redo,
}

/// Active interaction tool of a 2D viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Zoom,
    WindowLevel,
    Line,
    Polygon,
    Ellipse,
    Rectangle,
}

impl Tool {
    pub const ALL: &[Self] = &[
        Self::Select,
        Self::Pan,
        Self::Zoom,
        Self::WindowLevel,
        Self::Line,
        Self::Polygon,
        Self::Ellipse,
        Self::Rectangle,
    ];

    /// Shape drawn by this tool, if it is a drawing tool.
    pub fn measurement_kind(self) -> Option<MeasurementKind> {
        match self {
            Self::Line => Some(MeasurementKind::Line),
            Self::Polygon => Some(MeasurementKind::Polygon),
            Self::Ellipse => Some(MeasurementKind::Ellipse),
            Self::Rectangle => Some(MeasurementKind::Rectangle),
            Self::Select | Self::Pan | Self::Zoom | Self::WindowLevel => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "Select"),
            Self::Pan => write!(f, "Pan"),
            Self::Zoom => write!(f, "Zoom"),
            Self::WindowLevel => write!(f, "Window/Level"),
            Self::Line => write!(f, "Line"),
            Self::Polygon => write!(f, "Polygon"),
            Self::Ellipse => write!(f, "Ellipse"),
            Self::Rectangle => write!(f, "Rectangle"),
        }
    }
}
