mod controller;
mod events;
mod state;

pub use controller::{FrameContext, ViewportInteractionController};
pub use events::{Key, Modifiers, PointerButton, PointerEvent, Tool, WheelEvent};
pub use state::ViewportState;
