mod history;
mod store;
mod types;

pub use store::{ActiveDrawing, MeasurementStore, StoreEvent};
pub use types::{
    DrawingContext, Measurement, MeasurementDraft, MeasurementGeometry, MeasurementKind,
    MeasurementMetrics, MeasurementScope, MeasurementUpdate, TrackingData, VolumeData,
};
