use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeridianError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid measurement {id}: {reason}")]
    InvalidMeasurement { id: String, reason: String },

    #[error("A drag is already active on this viewport")]
    DragAlreadyActive,
}

pub type Result<T> = std::result::Result<T, MeridianError>;
