pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod measurement;
pub mod mpr;
pub mod notify;
pub mod numeric;
pub mod transform;
pub mod types;
pub mod viewport;
