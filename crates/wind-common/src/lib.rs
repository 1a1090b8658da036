//! Common types shared across the wind-map services.

pub mod error;
pub mod grid;
pub mod style;

pub use error::{WindError, WindResult};
pub use grid::{GridComponent, GridHeader, WindPayload, PARAMETER_NUMBER_U, PARAMETER_NUMBER_V};
pub use style::VelocityStyle;
