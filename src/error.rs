//! Error types for the motion sensor capability

use thiserror::Error;

/// Error type for sensor sample sources
#[derive(Error, Debug)]
pub enum SensorError {
    /// No motion sensor is available on this device
    #[error("Motion sensor unavailable")]
    DeviceUnavailable,

    /// Reading a sample from the device failed
    #[error("Sensor read error: {0}")]
    Read(String),
}

/// Result type for sensor operations
pub type Result<T> = std::result::Result<T, SensorError>;
