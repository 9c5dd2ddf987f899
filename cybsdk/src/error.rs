//! Virtualizer session error types

use cybsdk_native::DeviceError;
use thiserror::Error;

/// Errors from Virtualizer operations
#[derive(Error, Debug)]
pub enum VirtualizerError {
    /// Native binding error
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Operation needs an open connection
    #[error("Virtualizer connection is not open")]
    NotOpen,

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device not found
    #[error("Device not found: {0}")]
    NotFound(String),
}
