//! Native binding error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the native SDK
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Failed to load native SDK library {}: {source}", path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Native SDK library is missing symbol {name}: {source}")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Unable to connect to Virtualizer")]
    OpenFailed,

    #[error("Unable to close Virtualizer connection")]
    CloseFailed,

    #[error("Native SDK returned no device info")]
    NullDeviceInfo,
}

impl DeviceError {
    /// Whether this error means the native library itself is unusable
    pub fn is_library_error(&self) -> bool {
        matches!(self, Self::LibraryLoad { .. } | Self::MissingSymbol { .. })
    }
}
