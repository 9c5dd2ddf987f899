// Cyberith Virtualizer driver - Shared Library
// Configuration, device selection and telemetry streaming

pub mod config;
pub mod session;
pub mod stream;

pub use config::{DeviceSelection, DriverConfig, StreamConfig, WalkerConfig};
pub use session::{connect, create_virtualizer, exit_code, load_virt, DeviceOptions};
pub use stream::{hour_timestamp_us, FrameReceiver, FrameSender, StreamError, TelemetryFrame};
