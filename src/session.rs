//! Device selection and connection
//!
//! Turns a [`DeviceSelection`] into a [`Virtualizer`] session, optionally
//! wrapped with call monitoring, and maps connection failures to the
//! process exit codes the CLI reports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cybsdk::{MockupKind, SharedDevice, Virt, Virtualizer, VirtualizerError};
use cybsdk_native::{DeviceError, MonitorConfig, MonitorDevice, SimulatedDevice};
use tracing::{debug, info};

use crate::config::DeviceSelection;

/// Exit code: native library could not be loaded
pub const EXIT_LIBRARY: u8 = 1;
/// Exit code: no Virtualizer found
pub const EXIT_NO_DEVICE: u8 = 2;
/// Exit code: device found but could not be opened
pub const EXIT_CONNECT: u8 = 3;

/// How to obtain a device
#[derive(Debug, Clone, Default)]
pub struct DeviceOptions {
    pub selection: DeviceSelection,
    /// Explicit native library path; default search otherwise
    pub library_path: Option<PathBuf>,
    /// Wrap the device with call tracing
    pub monitor: Option<MonitorConfig>,
}

/// Load the native library from `path` or the default locations
pub fn load_virt(path: Option<&Path>) -> Result<Virt, DeviceError> {
    let virt = match path {
        Some(path) => Virt::load(path)?,
        None => Virt::load_default()?,
    };
    info!("Loaded native SDK from {}", virt.library().path().display());
    Ok(virt)
}

/// Create a session for the selected device without opening it
pub fn create_virtualizer(options: &DeviceOptions) -> Result<Virtualizer, VirtualizerError> {
    let session = if options.selection.needs_library() {
        let virt = load_virt(options.library_path.as_deref())?;
        match options.selection {
            DeviceSelection::Xinput => Virtualizer::mockup(&virt, MockupKind::XInput)?,
            DeviceSelection::Keyboard => Virtualizer::mockup(&virt, MockupKind::Keyboard)?,
            _ => Virtualizer::find(&virt)?,
        }
    } else {
        debug!("Using simulated device");
        Virtualizer::new(Arc::new(SimulatedDevice::new()))
    };

    Ok(match &options.monitor {
        Some(config) => Virtualizer::new(monitored(session.device().clone(), config.clone())),
        None => session,
    })
}

fn monitored(device: SharedDevice, config: MonitorConfig) -> SharedDevice {
    MonitorDevice::wrap(device, config)
}

/// Create and open a session for the selected device
pub fn connect(options: &DeviceOptions) -> Result<Virtualizer, VirtualizerError> {
    let session = create_virtualizer(options)?;
    session.open()?;
    Ok(session)
}

/// Process exit code for a failed command
///
/// Connection failures get dedicated codes; everything else exits with 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<VirtualizerError>() {
            return match e {
                VirtualizerError::NotFound(_) => EXIT_NO_DEVICE,
                VirtualizerError::Device(d) => device_exit_code(d),
                _ => 1,
            };
        }
        if let Some(d) = cause.downcast_ref::<DeviceError>() {
            return device_exit_code(d);
        }
    }
    1
}

fn device_exit_code(err: &DeviceError) -> u8 {
    match err {
        e if e.is_library_error() => EXIT_LIBRARY,
        DeviceError::DeviceNotFound(_) => EXIT_NO_DEVICE,
        DeviceError::OpenFailed => EXIT_CONNECT,
        _ => 1,
    }
}
