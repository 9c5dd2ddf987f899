//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `query`: Read-only commands (version, list, info, check)
//! - `live`: Polling commands (data, posture, walker) and reset
//! - `haptic`: Haptic unit commands and the interactive menu
//! - `stream`: UDP telemetry streaming (stream, listen)
//! - `utility`: Config file commands

pub mod haptic;
pub mod live;
pub mod query;
pub mod stream;
pub mod utility;

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{cursor, terminal, ExecutableCommand};
use cybsdk::Virtualizer;
use cybsdk_native::{CallFilter, MonitorConfig};
use virt_driver::{create_virtualizer, DeviceOptions, DriverConfig};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Everything a command needs: merged config plus how to reach the device
pub struct Context {
    pub config: DriverConfig,
    pub config_path: PathBuf,
    pub device: DeviceOptions,
}

impl Context {
    /// Find the selected device without opening it
    pub fn find_device(&self) -> anyhow::Result<Virtualizer> {
        Ok(create_virtualizer(&self.device)?)
    }

    /// Run `f` with an open device, closing it afterwards
    pub fn with_device<F>(&self, f: F) -> CommandResult
    where
        F: FnOnce(&Virtualizer) -> CommandResult,
    {
        let device = self.find_device()?;
        with_open(&device, f)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms.max(1))
    }
}

/// Open `device`, run `f`, then close it even if `f` failed
pub fn with_open<F>(device: &Virtualizer, f: F) -> CommandResult
where
    F: FnOnce(&Virtualizer) -> CommandResult,
{
    device.open()?;
    let result = f(device);
    if device.is_open() {
        if let Err(e) = device.close() {
            tracing::warn!("Failed to close device: {e}");
        }
    }
    result
}

/// Create monitor config from CLI flags
pub fn create_monitor_config(
    monitor: bool,
    filter: Option<&str>,
) -> anyhow::Result<Option<MonitorConfig>> {
    if !monitor {
        return Ok(None);
    }

    let filter = match filter {
        Some(f) => f.parse::<CallFilter>().map_err(anyhow::Error::msg)?,
        None => CallFilter::All,
    };

    Ok(Some(MonitorConfig::default().with_filter(filter)))
}

/// Set up a Ctrl-C handler that sets the given flag to false when triggered.
/// Returns the Arc<AtomicBool> for use in the main loop.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}

/// Clear the terminal and home the cursor before redrawing a live view
pub fn clear_screen() -> std::io::Result<()> {
    let mut out = std::io::stdout();
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.execute(cursor::MoveTo(0, 0))?;
    out.flush()
}

/// Run `tick` every `interval` until interrupted or `count` samples were taken
pub fn poll_loop<F>(interval: Duration, count: Option<u64>, mut tick: F) -> CommandResult
where
    F: FnMut(u64) -> CommandResult,
{
    let running = setup_interrupt_handler();
    let mut n = 0u64;
    while running.load(Ordering::SeqCst) {
        if count.is_some_and(|max| n >= max) {
            break;
        }
        tick(n)?;
        n += 1;
        std::thread::sleep(interval);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cybsdk_native::SimulatedDevice;

    #[test]
    fn test_with_open_closes_after_error() {
        let sim = Arc::new(SimulatedDevice::new());
        let device = Virtualizer::new(sim.clone());

        let result = with_open(&device, |d| {
            assert!(d.is_open());
            anyhow::bail!("read failed")
        });

        assert!(result.is_err());
        assert!(!device.is_open());
        assert!(!cybsdk_native::VirtDevice::is_open(sim.as_ref()));
    }

    #[test]
    fn test_with_open_propagates_open_failure() {
        let device = Virtualizer::new(Arc::new(SimulatedDevice::new().unopenable()));
        let mut ran = false;
        assert!(with_open(&device, |_| {
            ran = true;
            Ok(())
        })
        .is_err());
        assert!(!ran);
    }

    #[test]
    fn test_monitor_filter_parse() {
        assert!(create_monitor_config(false, Some("bogus")).unwrap().is_none());
        assert!(create_monitor_config(true, Some("bogus")).is_err());
        assert!(create_monitor_config(true, Some("haptic")).unwrap().is_some());
    }
}
