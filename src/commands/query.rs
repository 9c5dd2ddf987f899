//! Query (read-only) command handlers.

use super::{with_open, CommandResult, Context};
use cybsdk::{DeviceInfo, Virt, Virtualizer};
use tracing::warn;
use virt_driver::load_virt;

/// Show binding and native SDK versions
pub fn version(ctx: &Context) -> CommandResult {
    println!("Binding SDK: {}", Virt::sdk_version());
    match load_virt(ctx.device.library_path.as_deref()) {
        Ok(virt) => {
            println!("Native SDK:  {}", virt.native_sdk_version());
            println!("Library:     {}", virt.library().path().display());
        }
        Err(e) => {
            warn!("{e}");
            println!("Native SDK:  not loaded");
        }
    }
    Ok(())
}

/// List all connected devices
pub fn list(ctx: &Context) -> CommandResult {
    let virt = load_virt(ctx.device.library_path.as_deref())?;
    let devices = virt.find_devices();
    if devices.is_empty() {
        println!("No Virtualizer devices found");
        return Ok(());
    }

    println!("Found {} device(s):", devices.len());
    for (i, info) in devices.iter().enumerate() {
        println!(
            "  [{}] {} {} (VID={:04X} PID={:04X}, firmware {})",
            i,
            info.vendor_name,
            info.product_name,
            info.vendor_id,
            info.product_id,
            info.firmware_version()
        );
        if !info.device_path.is_empty() {
            println!("      path: {}", info.device_path);
        }
    }
    Ok(())
}

fn print_info(info: &DeviceInfo) {
    println!("Vendor:   {} ({:04X})", info.vendor_name, info.vendor_id);
    println!("Product:  {} ({:04X})", info.product_name, info.product_id);
    println!("Firmware: {}", info.firmware_version());
    if !info.device_path.is_empty() {
        println!("Path:     {}", info.device_path);
    }
}

/// Show device info and firmware version
///
/// The info is read without opening the device; the haptic capability
/// needs an open connection and is reported as unknown if that fails.
pub fn info(ctx: &Context, json: bool) -> CommandResult {
    let device = ctx.find_device()?;
    let info = device.info()?;
    let has_haptic = match query_haptic(&device) {
        Ok(h) => Some(h),
        Err(e) => {
            warn!("Could not open device: {e:#}");
            None
        }
    };

    if json {
        let value = serde_json::json!({
            "kind": device.kind().as_str(),
            "native": device.kind().is_native(),
            "firmware": info.firmware_version(),
            "has_haptic": has_haptic,
            "info": info,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_kind(&device);
        print_info(&info);
        let haptic = match has_haptic {
            Some(true) => "yes",
            Some(false) => "no",
            None => "unknown",
        };
        println!("Haptic:   {haptic}");
    }
    Ok(())
}

fn query_haptic(device: &Virtualizer) -> anyhow::Result<bool> {
    let mut has_haptic = false;
    with_open(device, |d| {
        has_haptic = d.has_haptic()?;
        Ok(())
    })?;
    Ok(has_haptic)
}

fn print_kind(device: &Virtualizer) {
    let kind = device.kind();
    let origin = if kind.is_native() { "native" } else { "in-process" };
    println!("Device:   {} ({origin})", kind.as_str());
}

/// Connection check: find, print info, open, read every value once, close
pub fn check(ctx: &Context) -> CommandResult {
    println!("Looking for {:?} device...", ctx.device.selection);
    let device = ctx.find_device()?;
    print_kind(&device);
    print_info(&device.info()?);

    with_open(&device, |device| {
        println!("Connected.");
        let telemetry = device.telemetry()?;
        println!("Height:      {:.2} cm", telemetry.height_cm);
        println!("Orientation: {:.1}°", telemetry.orientation_degrees());
        println!("Speed:       {:.2} m/s", telemetry.speed_mps);
        println!("Direction:   {:.1}°", telemetry.direction_degrees());
        println!("Haptic:      {}", device.has_haptic()?);
        Ok(())
    })?;
    println!("Connection closed.");
    Ok(())
}
