//! Integration tests for the native library binding.
//!
//! Tests marked `#[ignore]` need `CybSDK_Native` and a connected Virtualizer.
//! Run with: cargo test -p cybsdk-native --test native_library -- --ignored --nocapture

use std::sync::Arc;

use cybsdk_native::{DeviceError, DeviceKind, SimulatedDevice, Virt, VirtDevice, BINDING_VERSION};

#[test]
fn load_from_missing_path_reports_library_error() {
    let err = Virt::load("./no-such-dir/CybSDK_Native.dll").unwrap_err();
    match &err {
        DeviceError::LibraryLoad { path, .. } => {
            assert!(path.ends_with("CybSDK_Native.dll"));
        }
        other => panic!("expected LibraryLoad, got {other:?}"),
    }
    assert!(err.to_string().contains("CybSDK_Native.dll"));
}

#[test]
fn binding_version_is_4_4() {
    assert_eq!(Virt::sdk_version(), BINDING_VERSION);
    assert_eq!(Virt::sdk_version().raw(), 0x0404);
}

#[test]
fn trait_objects_share_one_interface() {
    let devices: Vec<Arc<dyn VirtDevice>> = vec![
        Arc::new(SimulatedDevice::new()),
        Arc::new(SimulatedDevice::new().with_haptic(false)),
    ];
    for dev in &devices {
        assert_eq!(dev.kind(), DeviceKind::Simulated);
        dev.open().unwrap();
        assert!(dev.is_open());
        let info = dev.get_device_info().unwrap();
        assert!(!info.product_name.is_empty());
        dev.close().unwrap();
    }
    assert!(devices[0].has_haptic());
    assert!(!devices[1].has_haptic());
}

/// Mirrors the SDK connection demo: load, find, open, read once, close.
#[test]
#[ignore] // requires the native library and hardware
fn connection_demo() {
    let virt = Virt::load_default().expect("Couldn't load CybSDK_Native");
    let version = virt.native_sdk_version();
    eprintln!("Native SDK {version}, binding {}", Virt::sdk_version());

    let device = virt.find_device().expect("No Virtualizer connected");
    assert_eq!(device.kind(), DeviceKind::Hardware);
    let info = device.get_device_info().expect("device info");
    eprintln!(
        "Device: {} (firmware {})",
        info.product_name,
        info.firmware_version()
    );

    device.open().expect("Unable to connect to Virtualizer");
    assert!(device.is_open());

    let height = device.get_player_height();
    let orientation = device.get_player_orientation();
    let speed = device.get_movement_speed();
    let direction = device.get_movement_direction();
    assert!((0.0..=1.0).contains(&orientation));
    assert!((-1.0..=1.0).contains(&direction));
    assert!(speed >= 0.0);
    eprintln!("height={height:.2}cm orientation={orientation:.3} speed={speed:.2} dir={direction:.3}");

    device.close().expect("close");
}

#[test]
#[ignore] // requires the native library and hardware
fn find_devices_roundtrips_through_get_device() {
    let virt = Virt::load_default().expect("Couldn't load CybSDK_Native");
    let infos = virt.find_devices();
    assert!(!infos.is_empty(), "No Virtualizer connected");

    let device = virt
        .get_device(&infos[0])
        .expect("GetDevice returned null for a found device");
    let info = device.get_device_info().unwrap();
    assert_eq!(info.vendor_id, infos[0].vendor_id);
    assert_eq!(info.product_id, infos[0].product_id);
}
