//! Session behaviour against a simulated Virtualizer.
//!
//! Run with: cargo test -p cybsdk --test virtualizer

use std::sync::Arc;

use cybsdk::{
    HapticFrequency, HapticGain, HapticVolume, Posture, PostureThresholds, Virtualizer,
    VirtualizerError,
};
use cybsdk_native::{
    CallFilter, DeviceError, MonitorConfig, MonitorDevice, SimulatedDevice, SimulatedReadings,
    VirtDevice,
};

fn simulated() -> (Arc<SimulatedDevice>, Virtualizer) {
    let sim = Arc::new(SimulatedDevice::new());
    let virt = Virtualizer::new(sim.clone());
    (sim, virt)
}

#[test]
fn operations_fail_before_open() {
    let (_sim, virt) = simulated();
    assert!(!virt.is_open());
    assert!(matches!(virt.telemetry(), Err(VirtualizerError::NotOpen)));
    assert!(matches!(
        virt.reset_player_height(),
        Err(VirtualizerError::NotOpen)
    ));
    assert!(matches!(virt.haptic_play(), Err(VirtualizerError::NotOpen)));
}

#[test]
fn operations_fail_after_close() {
    let (_sim, virt) = simulated();
    virt.open().unwrap();
    assert!(virt.is_open());
    virt.close().unwrap();
    assert!(matches!(
        virt.movement_speed(),
        Err(VirtualizerError::NotOpen)
    ));
}

#[test]
fn info_is_readable_while_closed() {
    let (_sim, virt) = simulated();
    assert!(!virt.is_open());
    assert_eq!(virt.info().unwrap().product_name, "Simulated Virtualizer");

    let held = Virtualizer::new(Arc::new(SimulatedDevice::new().unopenable()));
    assert!(held.open().is_err());
    assert_eq!(held.info().unwrap().product_name, "Simulated Virtualizer");
}

#[test]
fn open_failure_propagates() {
    let virt = Virtualizer::new(Arc::new(SimulatedDevice::new().unopenable()));
    let err = virt.open().unwrap_err();
    assert!(matches!(
        err,
        VirtualizerError::Device(DeviceError::OpenFailed)
    ));
    assert!(!virt.is_open());
}

#[test]
fn telemetry_reads_every_value() {
    let (sim, virt) = simulated();
    virt.open().unwrap();
    sim.set_readings(SimulatedReadings {
        height_cm: 3.0,
        orientation: 0.5,
        speed_mps: 1.2,
        direction: -0.25,
    });

    let t = virt.telemetry().unwrap();
    assert_eq!(t.height_cm, 3.0);
    assert_eq!(t.orientation, 0.5);
    assert_eq!(t.speed_mps, 1.2);
    assert_eq!(t.direction, -0.25);
    assert!((t.orientation_degrees() - 180.0).abs() < 1e-3);
    assert!((t.direction_degrees() + 45.0).abs() < 1e-3);
    assert!((t.heading_degrees() - 135.0).abs() < 1e-3);
}

#[test]
fn height_reset_drives_posture() {
    let (sim, virt) = simulated();
    virt.open().unwrap();
    let thresholds = PostureThresholds::default();

    sim.set_readings(SimulatedReadings {
        height_cm: 170.0,
        ..Default::default()
    });
    virt.reset_player_height().unwrap();
    assert_eq!(virt.posture(&thresholds).unwrap(), Posture::Standing);

    sim.set_readings(SimulatedReadings {
        height_cm: 185.0,
        ..Default::default()
    });
    assert_eq!(virt.posture(&thresholds).unwrap(), Posture::Jumping);

    sim.set_readings(SimulatedReadings {
        height_cm: 150.0,
        ..Default::default()
    });
    assert_eq!(virt.posture(&thresholds).unwrap(), Posture::Crouching);
}

#[test]
fn orientation_reset_sets_origin() {
    let (sim, virt) = simulated();
    virt.open().unwrap();
    sim.set_readings(SimulatedReadings {
        orientation: 0.3,
        ..Default::default()
    });
    virt.reset_player_orientation().unwrap();
    assert!(virt.player_orientation().unwrap().abs() < 1e-6);

    sim.set_readings(SimulatedReadings {
        orientation: 0.1,
        ..Default::default()
    });
    assert!((virt.player_orientation().unwrap() - 0.8).abs() < 1e-5);
}

#[test]
fn walker_control_follows_orientation() {
    let (sim, virt) = simulated();
    virt.open().unwrap();
    sim.set_readings(SimulatedReadings {
        orientation: 0.5,
        speed_mps: 2.0,
        ..Default::default()
    });

    let control = virt
        .walker_control(&PostureThresholds::default(), 1.5)
        .unwrap();
    assert!((control.direction[0] + 1.0).abs() < 1e-4);
    assert!(control.direction[1].abs() < 1e-4);
    assert!((control.speed - 3.0).abs() < 1e-4);
    assert!(!control.jump);
}

#[test]
fn haptic_parameters_reach_device() {
    let (sim, virt) = simulated();
    virt.open().unwrap();
    assert!(virt.has_haptic().unwrap());

    virt.set_haptic_gain(HapticGain::try_from(2).unwrap()).unwrap();
    virt.set_haptic_frequency(HapticFrequency::new(40).unwrap())
        .unwrap();
    virt.set_haptic_volume(HapticVolume::new(75).unwrap())
        .unwrap();
    virt.haptic_play().unwrap();

    let state = sim.haptic_state();
    assert!(state.playing);
    assert_eq!(state.gain, 2);
    assert_eq!(state.frequency, 40);
    assert_eq!(state.volume, 75);

    virt.haptic_stop().unwrap();
    assert!(!sim.haptic_state().playing);
}

#[test]
fn haptic_is_not_gated_on_capability() {
    let sim = Arc::new(SimulatedDevice::new().with_haptic(false));
    let virt = Virtualizer::new(sim.clone());
    virt.open().unwrap();
    assert!(!virt.has_haptic().unwrap());
    virt.haptic_play().unwrap();
    assert!(sim.haptic_state().playing);
}

#[test]
fn monitored_device_behaves_like_inner() {
    let sim = Arc::new(SimulatedDevice::new());
    let monitored = MonitorDevice::wrap(
        sim.clone(),
        MonitorConfig::default().with_filter(CallFilter::All),
    );
    let virt = Virtualizer::new(monitored);
    virt.open().unwrap();
    sim.set_readings(SimulatedReadings {
        speed_mps: 0.7,
        ..Default::default()
    });
    assert_eq!(virt.movement_speed().unwrap(), 0.7);
    assert_eq!(virt.info().unwrap().product_name, "Simulated Virtualizer");
    virt.close().unwrap();
    assert!(!sim.is_open());
}
