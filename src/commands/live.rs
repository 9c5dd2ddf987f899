//! Live polling commands and calibration resets.

use super::{clear_screen, poll_loop, CommandResult, Context};
use cybsdk::{Posture, PostureThresholds};
use tracing::info;

/// Live display of height, orientation, speed and direction
pub fn data(ctx: &Context, count: Option<u64>, interval_ms: Option<u64>) -> CommandResult {
    let interval = interval_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| ctx.poll_interval());

    ctx.with_device(|device| {
        poll_loop(interval, count, |_| {
            let t = device.telemetry()?;
            clear_screen()?;
            println!("Virtualizer data (Ctrl-C to stop)");
            println!();
            println!("Height:      {:>8.2} cm", t.height_cm);
            println!("Orientation: {:>8.1}°", t.orientation_degrees());
            println!("Speed:       {:>8.2} m/s", t.speed_mps);
            println!("Direction:   {:>8.1}°", t.direction_degrees());
            if t.is_moving() {
                println!("Heading:     {:>8.1}°", t.heading_degrees());
            } else {
                println!("Heading:     standing still");
            }
            Ok(())
        })
    })
}

/// Live jump/crouch detection
///
/// Resets the player height first, so the player must stand upright.
pub fn posture(
    ctx: &Context,
    count: Option<u64>,
    jump: Option<f32>,
    crouch: Option<f32>,
) -> CommandResult {
    let defaults = ctx.config.posture;
    let thresholds = PostureThresholds {
        jump_threshold_cm: jump.unwrap_or(defaults.jump_threshold_cm),
        crouch_threshold_cm: crouch.unwrap_or(defaults.crouch_threshold_cm),
    };
    if thresholds.crouch_threshold_cm >= thresholds.jump_threshold_cm {
        anyhow::bail!(
            "Crouch threshold ({}) must be below jump threshold ({})",
            thresholds.crouch_threshold_cm,
            thresholds.jump_threshold_cm
        );
    }

    ctx.with_device(|device| {
        device.reset_player_height()?;
        info!("Height reset, thresholds {:?}", thresholds);

        let mut last = None;
        poll_loop(ctx.poll_interval(), count, |_| {
            let height = device.player_height()?;
            let posture = thresholds.classify(height);
            clear_screen()?;
            println!("Height: {height:>7.2} cm");
            println!("State:  {}", posture_label(posture));
            if last != Some(posture) {
                info!("Posture changed to {}", posture.as_str());
                last = Some(posture);
            }
            Ok(())
        })
    })
}

fn posture_label(posture: Posture) -> &'static str {
    match posture {
        Posture::Standing => "Standing",
        Posture::Jumping => "JUMPING",
        Posture::Crouching => "CROUCHING",
    }
}

/// Live walker control derived from orientation, speed and posture
pub fn walker(ctx: &Context, count: Option<u64>, scale: Option<f32>, json: bool) -> CommandResult {
    let scale = scale.unwrap_or(ctx.config.walker.speed_scale);
    let thresholds = ctx.config.posture;

    ctx.with_device(|device| {
        poll_loop(ctx.poll_interval(), count, |_| {
            let control = device.walker_control(&thresholds, scale)?;
            if json {
                println!("{}", serde_json::to_string(&control)?);
            } else {
                clear_screen()?;
                println!(
                    "Direction: ({:>6.3}, {:>6.3}, {:>6.3})",
                    control.direction[0], control.direction[1], control.direction[2]
                );
                println!("Yaw:       {:>6.1}°", control.yaw_degrees());
                println!("Speed:     {:>6.2} m/s", control.speed);
                println!("Jump:      {}", control.jump);
            }
            Ok(())
        })
    })
}

/// Reset player height and/or orientation
pub fn reset(ctx: &Context, height: bool, orientation: bool) -> CommandResult {
    if !height && !orientation {
        anyhow::bail!("Nothing to reset: pass --height and/or --orientation");
    }
    ctx.with_device(|device| {
        if height {
            device.reset_player_height()?;
            println!("Player height reset");
        }
        if orientation {
            device.reset_player_orientation()?;
            println!("Player orientation reset");
        }
        Ok(())
    })
}
