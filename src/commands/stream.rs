//! UDP telemetry streaming command handlers.

use std::time::{Duration, Instant, SystemTime};

use super::{CommandResult, Context};
use tracing::{debug, info, warn};
use virt_driver::{hour_timestamp_us, FrameReceiver, FrameSender, TelemetryFrame};

/// Send telemetry frames at a fixed rate until Ctrl-C or `duration` elapses
pub async fn stream(
    ctx: &Context,
    target: Option<String>,
    rate: Option<u32>,
    duration: Option<u64>,
) -> CommandResult {
    let cfg = &ctx.config.stream;
    let target = target.unwrap_or_else(|| cfg.target.clone());
    let rate = rate.unwrap_or(cfg.rate_hz).max(1);
    let thresholds = ctx.config.posture;

    let sender = FrameSender::connect(&target, cfg.multicast_ttl).await?;
    let device = virt_driver::connect(&ctx.device)?;
    info!(
        "Streaming to {} at {} Hz as source {}",
        sender.target(),
        rate,
        cfg.source_id
    );

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(rate)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let deadline = duration.map(|s| Instant::now() + Duration::from_secs(s));
    let mut sequence = 0u64;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = async {
        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Interrupted");
                    break;
                }
                _ = ticker.tick() => {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        break;
                    }
                    let telemetry = device.telemetry()?;
                    let posture = thresholds.classify(telemetry.height_cm);
                    let frame = TelemetryFrame::new(
                        cfg.source_id,
                        sequence,
                        hour_timestamp_us(SystemTime::now()),
                        &telemetry,
                        posture,
                    );
                    if let Err(e) = sender.send(&frame).await {
                        warn!("Send failed: {e}");
                    }
                    sequence += 1;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    info!("Sent {} frame(s)", sequence);
    device.close()?;
    result
}

/// Receive and print telemetry frames from other nodes
pub async fn listen(
    ctx: &Context,
    addr: Option<String>,
    count: Option<u64>,
    include_own: bool,
) -> CommandResult {
    let cfg = &ctx.config.stream;
    let addr = addr.unwrap_or_else(|| cfg.target.clone());
    let ignore = (!include_own).then_some(cfg.source_id);

    let receiver = FrameReceiver::bind(&addr, ignore).await?;
    info!("Listening on {}", receiver.local_addr()?);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut received = 0u64;
    loop {
        if count.is_some_and(|max| received >= max) {
            break;
        }
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            frame = receiver.recv() => {
                let (frame, from) = frame?;
                let latency_us = hour_timestamp_us(SystemTime::now()) - frame.timestamp_us;
                debug!("Frame {} from {} ({:.0} µs)", frame.sequence, from, latency_us);
                println!(
                    "[{}#{}] height {:>7.2} cm  orient {:>6.1}°  speed {:>5.2} m/s  dir {:>7.1}°  {}",
                    frame.source(),
                    frame.sequence,
                    frame.height_cm,
                    frame.orientation_deg,
                    frame.speed_mps,
                    frame.direction_deg,
                    frame.posture().map(|p| p.as_str()).unwrap_or("unknown"),
                );
                received += 1;
            }
        }
    }
    Ok(())
}
