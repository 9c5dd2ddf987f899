//! Telemetry frames over UDP
//!
//! A frame is nine native-endian `f64` values (72 bytes):
//!
//! | idx | field            |
//! |-----|------------------|
//! | 0   | source id        |
//! | 1   | sequence number  |
//! | 2   | timestamp, µs    |
//! | 3   | height, cm       |
//! | 4   | orientation, deg |
//! | 5   | speed, m/s       |
//! | 6   | direction, deg   |
//! | 7   | heading, deg     |
//! | 8   | posture code     |
//!
//! Frames go to a unicast address or a multicast group. Receivers drop frames
//! stamped with their own source id so a node can listen to the group it sends to.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};

use cybsdk::{Posture, Telemetry};
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, trace, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Encoded frame length in bytes
pub const FRAME_LEN: usize = std::mem::size_of::<TelemetryFrame>();

/// Errors from the telemetry stream
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// One telemetry sample on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TelemetryFrame {
    pub source_id: f64,
    pub sequence: f64,
    pub timestamp_us: f64,
    pub height_cm: f64,
    pub orientation_deg: f64,
    pub speed_mps: f64,
    pub direction_deg: f64,
    pub heading_deg: f64,
    pub posture: f64,
}

impl TelemetryFrame {
    pub fn new(
        source_id: u32,
        sequence: u64,
        timestamp_us: f64,
        telemetry: &Telemetry,
        posture: Posture,
    ) -> Self {
        Self {
            source_id: f64::from(source_id),
            sequence: sequence as f64,
            timestamp_us,
            height_cm: f64::from(telemetry.height_cm),
            orientation_deg: f64::from(telemetry.orientation_degrees()),
            speed_mps: f64::from(telemetry.speed_mps),
            direction_deg: f64::from(telemetry.direction_degrees()),
            heading_deg: f64::from(telemetry.heading_degrees()),
            posture: f64::from(posture.code()),
        }
    }

    /// Parse a received datagram
    pub fn decode(bytes: &[u8]) -> Result<Self, StreamError> {
        Self::read_from_bytes(bytes).map_err(|_| StreamError::InvalidLength {
            expected: FRAME_LEN,
            actual: bytes.len(),
        })
    }

    /// Encoded bytes of this frame
    pub fn encode(&self) -> &[u8] {
        self.as_bytes()
    }

    pub fn source(&self) -> u32 {
        self.source_id as u32
    }

    pub fn posture(&self) -> Option<Posture> {
        Posture::from_code(self.posture as u8)
    }
}

/// Microseconds elapsed within the current hour
///
/// Wraps every hour; good for latency deltas between nodes with synced clocks.
pub fn hour_timestamp_us(now: SystemTime) -> f64 {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs_in_hour = since_epoch.as_secs() % 3600;
    (secs_in_hour * 1_000_000 + u64::from(since_epoch.subsec_micros())) as f64
}

async fn resolve(addr: &str) -> Result<SocketAddr, StreamError> {
    tokio::net::lookup_host(addr)
        .await
        .map_err(|_| StreamError::InvalidAddress(addr.to_string()))?
        .next()
        .ok_or_else(|| StreamError::InvalidAddress(addr.to_string()))
}

// Only IPv4 groups get a TTL and a membership.
fn reject_v6_multicast(addr: SocketAddr) -> Result<(), StreamError> {
    match addr {
        SocketAddr::V6(v6) if v6.ip().is_multicast() => Err(StreamError::InvalidAddress(
            format!("{addr} (IPv6 multicast is not supported)"),
        )),
        _ => Ok(()),
    }
}

/// Sends frames to one unicast address or multicast group
pub struct FrameSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl FrameSender {
    /// Bind an ephemeral socket and resolve `target`
    pub async fn connect(target: &str, multicast_ttl: u32) -> Result<Self, StreamError> {
        let target = resolve(target).await?;
        reject_v6_multicast(target)?;
        let bind: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind).await?;
        if target.ip().is_multicast() {
            socket.set_multicast_ttl_v4(multicast_ttl)?;
            debug!("Multicast to {} with TTL {}", target, multicast_ttl);
        }
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub async fn send(&self, frame: &TelemetryFrame) -> Result<(), StreamError> {
        let bytes = frame.encode();
        let sent = self.socket.send_to(bytes, self.target).await?;
        trace!("Sent {} bytes to {}", sent, self.target);
        Ok(())
    }
}

/// Receives frames, joining a multicast group when needed
pub struct FrameReceiver {
    socket: UdpSocket,
    ignore_source: Option<u32>,
}

impl FrameReceiver {
    /// Listen on `addr`
    ///
    /// For a multicast address the socket binds the port on all interfaces
    /// and joins the group.
    pub async fn bind(addr: &str, ignore_source: Option<u32>) -> Result<Self, StreamError> {
        let addr = resolve(addr).await?;
        reject_v6_multicast(addr)?;
        let socket = match addr {
            SocketAddr::V4(v4) if v4.ip().is_multicast() => {
                let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, v4.port())).await?;
                socket.join_multicast_v4(*v4.ip(), Ipv4Addr::UNSPECIFIED)?;
                debug!("Joined multicast group {}", v4.ip());
                socket
            }
            _ => UdpSocket::bind(addr).await?,
        };
        Ok(Self {
            socket,
            ignore_source,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, StreamError> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait for the next frame from another source
    ///
    /// Malformed datagrams and our own frames are skipped.
    pub async fn recv(&self) -> Result<(TelemetryFrame, SocketAddr), StreamError> {
        let mut buf = [0u8; 1024];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf).await?;
            let frame = match TelemetryFrame::decode(&buf[..len]) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Dropping datagram from {}: {}", from, e);
                    continue;
                }
            };
            if self.ignore_source == Some(frame.source()) {
                trace!("Ignoring own frame {}", frame.sequence);
                continue;
            }
            return Ok((frame, from));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample() -> TelemetryFrame {
        let telemetry = Telemetry {
            height_cm: -4.0,
            orientation: 0.25,
            speed_mps: 1.0,
            direction: 0.5,
        };
        TelemetryFrame::new(5551, 7, 1234.0, &telemetry, Posture::Standing)
    }

    #[test]
    fn test_frame_is_nine_doubles() {
        assert_eq!(FRAME_LEN, 72);
        assert_eq!(sample().encode().len(), 72);
    }

    #[test]
    fn test_frame_fields() {
        let frame = sample();
        assert_eq!(frame.source(), 5551);
        assert_eq!(frame.sequence, 7.0);
        assert_eq!(frame.orientation_deg, 90.0);
        assert_eq!(frame.direction_deg, 90.0);
        assert_eq!(frame.heading_deg, 180.0);
        assert_eq!(frame.posture(), Some(Posture::Standing));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let bytes = sample().encode().to_vec();
        assert!(matches!(
            TelemetryFrame::decode(&bytes[..71]),
            Err(StreamError::InvalidLength {
                expected: 72,
                actual: 71
            })
        ));
        assert_eq!(TelemetryFrame::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_first_value_is_native_endian_source() {
        let bytes = sample().encode().to_vec();
        let first = f64::from_ne_bytes(bytes[..8].try_into().unwrap());
        assert_eq!(first, 5551.0);
    }

    #[test]
    fn test_hour_timestamp() {
        let t = UNIX_EPOCH + Duration::from_secs(3600 * 5 + 61) + Duration::from_micros(42);
        assert_eq!(hour_timestamp_us(t), 61_000_042.0);
        assert_eq!(hour_timestamp_us(UNIX_EPOCH + Duration::from_secs(7200)), 0.0);
    }
}
