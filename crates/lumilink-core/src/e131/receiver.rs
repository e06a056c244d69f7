//! sACN network receiver
//!
//! Owns the UDP socket, validates and demultiplexes inbound datagrams, and
//! tracks liveness: the node is "live" while valid in-window packets keep
//! arriving inside the fail-safe timeout.

use std::net::{Ipv4Addr, UdpSocket};

use crate::config::NodeConfig;
use crate::e131::packet::{self, PacketInfo, E131_PORT};
use crate::e131::sink::{DmxSink, PixelSink};
use crate::e131::UniverseWindow;
use crate::error::Result;

/// Largest datagram we expect on the wire (full E1.31 frame is 638 bytes)
const RECV_BUF_LEN: usize = 1500;

/// Receives sACN data for one universe window and demultiplexes it into the
/// pixel and DMX sink buffers.
///
/// Known limitation: every in-window packet writes both sinks from offset 0,
/// so with `universe_count > 1` the configured universes overwrite the same
/// buffer region rather than landing at per-universe offsets. Downstream
/// consumers depend on this single-universe-shaped behavior.
pub struct SacnReceiver {
    socket: Option<UdpSocket>,
    window: UniverseWindow,
    multicast: bool,
    failsafe_timeout_ms: u64,

    pixel_sink: PixelSink,
    dmx_sink: DmxSink,

    last_packet: PacketInfo,
    last_packet_ms: u64,
    packets_in_window: u32,
    fps_window_start_ms: u64,
    fps: f32,
    manual_override: bool,

    recv_buf: Vec<u8>,
}

impl SacnReceiver {
    /// Build the receiver and its sink buffers from configuration.
    ///
    /// No socket is opened yet; call [`begin`](Self::begin). Until then every
    /// poll is a no-op and the node reads as not live.
    pub fn new(cfg: &NodeConfig) -> Self {
        let pixel_bytes = cfg.pixels.count as usize * cfg.pixels.stride();
        let dmx_channels = cfg.dmx.channels.min(512) as usize;

        Self {
            socket: None,
            window: UniverseWindow::new(cfg.e131.start_universe, cfg.e131.universe_count),
            multicast: cfg.e131.multicast,
            failsafe_timeout_ms: cfg.failsafe.timeout_ms,
            pixel_sink: PixelSink::new(pixel_bytes),
            dmx_sink: DmxSink::new(dmx_channels),
            last_packet: PacketInfo::default(),
            last_packet_ms: 0,
            packets_in_window: 0,
            fps_window_start_ms: 0,
            fps: 0.0,
            manual_override: false,
            recv_buf: vec![0; RECV_BUF_LEN],
        }
    }

    /// Bind the sACN port and, if configured, join the multicast group
    /// derived from the window's start universe.
    ///
    /// On bind failure the receiver stays unready (permanently fail-safe for
    /// the session); a later `begin` may retry. A failed multicast join is
    /// only a downgrade to unicast reception.
    pub fn begin(&mut self, now_ms: u64) -> Result<()> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, E131_PORT))?;
        socket.set_nonblocking(true)?;

        if self.multicast {
            let group = multicast_group(self.window.start);
            match socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED) {
                Ok(()) => tracing::info!("joined sACN multicast group {}", group),
                Err(e) => {
                    tracing::warn!("multicast join failed ({}), receiving unicast only", e);
                }
            }
        }

        tracing::info!("listening for sACN on port {}", E131_PORT);
        self.last_packet_ms = now_ms;
        self.fps_window_start_ms = now_ms;
        self.socket = Some(socket);
        Ok(())
    }

    /// Drain at most one pending datagram. Returns immediately when nothing
    /// is queued or the socket never came up.
    pub fn poll(&mut self, now_ms: u64) {
        let Some(socket) = &self.socket else {
            return;
        };

        let len = match socket.recv_from(&mut self.recv_buf) {
            Ok((len, _src)) => len,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return,
            Err(e) => {
                tracing::warn!("socket receive failed: {}", e);
                return;
            }
        };

        let Some(pkt) = packet::parse(&self.recv_buf[..len], now_ms) else {
            tracing::trace!("dropped malformed datagram ({} bytes)", len);
            return;
        };

        if !self.window.contains(pkt.universe) {
            // Traffic for another consumer on the same group
            return;
        }

        self.pixel_sink.write(pkt.payload);
        self.dmx_sink.write(pkt.payload);

        self.last_packet = pkt.info();
        self.last_packet_ms = now_ms;
        self.packets_in_window += 1;

        let elapsed = now_ms.saturating_sub(self.fps_window_start_ms);
        if elapsed >= 1000 {
            self.fps = (1000.0 * self.packets_in_window as f32) / elapsed as f32;
            self.packets_in_window = 0;
            self.fps_window_start_ms = now_ms;
        }
    }

    /// True while the last valid packet is younger than the fail-safe timeout.
    pub fn is_live(&self, now_ms: u64) -> bool {
        self.socket.is_some()
            && now_ms.saturating_sub(self.last_packet_ms) < self.failsafe_timeout_ms
    }

    /// Render gate: live network data and no operator override.
    pub fn has_data(&self, now_ms: u64) -> bool {
        self.is_live(now_ms) && !self.manual_override
    }

    /// Force the fail-safe path regardless of liveness. Packet accounting
    /// keeps running so status reporting stays truthful.
    pub fn set_manual_override(&mut self, enabled: bool) {
        if enabled != self.manual_override {
            tracing::info!("manual override {}", if enabled { "on" } else { "off" });
        }
        self.manual_override = enabled;
    }

    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    /// Pixel channel data from the most recent packet.
    pub fn pixel_data(&self) -> &[u8] {
        let len = self.last_packet.length.min(self.pixel_sink.capacity());
        &self.pixel_sink.data()[..len]
    }

    /// DMX channel data from the most recent packet.
    pub fn dmx_data(&self) -> &[u8] {
        let len = self.last_packet.length.min(self.dmx_sink.capacity());
        &self.dmx_sink.data()[..len]
    }

    pub fn last_packet(&self) -> PacketInfo {
        self.last_packet
    }

    /// Accepted-packet rate over the last >=1 s accounting window.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn window(&self) -> UniverseWindow {
        self.window
    }
}

/// Multicast group for a start universe: 239.255.<hi>.<lo>.
fn multicast_group(start_universe: u16) -> Ipv4Addr {
    Ipv4Addr::new(
        239,
        255,
        (start_universe >> 8) as u8,
        (start_universe & 0xff) as u8,
    )
}
