//! Poll-cycle composition
//!
//! One [`LinkNode`] owns every data-plane component and runs them in a fixed
//! order each cycle: receive, interlock check, then outputs. The emergency
//! latch pre-empts both the live and fail-safe render paths.
//!
//! The loop is single-threaded and cooperative: the demultiplexer writes the
//! sink buffers and the drivers read them strictly sequentially within one
//! cycle, so no locking is involved. The pixel commit is the only call that
//! may block for a noticeable (hardware-bounded) time.

use crate::config::NodeConfig;
use crate::e131::{PacketInfo, SacnReceiver};
use crate::error::Result;
use crate::failsafe::FailsafeFx;
use crate::interlock::{ButtonEvent, InputSample, Interlock};
use crate::output::{DmxDriver, DmxTransport, PixelDriver, PixelStrip};

/// A complete lighting-control node data plane.
pub struct LinkNode {
    receiver: SacnReceiver,
    pixel: PixelDriver,
    dmx: DmxDriver,
    failsafe: FailsafeFx,
    interlock: Interlock,

    failsafe_fx_enabled: bool,
    brightness_scalar: f32,
    was_latched: bool,
}

impl LinkNode {
    /// Build the node from configuration and the two hardware primitives.
    pub fn new(
        cfg: &NodeConfig,
        strip: Box<dyn PixelStrip>,
        dmx_port: Box<dyn DmxTransport>,
    ) -> Result<Self> {
        cfg.validate()?;

        Ok(Self {
            receiver: SacnReceiver::new(cfg),
            pixel: PixelDriver::new(&cfg.pixels, strip),
            dmx: DmxDriver::new(&cfg.dmx, dmx_port),
            failsafe: FailsafeFx::new(),
            interlock: Interlock::new(),
            failsafe_fx_enabled: cfg.failsafe.enable_fx,
            brightness_scalar: 1.0,
            was_latched: false,
        })
    }

    /// Bring up every component. A component that fails stays unready and
    /// its operations no-op; the node keeps looping on whatever did come up.
    pub fn begin(&mut self, now_ms: u64, now_us: u64) {
        if let Err(e) = self.receiver.begin(now_ms) {
            tracing::error!("network receiver unavailable: {}", e);
        }
        if let Err(e) = self.pixel.begin() {
            tracing::error!("pixel output unavailable: {}", e);
        }
        if let Err(e) = self.dmx.begin(now_us) {
            tracing::error!("DMX output unavailable: {}", e);
        }
    }

    /// Run one cycle of the data plane.
    ///
    /// Order: receiver poll, interlock edge detection, then the render gate.
    /// While the emergency latch holds, both outputs are forced dark: the
    /// latch edge transmits immediately (bypassing the DMX frame clock) and
    /// later cycles keep the zeroed frame going out at the normal rate.
    /// Otherwise live data renders, or the fail-safe takes over once the
    /// receiver stops reporting data.
    ///
    /// Returns the button event detected this cycle, if any.
    pub fn poll_cycle(
        &mut self,
        now_ms: u64,
        now_us: u64,
        inputs: InputSample,
    ) -> Option<ButtonEvent> {
        self.receiver.poll(now_ms);
        let event = self.interlock.poll(inputs);

        if self.interlock.is_latched() {
            if !self.was_latched {
                self.was_latched = true;
                log_commit("pixel blackout", self.pixel.blackout());
                log_commit("DMX blackout", self.dmx.blackout());
            } else {
                log_commit("pixel blackout", self.pixel.blackout());
                log_commit("DMX frame", self.dmx.tick(now_us).map(|_| ()));
            }
            return event;
        }
        self.was_latched = false;

        if self.receiver.has_data(now_ms) {
            log_commit(
                "pixel frame",
                self.pixel
                    .render(self.receiver.pixel_data(), self.brightness_scalar),
            );
            self.dmx.update(self.receiver.dmx_data());
        } else if self.failsafe_fx_enabled {
            log_commit(
                "failsafe frame",
                self.pixel
                    .render_failsafe(&self.failsafe, now_ms, self.brightness_scalar),
            );
        } else {
            log_commit("pixel blackout", self.pixel.blackout());
        }

        // Not updated while in fail-safe: the DMX frame holds its last data
        log_commit("DMX frame", self.dmx.tick(now_us).map(|_| ()));

        event
    }

    /// Master brightness for the pixel output, 0-1.
    pub fn set_brightness_scalar(&mut self, scalar: f32) {
        self.brightness_scalar = scalar.clamp(0.0, 1.0);
    }

    /// Speed multiplier for the fail-safe animation.
    pub fn set_fx_speed(&mut self, speed: f32) {
        self.failsafe.set_speed(speed);
    }

    /// Operator override: force the fail-safe path while live data flows.
    pub fn set_manual_override(&mut self, enabled: bool) {
        self.receiver.set_manual_override(enabled);
    }

    pub fn is_live(&self, now_ms: u64) -> bool {
        self.receiver.is_live(now_ms)
    }

    pub fn fps(&self) -> f32 {
        self.receiver.fps()
    }

    pub fn last_packet(&self) -> PacketInfo {
        self.receiver.last_packet()
    }

    pub fn is_latched(&self) -> bool {
        self.interlock.is_latched()
    }

    /// Operator action: release the emergency latch and resume rendering.
    pub fn clear_emergency(&mut self) {
        self.interlock.clear();
    }
}

/// Transport errors never stop the loop; they are logged and the cycle goes on.
fn log_commit(what: &str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!("{} failed: {}", what, e);
    }
}
