//! Node configuration
//!
//! Plain-data structures describing one node: the accepted universe window,
//! the two physical outputs, the fail-safe behavior, and the panel buttons.
//! Loading and persisting these is the embedding application's job; the core
//! only consumes them at startup.

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

/// Safety cap on the universe window (12 x 512 = 6144 channels)
pub const MAX_UNIVERSES: u16 = 12;

/// Highest valid sACN universe number
const LAST_UNIVERSE: u32 = 63999;

/// E1.31 reception window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct E131Config {
    /// First universe this node accepts
    pub start_universe: u16,
    /// Number of contiguous universes accepted
    pub universe_count: u16,
    pub channels_per_universe: u16,
    /// Join the 239.255.x.x group derived from `start_universe`
    pub multicast: bool,
}

impl Default for E131Config {
    fn default() -> Self {
        Self {
            start_universe: 1,
            universe_count: 2,
            channels_per_universe: 512,
            multicast: true,
        }
    }
}

/// Pixel-strip output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelConfig {
    pub enabled: bool,
    /// Number of physical pixels on the chain
    pub count: u16,
    pub data_pin: u8,
    /// Base brightness (0-255), scaled further by the runtime brightness scalar
    pub brightness: u8,
    /// SK6812-style strips carry a fourth white byte per pixel
    pub white_channel: bool,
}

impl PixelConfig {
    /// Bytes per pixel in the incoming channel data
    pub fn stride(&self) -> usize {
        if self.white_channel {
            4
        } else {
            3
        }
    }
}

impl Default for PixelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 300,
            data_pin: 18,
            brightness: 200,
            white_channel: false,
        }
    }
}

/// DMX512 serial output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmxConfig {
    pub enabled: bool,
    /// Channels per frame (clamped to 512)
    pub channels: u16,
    pub tx_pin: u8,
    /// Frame rate for the output clock
    pub fps: u16,
}

impl Default for DmxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: 128,
            tx_pin: 17,
            fps: 40,
        }
    }
}

/// Fail-safe behavior when no valid network data arrives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailsafeConfig {
    /// Milliseconds without a valid packet before the node leaves "live"
    pub timeout_ms: u64,
    /// Render the fallback animation; when false the pixels black out instead
    pub enable_fx: bool,
    /// Minimum brightness the operator-control layer should allow for the
    /// animation. Not applied by the animator itself.
    pub brightness_floor: u8,
}

impl Default for FailsafeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            enable_fx: true,
            brightness_floor: 32,
        }
    }
}

/// Panel button wiring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub stop_pin: u8,
    pub cycle_pin: u8,
    pub confirm_pin: u8,
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            stop_pin: 12,
            cycle_pin: 13,
            confirm_pin: 14,
            active_low: true,
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub e131: E131Config,
    pub pixels: PixelConfig,
    pub dmx: DmxConfig,
    pub failsafe: FailsafeConfig,
    pub buttons: ButtonConfig,
}

impl NodeConfig {
    /// Check the invariants the data plane relies on.
    pub fn validate(&self) -> Result<()> {
        if self.e131.start_universe == 0 {
            return Err(LinkError::Config(
                "start_universe must be 1 or greater".into(),
            ));
        }
        if self.e131.universe_count == 0 {
            return Err(LinkError::Config("universe_count must be at least 1".into()));
        }
        if self.e131.universe_count > MAX_UNIVERSES {
            return Err(LinkError::Config(format!(
                "universe_count {} exceeds safety cap {}",
                self.e131.universe_count, MAX_UNIVERSES
            )));
        }
        let last = self.e131.start_universe as u32 + self.e131.universe_count as u32 - 1;
        if last > LAST_UNIVERSE {
            return Err(LinkError::Config(format!(
                "universe window ends at {} (must be 1-{})",
                last, LAST_UNIVERSE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = NodeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.e131.start_universe, 1);
        assert_eq!(cfg.e131.universe_count, 2);
        assert_eq!(cfg.pixels.count, 300);
        assert_eq!(cfg.dmx.channels, 128);
        assert_eq!(cfg.failsafe.timeout_ms, 5000);
    }

    #[test]
    fn test_universe_window_bounds() {
        let mut cfg = NodeConfig::default();
        cfg.e131.start_universe = 0;
        assert!(cfg.validate().is_err());

        cfg.e131.start_universe = 1;
        cfg.e131.universe_count = 0;
        assert!(cfg.validate().is_err());

        cfg.e131.universe_count = MAX_UNIVERSES + 1;
        assert!(cfg.validate().is_err());

        cfg.e131.universe_count = MAX_UNIVERSES;
        assert!(cfg.validate().is_ok());

        // Window may not run past the last valid universe
        cfg.e131.start_universe = 63999;
        cfg.e131.universe_count = 2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_pixel_stride() {
        let mut cfg = PixelConfig::default();
        assert_eq!(cfg.stride(), 3);
        cfg.white_channel = true;
        assert_eq!(cfg.stride(), 4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: NodeConfig = serde_json::from_str(r#"{"dmx": {"channels": 64}}"#).unwrap();
        assert_eq!(cfg.dmx.channels, 64);
        assert_eq!(cfg.dmx.fps, 40);
        assert_eq!(cfg.pixels.count, 300);
    }
}
