//! Physical output drivers
//!
//! Two independently clocked outputs read from the sink buffers:
//!
//! - [`PixelDriver`] renders RGB(W) channel data to an addressable pixel
//!   strip; its commit happens whenever the caller invokes it.
//! - [`DmxDriver`] owns a start-code-prefixed DMX frame and transmits it at
//!   a fixed frame rate regardless of how often the buffer updates.
//!
//! Both drivers expose an unconditional `blackout` for the emergency
//! interlock. The actual hardware primitives are the [`PixelStrip`] and
//! [`DmxTransport`] traits, supplied by the embedding binary.

pub mod dmx;
pub mod pixel;

pub use dmx::{DmxDriver, DmxTransport};
pub use pixel::{PixelDriver, PixelStrip};
