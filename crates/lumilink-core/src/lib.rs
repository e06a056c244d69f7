//! LumiLink Core - sACN data plane for a streaming-lighting control node
//!
//! This crate implements the data plane of a LumiLink node:
//! - **E1.31 ingestion**: datagram validation, universe filtering, and
//!   demultiplexing into pixel and DMX sink buffers
//! - **Pixel output**: stride-aware RGB(W) rendering against a physical
//!   pixel-strip transmit primitive
//! - **DMX output**: a fixed-rate frame clock over a break-capable serial
//!   transmit primitive
//! - **Fail-safe**: a generative animation that replaces live data when the
//!   network goes quiet
//! - **Emergency interlock**: a latching stop control that forces all
//!   outputs dark until explicitly cleared
//!
//! Everything runs on a single-threaded cooperative poll loop; see
//! [`node::LinkNode::poll_cycle`] for the composition. The hardware transmit
//! primitives are traits ([`output::PixelStrip`], [`output::DmxTransport`])
//! supplied by the embedding binary, and all time is passed in explicitly so
//! the loop is deterministic under test.

/// Configuration structures and defaults
pub mod config;
/// Error types
pub mod error;

/// Color value type and conversions
pub mod color;
/// E1.31 (sACN) packet validation and reception
pub mod e131;
/// Fail-safe animation
pub mod failsafe;
/// Emergency stop interlock
pub mod interlock;
/// Poll-cycle composition
pub mod node;
/// Pixel and DMX output drivers
pub mod output;

pub use color::Rgb;
pub use config::{
    ButtonConfig, DmxConfig, E131Config, FailsafeConfig, NodeConfig, PixelConfig, MAX_UNIVERSES,
};
pub use e131::{PacketInfo, SacnReceiver, UniverseWindow, ValidatedPacket};
pub use error::{LinkError, Result};
pub use failsafe::FailsafeFx;
pub use interlock::{ButtonEvent, InputSample, Interlock};
pub use node::LinkNode;
pub use output::{DmxDriver, DmxTransport, PixelDriver, PixelStrip};
