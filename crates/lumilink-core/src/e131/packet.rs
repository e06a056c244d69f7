//! E1.31 datagram validation
//!
//! Validates the root, framing, and DMP layers of an inbound datagram and
//! extracts universe, sequence, and the channel payload. Rejection is silent
//! (`None`): malformed traffic is expected protocol noise, and the rejection
//! path never allocates.

/// UDP port sACN data is received on
pub const E131_PORT: u16 = 5568;

/// Shortest buffer that can hold the complete header stack
const MIN_PACKET_LEN: usize = 126;

/// Root-layer preamble size field
const PREAMBLE: u16 = 0x0010;

/// Root-layer ACN packet identifier
const ACN_IDENTIFIER: &[u8; 9] = b"ASC-E1.17";

/// Framing-layer vector for an E1.31 data packet
const VECTOR_DATA_PACKET: u16 = 0x0002;

/// DMP-layer vector: set property
const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;

/// DMP address-and-data type
const DMP_ADDRESS_TYPE: u8 = 0xa1;

/// Offset of the DMP layer within the datagram
const DMP_OFFSET: usize = 115;

/// One accepted datagram, borrowing its channel payload.
///
/// Consumed immediately by the demultiplexer; never persisted.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedPacket<'a> {
    pub universe: u16,
    pub sequence: u8,
    /// Channel bytes (the property values after the DMX start code)
    pub payload: &'a [u8],
    pub received_at_ms: u64,
}

/// Summary of the most recent accepted packet, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketInfo {
    pub universe: u16,
    pub sequence: u8,
    pub length: usize,
    pub timestamp_ms: u64,
}

impl<'a> ValidatedPacket<'a> {
    pub fn info(&self) -> PacketInfo {
        PacketInfo {
            universe: self.universe,
            sequence: self.sequence,
            length: self.payload.len(),
            timestamp_ms: self.received_at_ms,
        }
    }
}

/// Bounds-checked view over a datagram. Every read returns `None` instead of
/// running past the buffer.
struct ByteView<'a> {
    data: &'a [u8],
}

impl<'a> ByteView<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn u8_at(&self, at: usize) -> Option<u8> {
        self.data.get(at).copied()
    }

    fn u16_be(&self, at: usize) -> Option<u16> {
        let hi = self.u8_at(at)?;
        let lo = self.u8_at(at + 1)?;
        Some(u16::from_be_bytes([hi, lo]))
    }

    fn bytes(&self, at: usize, len: usize) -> Option<&'a [u8]> {
        self.data.get(at..at + len)
    }
}

/// Validate a raw datagram and extract its channel data.
///
/// The checks run in order and short-circuit; any failure drops the packet.
/// Universe filtering against the configured window happens downstream.
pub fn parse(data: &[u8], now_ms: u64) -> Option<ValidatedPacket<'_>> {
    if data.len() < MIN_PACKET_LEN {
        return None;
    }
    let view = ByteView::new(data);

    if view.u16_be(0)? != PREAMBLE {
        return None;
    }
    if view.bytes(4, ACN_IDENTIFIER.len())? != ACN_IDENTIFIER {
        return None;
    }

    // Framing layer: flags in the top bits of the flags-and-length field
    if view.u16_be(38)? & 0x7000 != 0x7000 {
        return None;
    }
    if view.u16_be(40)? != VECTOR_DATA_PACKET {
        return None;
    }

    let sequence = view.u8_at(111)?;
    let universe = view.u16_be(113)?;

    // DMP layer
    if view.u8_at(DMP_OFFSET)? != VECTOR_DMP_SET_PROPERTY {
        return None;
    }
    if view.u8_at(DMP_OFFSET + 1)? != DMP_ADDRESS_TYPE {
        return None;
    }
    let property_count = view.u16_be(DMP_OFFSET + 3)? as usize;
    if property_count < 2 {
        return None;
    }

    // First property value is the DMX start code
    let payload = view.bytes(DMP_OFFSET + 5, property_count - 1)?;

    Some(ValidatedPacket {
        universe,
        sequence,
        payload,
        received_at_ms: now_ms,
    })
}
