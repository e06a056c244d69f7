//! Sink buffers between the demultiplexer and the output drivers

/// Copy as many bytes as fit, truncating to the shorter of the two.
///
/// This is the single truncation policy for all sink writes: sources longer
/// than the sink are cut, shorter sources leave the tail untouched. Returns
/// the number of bytes copied.
pub fn copy_clamped(src: &[u8], dst: &mut [u8]) -> usize {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
    n
}

/// Pixel channel data sink.
///
/// Sized from configuration at startup and grown on demand when a payload
/// larger than the current capacity arrives. Growth is monotonic: the buffer
/// never shrinks back for smaller payloads.
#[derive(Debug)]
pub struct PixelSink {
    data: Vec<u8>,
}

impl PixelSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
        }
    }

    /// Copy a payload in from offset 0, growing the sink first if needed.
    ///
    /// If the allocator cannot satisfy the growth the payload is dropped
    /// (returns 0) and the sink keeps its current size; the node must not
    /// crash over one oversized packet.
    pub fn write(&mut self, payload: &[u8]) -> usize {
        if payload.len() > self.data.len() {
            let additional = payload.len() - self.data.len();
            if self.data.try_reserve_exact(additional).is_err() {
                tracing::warn!(
                    "pixel sink grow to {} bytes failed, payload dropped",
                    payload.len()
                );
                return 0;
            }
            self.data.resize(payload.len(), 0);
        }
        copy_clamped(payload, &mut self.data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// DMX channel data sink. Fixed size for the life of the node.
#[derive(Debug)]
pub struct DmxSink {
    data: Vec<u8>,
}

impl DmxSink {
    pub fn new(channels: usize) -> Self {
        Self {
            data: vec![0; channels],
        }
    }

    /// Copy a payload in from offset 0, truncating to the sink size.
    pub fn write(&mut self, payload: &[u8]) -> usize {
        copy_clamped(payload, &mut self.data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}
