//! Append-only little-endian byte buffer shared by both encoders.

use alloc::vec::Vec;

const DEFAULT_CAPACITY: usize = 128;

/// Growable, append-only byte buffer with fixed-width integer writers.
///
/// Backing storage grows geometrically and never shrinks; [`len`](Self::len)
/// and [`into_vec`](Self::into_vec) only ever expose bytes actually written.
#[derive(Clone, Debug)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write `value` as a 2- or 4-byte little-endian field.
    ///
    /// Callers pick `width` from a format-wide decision and guarantee the
    /// value fits; a 2-byte write keeps the low 16 bits.
    pub(crate) fn write_uint_le(&mut self, value: u32, width: u8) {
        if width == 4 {
            self.write_u32_le(value);
        } else {
            self.write_u16_le(value as u16);
        }
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
