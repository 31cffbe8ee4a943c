//! Bounds-checked little-endian reads over `&[u8]`.

use crate::error::CodecError;

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// A cursor positioned at `pos`; fails if `pos` is past the end.
    pub(crate) fn at(data: &'a [u8], pos: usize) -> Result<Self, CodecError> {
        let mut cursor = Self::new(data);
        cursor.set_position(pos)?;
        Ok(cursor)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), CodecError> {
        if pos > self.data.len() {
            return Err(CodecError::eof(pos, 0, self.data.len()));
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                CodecError::eof(self.pos, n, self.data.len().saturating_sub(self.pos))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8, CodecError> {
        Ok(self.read_u8()? as i8)
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a 2- or 4-byte field; `width` is validated by the caller.
    pub(crate) fn read_uint_le(&mut self, width: u8) -> Result<u32, CodecError> {
        if width == 4 {
            self.read_u32_le()
        } else {
            self.read_u16_le().map(u32::from)
        }
    }
}
