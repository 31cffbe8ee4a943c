//! PBL resource pack encoder.

use alloc::format;
use alloc::vec::Vec;

use super::{PackVariant, TABLE_ENTRY_SIZE};
use crate::crc::crc32;
use crate::error::CodecError;
use crate::writer::ByteWriter;

#[derive(Clone, Copy, Debug)]
struct TableEntry {
    slot: usize,
    offset: Option<u32>,
    length: u32,
    crc: u32,
}

enum State {
    Building,
    Finalized(Vec<u8>),
}

/// Builder for PBL resource packs.
///
/// Byte-identical resources share one copy of their content. The first
/// [`serialize`](Self::serialize) lays out the content blob and finalizes
/// the builder; later calls return the same bytes and
/// [`add_resource`](Self::add_resource) fails.
///
/// ```
/// use pbfkit::pack::{PackVariant, ResourcePack, ResourcePackBuilder};
///
/// let mut builder = ResourcePackBuilder::new(PackVariant::User);
/// builder.add_resource(b"hello".to_vec())?;
/// builder.add_resource(b"hello".to_vec())?;
/// let bytes = builder.serialize()?;
///
/// let pack = ResourcePack::decode(&bytes, PackVariant::User)?;
/// assert_eq!(pack.len(), 2);
/// assert_eq!(pack.contents().len(), 1);
/// # Ok::<(), pbfkit::CodecError>(())
/// ```
pub struct ResourcePackBuilder {
    variant: PackVariant,
    timestamp: u32,
    contents: Vec<Vec<u8>>,
    entries: Vec<TableEntry>,
    state: State,
}

impl ResourcePackBuilder {
    pub fn new(variant: PackVariant) -> Self {
        Self {
            variant,
            timestamp: 0,
            contents: Vec::new(),
            entries: Vec::new(),
            state: State::Building,
        }
    }

    /// Manifest timestamp; 0 unless set.
    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn variant(&self) -> PackVariant {
        self.variant
    }

    /// Number of directory entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, State::Finalized(_))
    }

    /// Append a resource and return its 1-based file id.
    pub fn add_resource(&mut self, content: impl Into<Vec<u8>>) -> Result<u32, CodecError> {
        if self.is_finalized() {
            return Err(CodecError::Finalized);
        }
        let content = content.into();
        let length = u32::try_from(content.len()).map_err(|_| {
            CodecError::CapacityOverflow(format!("resource of {} bytes", content.len()))
        })?;
        let crc = crc32(&content);

        let slot = match self.contents.iter().position(|c| *c == content) {
            Some(slot) => slot,
            None => {
                self.contents.push(content);
                self.contents.len() - 1
            }
        };

        self.entries.push(TableEntry {
            slot,
            offset: None,
            length,
            crc,
        });
        Ok(self.entries.len() as u32)
    }

    /// Serialize the pack, finalizing the builder on the first call.
    pub fn serialize(&mut self) -> Result<Vec<u8>, CodecError> {
        if let State::Finalized(bytes) = &self.state {
            return Ok(bytes.clone());
        }
        let bytes = self.finalize()?;
        self.state = State::Finalized(bytes.clone());
        Ok(bytes)
    }

    fn finalize(&mut self) -> Result<Vec<u8>, CodecError> {
        let capacity = self.variant.capacity();
        if self.entries.len() > capacity {
            return Err(CodecError::CapacityOverflow(format!(
                "{} resources, a {} pack holds {capacity} or fewer",
                self.entries.len(),
                self.variant
            )));
        }

        let total: usize = self.contents.iter().map(Vec::len).sum();
        let total = u32::try_from(total).map_err(|_| {
            CodecError::CapacityOverflow(format!("content blob of {total} bytes"))
        })?;

        // Later-added contents land at higher offsets; existing packs rely on
        // this exact placement.
        let mut next_end = total;
        for i in (0..self.entries.len()).rev() {
            let TableEntry {
                slot,
                offset,
                length,
                ..
            } = self.entries[i];
            if offset.is_some() {
                continue;
            }
            next_end -= length;
            for entry in self.entries.iter_mut().filter(|e| e.slot == slot) {
                entry.offset = Some(next_end);
            }
        }

        let blob = self.content_blob();
        let pack_crc = crc32(&blob);
        log::debug!(
            "{} pack: {} entries, {} distinct contents, {} content bytes, crc {pack_crc:#010x}",
            self.variant,
            self.entries.len(),
            self.contents.len(),
            blob.len()
        );

        let mut out = ByteWriter::with_capacity(self.variant.content_start() + blob.len());
        out.write_u32_le(self.entries.len() as u32);
        out.write_u32_le(pack_crc);
        out.write_u32_le(self.timestamp);

        for (i, entry) in self.entries.iter().enumerate() {
            out.write_u32_le(i as u32 + 1);
            out.write_u32_le(entry.offset.unwrap_or_default());
            out.write_u32_le(entry.length);
            out.write_u32_le(entry.crc);
        }
        let padding = (capacity - self.entries.len()) * TABLE_ENTRY_SIZE;
        out.extend_from_slice(&alloc::vec![0u8; padding]);

        out.extend_from_slice(&blob);
        Ok(out.into_vec())
    }

    /// Distinct contents concatenated in ascending offset order.
    fn content_blob(&self) -> Vec<u8> {
        let mut placed: Vec<(u32, usize)> = self
            .entries
            .iter()
            .map(|e| (e.offset.unwrap_or_default(), e.slot))
            .collect();
        placed.sort_by_key(|&(offset, _)| offset);

        let mut seen = alloc::vec![false; self.contents.len()];
        let mut blob = Vec::new();
        for (_, slot) in placed {
            if !core::mem::replace(&mut seen[slot], true) {
                blob.extend_from_slice(&self.contents[slot]);
            }
        }
        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_assigned_from_the_end() {
        let mut b = ResourcePackBuilder::new(PackVariant::User);
        b.add_resource([1u8; 10]).unwrap();
        b.add_resource([2u8; 20]).unwrap();
        b.add_resource([1u8; 10]).unwrap();
        b.finalize().unwrap();
        let offsets: Vec<_> = b.entries.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, [Some(20), Some(0), Some(20)]);

        let blob = b.content_blob();
        assert_eq!(blob.len(), 30);
        assert_eq!(&blob[..20], &[2u8; 20]);
        assert_eq!(&blob[20..], &[1u8; 10]);
    }

    #[test]
    fn distinct_ranges_are_disjoint_and_contiguous() {
        let mut b = ResourcePackBuilder::new(PackVariant::System);
        let contents: [&[u8]; 7] = [b"aa", b"bbbb", b"", b"aa", b"c", b"bbbb", b"dddddd"];
        for content in contents {
            b.add_resource(content).unwrap();
        }
        b.finalize().unwrap();

        let mut ranges: Vec<(u32, u32)> = b
            .entries
            .iter()
            .map(|e| (e.offset.unwrap(), e.length))
            .collect();
        ranges.sort();
        ranges.dedup();
        let mut end = 0;
        for (offset, length) in ranges {
            assert_eq!(offset, end);
            end = offset + length;
        }
        assert_eq!(end, 2 + 4 + 1 + 6);
    }
}
