//! PBL resource pack decoder.

use alloc::format;
use alloc::vec::Vec;

use super::{Manifest, PackEntry, PackVariant};
use crate::crc::crc32;
use crate::cursor::Cursor;
use crate::error::CodecError;
use crate::limits::Limits;

/// A fully validated resource pack.
///
/// Every distinct content span has been checked against its stored CRC;
/// decoding fails rather than returning unverified bytes.
#[derive(Clone, Debug)]
pub struct ResourcePack {
    variant: PackVariant,
    manifest: Manifest,
    entries: Vec<PackEntry>,
    contents: Vec<Vec<u8>>,
}

impl ResourcePack {
    pub fn decode(data: &[u8], variant: PackVariant) -> Result<Self, CodecError> {
        Self::decode_with_limits(data, variant, &Limits::default())
    }

    /// Decode as a user pack, retrying as a system pack if the directory
    /// size turns out to be wrong.
    pub fn decode_any(data: &[u8]) -> Result<Self, CodecError> {
        match Self::decode(data, PackVariant::User) {
            Err(
                e @ (CodecError::CrcMismatch { .. }
                | CodecError::ContentOutOfBounds { .. }
                | CodecError::CapacityOverflow(_)),
            ) => {
                log::debug!("user pack decode failed ({e}), retrying as system pack");
                Self::decode(data, PackVariant::System)
            }
            other => other,
        }
    }

    pub fn decode_with_limits(
        data: &[u8],
        variant: PackVariant,
        limits: &Limits,
    ) -> Result<Self, CodecError> {
        let mut c = Cursor::new(data);
        let manifest = Manifest {
            num_files: c.read_u32_le()?,
            crc: c.read_u32_le()?,
            timestamp: c.read_u32_le()?,
        };
        limits.check_resources(manifest.num_files)?;

        let capacity = variant.capacity();
        if manifest.num_files as usize > capacity {
            return Err(CodecError::CapacityOverflow(format!(
                "manifest declares {} files, a {variant} directory holds {capacity} \
                 (hint: try decoding as a {} pack)",
                manifest.num_files,
                variant.other()
            )));
        }

        let mut entries: Vec<PackEntry> = Vec::with_capacity(manifest.num_files as usize);
        // (offset, length, first file id naming the span)
        let mut spans: Vec<(u32, u32, u32)> = Vec::new();
        for n in 0..manifest.num_files {
            let file_id = c.read_u32_le()?;
            let offset = c.read_u32_le()?;
            let length = c.read_u32_le()?;
            let crc = c.read_u32_le()?;
            if file_id == 0 {
                break;
            }
            if file_id != n + 1 {
                return Err(CodecError::FileIdSequence {
                    expected: n + 1,
                    actual: file_id,
                });
            }

            let slot = match spans
                .iter()
                .position(|&(o, l, _)| (o, l) == (offset, length))
            {
                Some(slot) => slot,
                None => {
                    spans.push((offset, length, file_id));
                    spans.len() - 1
                }
            };
            entries.push(PackEntry {
                file_id,
                offset,
                length,
                crc,
                slot,
            });
        }

        if entries.len() != manifest.num_files as usize {
            return Err(CodecError::EntryCountMismatch {
                declared: manifest.num_files,
                actual: entries.len() as u32,
            });
        }

        let total: usize = spans.iter().map(|&(_, len, _)| len as usize).sum();
        limits.check_memory(total)?;

        let content_start = variant.content_start();
        let mut contents = Vec::with_capacity(spans.len());
        for &(offset, length, file_id) in &spans {
            let start = content_start.saturating_add(offset as usize);
            let end = start.saturating_add(length as usize);
            let bytes = data.get(start..end).ok_or(CodecError::ContentOutOfBounds {
                file_id,
                start,
                end,
                available: data.len(),
                retry_with: variant.other(),
            })?;
            let computed = crc32(bytes);
            log::trace!("span {offset}+{length}: crc {computed:#010x}");
            contents.push((bytes.to_vec(), computed));
        }

        // Entries sharing a span must all agree with it.
        for entry in &entries {
            let computed = contents[entry.slot].1;
            if computed != entry.crc {
                return Err(CodecError::CrcMismatch {
                    file_id: entry.file_id,
                    stored: entry.crc,
                    computed,
                    retry_with: variant.other(),
                });
            }
        }

        Ok(Self {
            variant,
            manifest,
            entries,
            contents: contents.into_iter().map(|(bytes, _)| bytes).collect(),
        })
    }

    pub fn variant(&self) -> PackVariant {
        self.variant
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory entries in file id order.
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    /// Distinct contents, in order of first reference.
    pub fn contents(&self) -> &[Vec<u8>] {
        &self.contents
    }

    /// Number of files (directory entries).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content of the file at directory position `index` (0-based).
    pub fn resource(&self, index: usize) -> Option<&[u8]> {
        self.entries
            .get(index)
            .map(|e| self.contents[e.slot].as_slice())
    }

    /// Every file's content in directory order.
    pub fn resources(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.entries.iter().map(|e| self.contents[e.slot].as_slice())
    }

    /// CRC of the content blob recomputed from the decoded contents.
    pub fn content_crc(&self) -> u32 {
        let mut spans: Vec<(u32, usize)> = Vec::with_capacity(self.contents.len());
        for entry in &self.entries {
            if !spans.iter().any(|&(_, slot)| slot == entry.slot) {
                spans.push((entry.offset, entry.slot));
            }
        }
        spans.sort_by_key(|&(offset, _)| offset);

        let mut blob = Vec::new();
        for (_, slot) in spans {
            blob.extend_from_slice(&self.contents[slot]);
        }
        crc32(&blob)
    }

    /// Whether the manifest CRC matches the decoded content blob.
    pub fn manifest_crc_matches(&self) -> bool {
        self.manifest.crc == self.content_crc()
    }
}
