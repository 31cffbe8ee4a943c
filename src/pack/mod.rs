//! PBL resource pack container.
//!
//! Layout, all integers little-endian u32:
//!
//! ```text
//! manifest (12 bytes)     file count, pack crc, timestamp
//! directory               capacity x { file id (1-based), offset, length, crc }
//!                         unused slots are zero; file id 0 ends the list
//! content blob            each distinct content once, offsets relative to here
//! ```
//!
//! The directory capacity (256 for user packs, 512 for system packs) is not
//! stored in the pack. Both sides must agree on the [`PackVariant`]; decoding
//! with the wrong one misplaces the content blob and fails the CRC check.

mod decode;
mod encode;

use core::fmt;

pub use decode::ResourcePack;
pub use encode::ResourcePackBuilder;

pub(crate) const MANIFEST_SIZE: usize = 12;
pub(crate) const TABLE_ENTRY_SIZE: usize = 16;

/// Directory capacity of a pack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PackVariant {
    /// 256 directory entries.
    #[default]
    User,
    /// 512 directory entries.
    System,
}

impl PackVariant {
    /// Maximum number of files.
    pub fn capacity(self) -> usize {
        match self {
            PackVariant::User => 256,
            PackVariant::System => 512,
        }
    }

    /// The variant to retry with after a CRC mismatch.
    pub fn other(self) -> Self {
        match self {
            PackVariant::User => PackVariant::System,
            PackVariant::System => PackVariant::User,
        }
    }

    /// Byte offset of the content blob.
    pub fn content_start(self) -> usize {
        MANIFEST_SIZE + self.capacity() * TABLE_ENTRY_SIZE
    }
}

impl fmt::Display for PackVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackVariant::User => "user",
            PackVariant::System => "system",
        })
    }
}

/// Pack-level header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub num_files: u32,
    /// CRC of the content blob.
    pub crc: u32,
    pub timestamp: u32,
}

/// One directory entry of a decoded pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackEntry {
    /// 1-based position in the directory.
    pub file_id: u32,
    pub offset: u32,
    pub length: u32,
    pub crc: u32,
    /// Index into [`ResourcePack::contents`] of the bytes this entry names.
    pub slot: usize,
}
