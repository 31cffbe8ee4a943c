use alloc::string::String;

#[cfg(feature = "pack")]
use crate::pack::PackVariant;

/// Errors from font and resource pack encoding and decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("unexpected end of input at offset {offset}: need {needed} bytes, have {available}")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("file id is expected to be {expected}, but was {actual}")]
    FileIdSequence { expected: u32, actual: u32 },

    #[error("manifest declares {declared} files, but the directory lists {actual}")]
    EntryCountMismatch { declared: u32, actual: u32 },

    /// Stored checksum disagrees with the content span it covers.
    ///
    /// The directory capacity is not recorded in the pack, so decoding with
    /// the wrong [`PackVariant`] shifts every content span and surfaces here.
    #[cfg(feature = "pack")]
    #[error(
        "file {file_id} stored crc {stored:#010x} does not match content crc {computed:#010x} \
         (hint: try decoding as a {retry_with} pack)"
    )]
    CrcMismatch {
        file_id: u32,
        stored: u32,
        computed: u32,
        retry_with: PackVariant,
    },

    /// A directory entry points past the end of the pack, which is how a
    /// user pack looks when decoded as a system pack.
    #[cfg(feature = "pack")]
    #[error(
        "file {file_id} spans bytes {start}..{end} but the pack is {available} bytes \
         (hint: try decoding as a {retry_with} pack)"
    )]
    ContentOutOfBounds {
        file_id: u32,
        start: usize,
        end: usize,
        available: usize,
        retry_with: PackVariant,
    },

    #[error("capacity exceeded: {0}")]
    CapacityOverflow(String),

    #[error("builder has already been finalized")]
    Finalized,

    #[error("wildcard glyph {0} not found")]
    MissingWildcard(u32),

    #[error("glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

impl CodecError {
    pub(crate) fn eof(offset: usize, needed: usize, available: usize) -> Self {
        CodecError::UnexpectedEof {
            offset,
            needed,
            available,
        }
    }
}
