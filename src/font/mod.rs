//! PBF bitmap font container.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! header (10 bytes)
//!   u8  version (3)          u8  max glyph height
//!   u16 glyph count          u16 wildcard codepoint
//!   u8  hash table size (255) u8  codepoint width (2 | 4)
//!   u8  header size (10)     u8  features
//!                                  bit 0: glyph offsets are u16 (else u32)
//!                                  bit 1: glyphs are run-length compressed
//! hash table (255 x 4 bytes)
//!   u8 bucket index, u8 entry count, u16 offset of the bucket's slice
//! offset table (glyph count entries, grouped by bucket)
//!   codepoint (codepoint width), glyph table offset (offset width)
//! glyph table
//!   raw:        u8 width, u8 height,    i8 left, i8 top, i8 advance, ceil(w*h/8) bitmap bytes
//!   compressed: u8 width, u8 run count, i8 left, i8 top, i8 advance, ceil(runs/2) run bytes
//! ```
//!
//! A codepoint lives in bucket `codepoint % 255`.

mod decode;
mod encode;
mod glyph;
pub mod rle;

pub use decode::{FontHeader, Glyph, PbfFont};
pub use encode::{BuildOutput, Encoding, IgnoreReason, IgnoredGlyph, PbfBuilder};
pub use glyph::{GlyphRecord, GlyphSource, RasterGlyph};

pub(crate) const FORMAT_VERSION: u8 = 3;
pub(crate) const HEADER_SIZE: usize = 10;
pub(crate) const HASH_TABLE_SIZE: usize = 255;
pub(crate) const HASH_ENTRY_SIZE: usize = 4;
pub(crate) const BUCKET_CAPACITY: usize = 255;

pub(crate) const FEATURE_OFFSET_U16: u8 = 0x01;
pub(crate) const FEATURE_COMPRESSED: u8 = 0x02;

#[inline]
pub(crate) fn bucket_of(codepoint: u32) -> usize {
    (codepoint % HASH_TABLE_SIZE as u32) as usize
}
