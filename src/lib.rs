//! # pbfkit
//!
//! Encoder and decoder for two compact binary containers used to ship
//! assets to memory-constrained devices:
//!
//! - **PBF** ([`font`]): bitmap fonts. Glyphs are indexed through a fixed
//!   255-bucket hash table and stored either as raw 1-bit bitmaps or as
//!   4-bit run-length codes, whichever is smaller.
//! - **PBL** ([`pack`]): resource packs. Arbitrary blobs are deduplicated,
//!   listed in a fixed-size directory and checked with the device's
//!   word-oriented CRC-32 ([`crc32`]).
//!
//! ## Non-Goals
//!
//! - Rasterizing outline fonts. Glyph bitmaps come from a [`font::GlyphSource`]
//!   or are built directly as [`font::GlyphRecord`]s.
//! - Text layout, shaping or rendering.
//! - File or directory handling; everything works on byte slices.
//!
//! ## Usage
//!
//! ```
//! use pbfkit::font::{Encoding, GlyphRecord, PbfBuilder, PbfFont};
//! use pbfkit::pack::{PackVariant, ResourcePack, ResourcePackBuilder};
//!
//! // Build a font with a fallback glyph and one letter.
//! let mut builder = PbfBuilder::new(14, 0x25AF);
//! builder.add_glyph(0x25AF, GlyphRecord::from_rows(&["##", "##"], 0, 0, 3)?)?;
//! builder.add_glyph('i' as u32, GlyphRecord::from_rows(&["#", " ", "#", "#"], 0, 1, 2)?)?;
//! let font = builder.build(Encoding::Auto)?;
//!
//! let parsed = PbfFont::parse(&font.bytes)?;
//! assert_eq!(parsed.read('i' as u32)?.to_text(), "#\n\n#\n#");
//! // Unknown codepoints fall back to the wildcard glyph.
//! assert_eq!(parsed.read_or_wildcard('?' as u32)?.width, 2);
//!
//! // Ship it in a resource pack.
//! let mut pack = ResourcePackBuilder::new(PackVariant::User);
//! pack.add_resource(font.bytes.clone())?;
//! let bytes = pack.serialize()?;
//! let unpacked = ResourcePack::decode(&bytes, PackVariant::User)?;
//! assert_eq!(unpacked.resource(0), Some(&font.bytes[..]));
//! # Ok::<(), pbfkit::CodecError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod crc;
mod cursor;
mod error;
mod limits;
mod writer;

#[cfg(feature = "font")]
pub mod font;

#[cfg(feature = "pack")]
pub mod pack;

// Re-exports
pub use crc::{crc32, crc32_update};
pub use error::CodecError;
pub use limits::Limits;
pub use writer::ByteWriter;
