//! PBF font decoder.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::rle;
use super::{
    FEATURE_COMPRESSED, FEATURE_OFFSET_U16, FORMAT_VERSION, HASH_ENTRY_SIZE, HASH_TABLE_SIZE,
    HEADER_SIZE, bucket_of,
};
use crate::cursor::Cursor;
use crate::error::CodecError;
use crate::limits::Limits;

/// Parsed PBF header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontHeader {
    pub version: u8,
    pub max_height: u8,
    pub glyph_count: u16,
    pub wildcard: u16,
    pub hash_table_size: u8,
    /// Width in bytes of codepoints in the offset table (2 or 4).
    pub codepoint_width: u8,
    pub header_size: u8,
    /// Width in bytes of glyph offsets in the offset table (2 or 4).
    pub offset_width: u8,
    pub compressed: bool,
}

impl FontHeader {
    fn parse(data: &[u8]) -> Result<Self, CodecError> {
        let mut c = Cursor::new(data);
        let version = c.read_u8()?;
        let max_height = c.read_u8()?;
        let glyph_count = c.read_u16_le()?;
        let wildcard = c.read_u16_le()?;
        let hash_table_size = c.read_u8()?;
        let codepoint_width = c.read_u8()?;
        let header_size = c.read_u8()?;
        let features = c.read_u8()?;

        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        if usize::from(hash_table_size) != HASH_TABLE_SIZE {
            return Err(CodecError::InvalidHeader(format!(
                "hash table size must be {HASH_TABLE_SIZE}, got {hash_table_size}"
            )));
        }
        if codepoint_width != 2 && codepoint_width != 4 {
            return Err(CodecError::InvalidHeader(format!(
                "codepoint width must be 2 or 4, got {codepoint_width}"
            )));
        }
        if usize::from(header_size) < HEADER_SIZE {
            return Err(CodecError::InvalidHeader(format!(
                "header size {header_size} is smaller than {HEADER_SIZE}"
            )));
        }

        Ok(Self {
            version,
            max_height,
            glyph_count,
            wildcard,
            hash_table_size,
            codepoint_width,
            header_size,
            offset_width: if features & FEATURE_OFFSET_U16 != 0 { 2 } else { 4 },
            compressed: features & FEATURE_COMPRESSED != 0,
        })
    }
}

/// One decoded glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub width: u32,
    /// For compressed fonts, the number of rows the stored runs cover.
    pub height: u32,
    pub left: i8,
    pub top: i8,
    pub advance: i8,
    pixels: Vec<bool>,
}

impl Glyph {
    /// Row-major pixels, `width * height` long.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Exactly `height` rows; a zero-width glyph yields empty rows.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        let width = self.width as usize;
        (0..self.height as usize).map(move |y| &self.pixels[y * width..(y + 1) * width])
    }

    /// Render as `#`/space rows joined by `\n`, trailing blanks trimmed.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let end = row.iter().rposition(|&b| b).map_or(0, |p| p + 1);
            out.extend(row[..end].iter().map(|&b| if b { '#' } else { ' ' }));
        }
        out
    }
}

/// A parsed PBF font borrowing its input buffer.
///
/// The whole index is resolved at parse time; [`read`](Self::read) only
/// decodes the requested glyph.
#[derive(Clone, Debug)]
pub struct PbfFont<'a> {
    data: &'a [u8],
    header: FontHeader,
    offsets: BTreeMap<u32, u32>,
    glyph_table_start: usize,
    limits: Limits,
}

impl<'a> PbfFont<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, CodecError> {
        Self::parse_with_limits(data, &Limits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &Limits) -> Result<Self, CodecError> {
        limits.check_memory(data.len())?;
        let header = FontHeader::parse(data)?;
        limits.check_glyphs(u32::from(header.glyph_count))?;

        let hash_start = usize::from(header.header_size);
        let offset_table_start = hash_start + usize::from(header.hash_table_size) * HASH_ENTRY_SIZE;
        let entry_size = usize::from(header.codepoint_width + header.offset_width);
        let glyph_table_start = offset_table_start + entry_size * usize::from(header.glyph_count);
        if glyph_table_start > data.len() {
            return Err(CodecError::eof(0, glyph_table_start, data.len()));
        }

        let mut hash = Cursor::at(data, hash_start)?;
        let mut offsets = BTreeMap::new();
        let mut indexed = 0usize;
        for i in 0..header.hash_table_size {
            let index = hash.read_u8()?;
            let count = hash.read_u8()?;
            let slice = hash.read_u16_le()?;
            if index != i {
                return Err(CodecError::InvalidHeader(format!(
                    "hash entry {i} carries bucket index {index}"
                )));
            }

            let mut entries = Cursor::at(data, offset_table_start + usize::from(slice))?;
            for _ in 0..count {
                let codepoint = entries.read_uint_le(header.codepoint_width)?;
                let offset = entries.read_uint_le(header.offset_width)?;
                if entries.position() > glyph_table_start {
                    return Err(CodecError::InvalidData(format!(
                        "bucket {i} runs past the offset table"
                    )));
                }
                if bucket_of(codepoint) != usize::from(i) {
                    return Err(CodecError::InvalidData(format!(
                        "codepoint {codepoint} listed in bucket {i}"
                    )));
                }
                if offsets.insert(codepoint, offset).is_some() {
                    return Err(CodecError::InvalidData(format!(
                        "codepoint {codepoint} indexed twice"
                    )));
                }
            }
            indexed += usize::from(count);
        }

        if indexed != usize::from(header.glyph_count) {
            return Err(CodecError::InvalidHeader(format!(
                "header declares {} glyphs, hash table indexes {indexed}",
                header.glyph_count
            )));
        }

        Ok(Self {
            data,
            header,
            offsets,
            glyph_table_start,
            limits: limits.clone(),
        })
    }

    pub fn header(&self) -> &FontHeader {
        &self.header
    }

    pub fn wildcard(&self) -> u32 {
        u32::from(self.header.wildcard)
    }

    pub fn max_height(&self) -> u8 {
        self.header.max_height
    }

    pub fn is_compressed(&self) -> bool {
        self.header.compressed
    }

    /// Number of distinct codepoints indexed.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.offsets.contains_key(&codepoint)
    }

    /// Indexed codepoints in ascending order.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.offsets.keys().copied()
    }

    /// Decode every glyph in codepoint order.
    pub fn glyphs(&self) -> impl Iterator<Item = (u32, Result<Glyph, CodecError>)> + '_ {
        self.codepoints().map(move |cp| (cp, self.read(cp)))
    }

    /// Decode the glyph for `codepoint`.
    ///
    /// Fails with [`CodecError::GlyphNotFound`] when the font has no entry;
    /// see [`read_or_wildcard`](Self::read_or_wildcard) for the usual fallback.
    pub fn read(&self, codepoint: u32) -> Result<Glyph, CodecError> {
        let offset = *self
            .offsets
            .get(&codepoint)
            .ok_or(CodecError::GlyphNotFound(codepoint))?;
        let start = self
            .glyph_table_start
            .checked_add(offset as usize)
            .ok_or_else(|| CodecError::eof(self.glyph_table_start, offset as usize, 0))?;

        let mut c = Cursor::at(self.data, start)?;
        let width = c.read_u8()?;
        let height_or_units = c.read_u8()?;
        let left = c.read_i8()?;
        let top = c.read_i8()?;
        let advance = c.read_i8()?;

        let (height, pixels) = if self.header.compressed {
            let packed = c.read_bytes(usize::from(height_or_units).div_ceil(2))?;
            let rows = rle::decompress(packed, height_or_units, width)?;
            let height = rows.len() as u32;
            self.limits.check_glyph(u32::from(width), height)?;
            (height, rows.concat())
        } else {
            let height = u32::from(height_or_units);
            self.limits.check_glyph(u32::from(width), height)?;
            let cells = usize::from(width) * usize::from(height_or_units);
            let packed = c.read_bytes(cells.div_ceil(8))?;
            let pixels = (0..cells)
                .map(|i| (packed[i / 8] >> (i % 8)) & 1 != 0)
                .collect();
            (height, pixels)
        };

        Ok(Glyph {
            width: u32::from(width),
            height,
            left,
            top,
            advance,
            pixels,
        })
    }

    /// Decode `codepoint`, falling back to the font's wildcard glyph.
    pub fn read_or_wildcard(&self, codepoint: u32) -> Result<Glyph, CodecError> {
        match self.read(codepoint) {
            Err(CodecError::GlyphNotFound(_)) => self.read(self.wildcard()),
            other => other,
        }
    }
}
