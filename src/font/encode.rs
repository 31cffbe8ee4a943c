//! PBF font encoder.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use super::glyph::{GlyphRecord, GlyphSource};
use super::rle;
use super::{
    BUCKET_CAPACITY, FEATURE_COMPRESSED, FEATURE_OFFSET_U16, FORMAT_VERSION, HASH_ENTRY_SIZE,
    HASH_TABLE_SIZE, HEADER_SIZE, bucket_of,
};
use crate::error::CodecError;
use crate::writer::ByteWriter;

/// How glyph bitmaps are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Encode both ways and keep the smaller glyph table.
    #[default]
    Auto,
    /// Force run-length compressed glyphs.
    Compressed,
    /// Force raw 1-bit-per-pixel glyphs.
    Uncompressed,
}

/// Why a glyph was left out of a built font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Its hash bucket already held 255 glyphs.
    BucketFull,
    /// Its bitmap needs more than 255 runs to compress.
    TooManyRuns,
}

/// A glyph dropped during [`PbfBuilder::build`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IgnoredGlyph {
    pub codepoint: u32,
    pub reason: IgnoreReason,
}

/// Result of building a font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOutput {
    /// The serialized font.
    pub bytes: Vec<u8>,
    /// Whether the glyph table is run-length compressed.
    pub compressed: bool,
    /// Glyphs that could not be placed, in placement order.
    pub ignored: Vec<IgnoredGlyph>,
}

enum State {
    Building(BTreeMap<u32, GlyphRecord>),
    Finalized(BuildOutput),
}

/// Builder for PBF font containers.
///
/// Collect glyphs with [`add_glyph`](Self::add_glyph), then call
/// [`build`](Self::build) once. After building the builder is finalized:
/// further glyphs are rejected and later `build` calls return the first
/// result unchanged, whatever encoding they ask for.
///
/// ```
/// use pbfkit::font::{Encoding, GlyphRecord, PbfBuilder};
///
/// let mut builder = PbfBuilder::new(14, 0x25AF);
/// builder.add_glyph(0x25AF, GlyphRecord::from_rows(&["#"], 0, 0, 2)?)?;
/// builder.add_glyph('A' as u32, GlyphRecord::from_rows(&[" # ", "###", "# #"], 0, 2, 4)?)?;
/// let out = builder.build(Encoding::Auto)?;
/// assert!(out.ignored.is_empty());
/// # Ok::<(), pbfkit::CodecError>(())
/// ```
pub struct PbfBuilder {
    max_height: u8,
    wildcard: u16,
    state: State,
}

impl PbfBuilder {
    /// `max_height` is the font's line height; `wildcard` is the codepoint
    /// drawn in place of any glyph the font lacks.
    pub fn new(max_height: u8, wildcard: u16) -> Self {
        Self {
            max_height,
            wildcard,
            state: State::Building(BTreeMap::new()),
        }
    }

    pub fn wildcard(&self) -> u16 {
        self.wildcard
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, State::Finalized(_))
    }

    /// Add or replace the glyph for `codepoint`.
    pub fn add_glyph(&mut self, codepoint: u32, record: GlyphRecord) -> Result<(), CodecError> {
        match &mut self.state {
            State::Building(glyphs) => {
                glyphs.insert(codepoint, record);
                Ok(())
            }
            State::Finalized(_) => Err(CodecError::Finalized),
        }
    }

    /// Rasterize and add each codepoint, returning those the source lacks.
    pub fn add_from_source<S, I>(
        &mut self,
        source: &S,
        codepoints: I,
        pixel_size: u32,
    ) -> Result<Vec<u32>, CodecError>
    where
        S: GlyphSource + ?Sized,
        I: IntoIterator<Item = u32>,
    {
        let mut unsupported = Vec::new();
        for codepoint in codepoints {
            match source.rasterize(codepoint, pixel_size) {
                Some(raster) => {
                    let record = GlyphRecord::from_raster(&raster).map_err(|e| {
                        CodecError::InvalidData(format!("codepoint {codepoint}: {e}"))
                    })?;
                    self.add_glyph(codepoint, record)?;
                }
                None => unsupported.push(codepoint),
            }
        }
        Ok(unsupported)
    }

    /// Serialize the font and finalize the builder.
    pub fn build(&mut self, encoding: Encoding) -> Result<BuildOutput, CodecError> {
        let glyphs = match &self.state {
            State::Finalized(out) => return Ok(out.clone()),
            State::Building(glyphs) => glyphs,
        };

        let order = placement_order(glyphs, self.wildcard)?;
        let wildcard = u32::from(self.wildcard);

        let (tables, compressed) = match encoding {
            Encoding::Compressed => {
                let packed = build_tables(&order, true)?;
                if !packed.places(wildcard) {
                    return Err(CodecError::CapacityOverflow(format!(
                        "wildcard glyph U+{wildcard:04X} needs more than {} runs to compress",
                        rle::MAX_UNITS
                    )));
                }
                (packed, true)
            }
            Encoding::Uncompressed => (build_tables(&order, false)?, false),
            Encoding::Auto => {
                let raw = build_tables(&order, false)?;
                let packed = build_tables(&order, true)?;
                log::debug!(
                    "glyph table: {} bytes raw, {} bytes compressed",
                    raw.glyph_table.len(),
                    packed.glyph_table.len()
                );
                // A compressed pass without the wildcard is never usable.
                if packed.places(wildcard) && packed.glyph_table.len() < raw.glyph_table.len() {
                    (packed, true)
                } else {
                    (raw, false)
                }
            }
        };

        for ignored in &tables.ignored {
            log::warn!(
                "ignoring glyph U+{:04X}: {:?}",
                ignored.codepoint,
                ignored.reason
            );
        }

        let bytes = self.assemble(&tables, compressed);
        log::debug!(
            "built font: {} glyphs, {} bytes, compressed: {compressed}",
            tables.glyph_count,
            bytes.len()
        );

        let out = BuildOutput {
            bytes,
            compressed,
            ignored: tables.ignored,
        };
        self.state = State::Finalized(out.clone());
        Ok(out)
    }

    fn assemble(&self, tables: &Tables, compressed: bool) -> Vec<u8> {
        let mut out = ByteWriter::with_capacity(
            HEADER_SIZE
                + tables.hash_table.len()
                + tables.offset_table.len()
                + tables.glyph_table.len(),
        );
        out.write_u8(FORMAT_VERSION);
        out.write_u8(self.max_height);
        out.write_u16_le(tables.glyph_count);
        out.write_u16_le(self.wildcard);
        out.write_u8(HASH_TABLE_SIZE as u8);
        out.write_u8(tables.codepoint_width);
        out.write_u8(HEADER_SIZE as u8);

        let mut features = 0;
        if tables.offset_width == 2 {
            features |= FEATURE_OFFSET_U16;
        }
        if compressed {
            features |= FEATURE_COMPRESSED;
        }
        out.write_u8(features);

        out.extend_from_slice(&tables.hash_table);
        out.extend_from_slice(&tables.offset_table);
        out.extend_from_slice(&tables.glyph_table);
        out.into_vec()
    }
}

/// Glyphs by ascending codepoint, with the wildcard moved to the front.
fn placement_order(
    glyphs: &BTreeMap<u32, GlyphRecord>,
    wildcard: u16,
) -> Result<Vec<(u32, &GlyphRecord)>, CodecError> {
    let wildcard = u32::from(wildcard);
    let first = glyphs
        .get(&wildcard)
        .ok_or(CodecError::MissingWildcard(wildcard))?;
    let mut order = Vec::with_capacity(glyphs.len());
    order.push((wildcard, first));
    order.extend(
        glyphs
            .iter()
            .filter(|&(&cp, _)| cp != wildcard)
            .map(|(&cp, g)| (cp, g)),
    );
    Ok(order)
}

struct Tables {
    ignored: Vec<IgnoredGlyph>,
    codepoint_width: u8,
    offset_width: u8,
    glyph_count: u16,
    hash_table: Vec<u8>,
    offset_table: Vec<u8>,
    glyph_table: Vec<u8>,
}

impl Tables {
    fn places(&self, codepoint: u32) -> bool {
        !self.ignored.iter().any(|g| g.codepoint == codepoint)
    }
}

/// One complete layout pass. Pure over `order`, so the raw and compressed
/// passes share nothing.
fn build_tables(order: &[(u32, &GlyphRecord)], compressed: bool) -> Result<Tables, CodecError> {
    let mut buckets: Vec<Vec<(u32, u32)>> = (0..HASH_TABLE_SIZE).map(|_| Vec::new()).collect();
    let mut glyph_table = ByteWriter::new();
    let mut ignored = Vec::new();
    let mut codepoint_width = 2;
    let mut offset_width = 2;
    let mut glyph_count: usize = 0;

    for &(codepoint, glyph) in order {
        let bucket = &mut buckets[bucket_of(codepoint)];
        if bucket.len() >= BUCKET_CAPACITY {
            ignored.push(IgnoredGlyph {
                codepoint,
                reason: IgnoreReason::BucketFull,
            });
            continue;
        }

        let runs = if compressed {
            match rle::compress(&glyph.bits) {
                Some(runs) => Some(runs),
                None => {
                    ignored.push(IgnoredGlyph {
                        codepoint,
                        reason: IgnoreReason::TooManyRuns,
                    });
                    continue;
                }
            }
        } else {
            None
        };

        let offset = u32::try_from(glyph_table.len()).map_err(|_| {
            CodecError::CapacityOverflow(format!("glyph table exceeds {} bytes", u32::MAX))
        })?;
        if offset > u32::from(u16::MAX) {
            offset_width = 4;
        }
        if codepoint > u32::from(u16::MAX) {
            codepoint_width = 4;
        }
        bucket.push((codepoint, offset));
        glyph_count += 1;

        match runs {
            Some(runs) => {
                glyph_table.write_u8(glyph.width);
                glyph_table.write_u8(runs.units);
                glyph_table.write_i8(glyph.left);
                glyph_table.write_i8(glyph.top);
                glyph_table.write_i8(glyph.advance);
                glyph_table.extend_from_slice(&runs.bytes);
            }
            None => {
                glyph_table.write_u8(glyph.width);
                glyph_table.write_u8(glyph.height);
                glyph_table.write_i8(glyph.left);
                glyph_table.write_i8(glyph.top);
                glyph_table.write_i8(glyph.advance);
                glyph_table.extend_from_slice(&pack_bits(&glyph.bits));
            }
        }
    }

    let glyph_count = u16::try_from(glyph_count).map_err(|_| {
        CodecError::CapacityOverflow(format!("{glyph_count} glyphs exceed the u16 glyph count"))
    })?;

    let mut offset_table = ByteWriter::new();
    let mut hash_table = ByteWriter::with_capacity(HASH_TABLE_SIZE * HASH_ENTRY_SIZE);
    for (index, bucket) in buckets.iter().enumerate() {
        let slice_offset = u16::try_from(offset_table.len()).map_err(|_| {
            CodecError::CapacityOverflow(format!(
                "offset table slice for bucket {index} starts past 65535 bytes"
            ))
        })?;
        hash_table.write_u8(index as u8);
        hash_table.write_u8(bucket.len() as u8);
        hash_table.write_u16_le(slice_offset);

        for &(codepoint, offset) in bucket {
            offset_table.write_uint_le(codepoint, codepoint_width);
            offset_table.write_uint_le(offset, offset_width);
        }
    }

    Ok(Tables {
        ignored,
        codepoint_width,
        offset_width,
        glyph_count,
        hash_table: hash_table.into_vec(),
        offset_table: offset_table.into_vec(),
        glyph_table: glyph_table.into_vec(),
    })
}

/// Pack pixels LSB-first into one continuous bitstream; rows are not byte aligned.
fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = alloc::vec![0u8; bits.len().div_ceil(8)];
    for (i, _) in bits.iter().enumerate().filter(|&(_, &set)| set) {
        out[i / 8] |= 1 << (i % 8);
    }
    out
}
