//! Glyph records consumed by the encoder, and the rasterizer contract.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::CodecError;

/// One glyph's metrics and 1-bit bitmap, as stored by [`PbfBuilder`](super::PbfBuilder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRecord {
    pub(crate) width: u8,
    pub(crate) height: u8,
    pub(crate) left: i8,
    pub(crate) top: i8,
    pub(crate) advance: i8,
    pub(crate) bits: Vec<bool>,
}

impl GlyphRecord {
    /// Create a record from a row-major bitmap of `width * height` cells.
    pub fn new(
        width: u8,
        height: u8,
        left: i8,
        top: i8,
        advance: i8,
        bits: Vec<bool>,
    ) -> Result<Self, CodecError> {
        let cells = usize::from(width) * usize::from(height);
        if bits.len() != cells {
            return Err(CodecError::InvalidData(format!(
                "bitmap has {} cells, expected {width}x{height} = {cells}",
                bits.len()
            )));
        }
        Ok(Self {
            width,
            height,
            left,
            top,
            advance,
            bits,
        })
    }

    /// A glyph with no pixels that only advances the pen, e.g. a space.
    pub fn blank(advance: i8) -> Self {
        Self {
            width: 0,
            height: 0,
            left: 0,
            top: 0,
            advance,
            bits: Vec::new(),
        }
    }

    /// Build a record from text rows where `#` is a set pixel.
    ///
    /// Width is the longest row; shorter rows are padded with blank cells.
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        left: i8,
        top: i8,
        advance: i8,
    ) -> Result<Self, CodecError> {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let width = u8::try_from(width)
            .map_err(|_| CodecError::InvalidData(format!("glyph width {width} exceeds 255")))?;
        let height = u8::try_from(rows.len()).map_err(|_| {
            CodecError::InvalidData(format!("glyph height {} exceeds 255", rows.len()))
        })?;

        let mut bits = Vec::with_capacity(usize::from(width) * usize::from(height));
        for row in rows {
            let start = bits.len();
            bits.extend(row.as_ref().chars().map(|c| c == '#'));
            bits.resize(start + usize::from(width), false);
        }
        Self::new(width, height, left, top, advance, bits)
    }

    /// Convert rasterizer output, checking that metrics fit their byte fields.
    pub fn from_raster(raster: &RasterGlyph) -> Result<Self, CodecError> {
        let metric = |name: &str, v: i32| {
            i8::try_from(v)
                .map_err(|_| CodecError::InvalidData(format!("{name} {v} out of range for i8")))
        };
        Self::from_rows(
            &raster.rows,
            metric("left", raster.left)?,
            metric("top", raster.top)?,
            metric("advance", raster.advance)?,
        )
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn left(&self) -> i8 {
        self.left
    }

    pub fn top(&self) -> i8 {
        self.top
    }

    pub fn advance(&self) -> i8 {
        self.advance
    }

    /// Row-major pixels, `width * height` long.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

/// Output of an outline-font rasterizer for one codepoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterGlyph {
    /// Bitmap rows, `#` for a set pixel and space for a blank one.
    pub rows: Vec<String>,
    pub top: i32,
    pub left: i32,
    pub advance: i32,
}

/// A source of rasterized glyphs, typically backed by an outline font.
pub trait GlyphSource {
    /// Rasterize `codepoint` at `pixel_size`, or `None` if the font lacks it.
    fn rasterize(&self, codepoint: u32, pixel_size: u32) -> Option<RasterGlyph>;
}

impl<F> GlyphSource for F
where
    F: Fn(u32, u32) -> Option<RasterGlyph>,
{
    fn rasterize(&self, codepoint: u32, pixel_size: u32) -> Option<RasterGlyph> {
        self(codepoint, pixel_size)
    }
}
