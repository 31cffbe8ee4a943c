use crate::error::CodecError;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum glyph count declared by a font header.
    pub max_glyphs: Option<u64>,
    /// Maximum file count declared by a pack manifest.
    pub max_resources: Option<u64>,
    /// Maximum pixel count (width * height) of a single decoded glyph.
    pub max_glyph_pixels: Option<u64>,
    /// Maximum input size for fonts, and total distinct content bytes for packs.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    #[cfg(feature = "font")]
    pub(crate) fn check_glyphs(&self, count: u32) -> Result<(), CodecError> {
        if let Some(max) = self.max_glyphs {
            if u64::from(count) > max {
                return Err(CodecError::LimitExceeded(alloc::format!(
                    "glyph count {count} exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }

    #[cfg(feature = "pack")]
    pub(crate) fn check_resources(&self, count: u32) -> Result<(), CodecError> {
        if let Some(max) = self.max_resources {
            if u64::from(count) > max {
                return Err(CodecError::LimitExceeded(alloc::format!(
                    "resource count {count} exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }

    /// Check the dimensions of a glyph about to be expanded.
    #[cfg(feature = "font")]
    pub(crate) fn check_glyph(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if let Some(max_px) = self.max_glyph_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(CodecError::LimitExceeded(alloc::format!(
                    "glyph {width}x{height} ({pixels} pixels) exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), CodecError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(CodecError::LimitExceeded(alloc::format!(
                    "{bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}
