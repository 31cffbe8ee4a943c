//! 4-bit run-length coding of 1-bit glyph bitmaps.
//!
//! Each run is one nibble: bit 3 holds the pixel value, bits 0-2 hold the
//! run length minus one, so runs are 1..=8 pixels. Two runs share a byte,
//! the even run in the low nibble. Trailing blank runs are not stored, and
//! the glyph header keeps the run count instead of the height, so decoding
//! recovers only as many rows as the stored runs cover.

use alloc::format;
use alloc::vec::Vec;

use crate::error::CodecError;

const MAX_RUN: u8 = 8;

/// Run count is stored in a single byte.
pub(crate) const MAX_UNITS: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    bit: bool,
    len: u8,
}

impl Run {
    // A missing odd run packs as bit 0, length 1: a zero nibble.
    const PAD: Run = Run { bit: false, len: 1 };

    fn nibble(self) -> u8 {
        (u8::from(self.bit) << 3) | (self.len - 1)
    }

    fn from_nibble(n: u8) -> Self {
        Run {
            bit: n & 0x08 != 0,
            len: (n & 0x07) + 1,
        }
    }
}

/// A glyph bitmap in packed run form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedBitmap {
    /// Number of runs, at most 255.
    pub units: u8,
    /// `ceil(units / 2)` packed bytes.
    pub bytes: Vec<u8>,
}

/// Run-length encode `bits`, or `None` if more than 255 runs are needed.
pub fn compress(bits: &[bool]) -> Option<CompressedBitmap> {
    let mut runs: Vec<Run> = Vec::new();
    for &bit in bits {
        match runs.last_mut() {
            Some(run) if run.bit == bit && run.len < MAX_RUN => run.len += 1,
            _ => runs.push(Run { bit, len: 1 }),
        }
    }

    while runs.last().is_some_and(|r| !r.bit) {
        runs.pop();
    }

    if runs.len() > MAX_UNITS {
        return None;
    }

    let bytes = runs
        .chunks(2)
        .map(|pair| {
            let lo = pair[0];
            let hi = pair.get(1).copied().unwrap_or(Run::PAD);
            (hi.nibble() << 4) | lo.nibble()
        })
        .collect();

    Some(CompressedBitmap {
        units: runs.len() as u8,
        bytes,
    })
}

/// Expand `units` packed runs into a flat bit string.
///
/// Fails if `packed` holds fewer than `ceil(units / 2)` bytes.
pub fn expand(packed: &[u8], units: u8) -> Result<Vec<bool>, CodecError> {
    let needed = usize::from(units).div_ceil(2);
    let packed = packed.get(..needed).ok_or_else(|| {
        CodecError::InvalidData(format!(
            "{units} runs need {needed} bytes, have {}",
            packed.len()
        ))
    })?;

    let mut bits = Vec::with_capacity(usize::from(units) * usize::from(MAX_RUN));
    for i in 0..usize::from(units) {
        let byte = packed[i / 2];
        let nibble = if i % 2 == 0 { byte & 0x0F } else { byte >> 4 };
        let run = Run::from_nibble(nibble);
        bits.extend(core::iter::repeat_n(run.bit, usize::from(run.len)));
    }
    Ok(bits)
}

/// Expand packed runs and re-wrap them into rows of `width` pixels.
///
/// The last row is padded with blank pixels. The number of rows returned is
/// the glyph's decoded height and may be smaller than the height it was
/// encoded with.
pub fn decompress(packed: &[u8], units: u8, width: u8) -> Result<Vec<Vec<bool>>, CodecError> {
    let bits = expand(packed, units)?;
    if bits.is_empty() {
        return Ok(Vec::new());
    }
    if width == 0 {
        return Err(CodecError::InvalidData(format!(
            "zero-width glyph carries {units} runs"
        )));
    }
    Ok(bits
        .chunks(usize::from(width))
        .map(|row| {
            let mut row = row.to_vec();
            row.resize(usize::from(width), false);
            row
        })
        .collect())
}

/// Bits of a glyph after a compress/decompress cycle: trailing blanks dropped.
#[cfg(test)]
fn trimmed(bits: &[bool]) -> Vec<bool> {
    let end = bits.iter().rposition(|&b| b).map_or(0, |i| i + 1);
    bits[..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '#').collect()
    }

    #[test]
    fn packs_two_runs_per_byte_low_nibble_first() {
        // runs: (1,#x3) (0,x2) (1,#x1)
        let c = compress(&bits("###  #")).unwrap();
        assert_eq!(c.units, 3);
        // byte0: hi = blank x2 -> 0b0001, lo = set x3 -> 0b1010
        // byte1: hi = pad -> 0, lo = set x1 -> 0b1000
        assert_eq!(c.bytes, vec![0x1A, 0x08]);
    }

    #[test]
    fn runs_cap_at_eight() {
        let c = compress(&[true; 10]).unwrap();
        assert_eq!(c.units, 2);
        assert_eq!(c.bytes, vec![(0x08 | 1) << 4 | (0x08 | 7)]);
        assert_eq!(expand(&c.bytes, c.units).unwrap(), vec![true; 10]);
    }

    #[test]
    fn trailing_blank_runs_are_dropped() {
        let c = compress(&bits("#         ")).unwrap();
        assert_eq!(c.units, 1);
        assert_eq!(c.bytes, vec![0x08]);

        let blank = compress(&[false; 40]).unwrap();
        assert_eq!(blank.units, 0);
        assert!(blank.bytes.is_empty());
    }

    #[test]
    fn leading_blank_runs_are_kept() {
        let input = bits("           #");
        let c = compress(&input).unwrap();
        assert_eq!(c.units, 3);
        assert_eq!(expand(&c.bytes, c.units).unwrap(), input);
    }

    #[test]
    fn too_many_runs_fails() {
        let alternating: Vec<bool> = (0..256).map(|i| i % 2 == 0).collect();
        assert!(compress(&alternating).is_none());

        let fits: Vec<bool> = (0..255).map(|i| i % 2 == 0).collect();
        assert_eq!(compress(&fits).unwrap().units, 255);
    }

    #[test]
    fn expand_reproduces_input_up_to_last_set_pixel() {
        let patterns = [
            "# # ## ###     ##########   #",
            "  ####  ####    ",
            "#",
            "",
            "        ",
            "################ #",
        ];
        for p in patterns {
            let input = bits(p);
            let c = compress(&input).unwrap();
            let out = expand(&c.bytes, c.units).unwrap();
            assert!(out.len() <= input.len());
            assert_eq!(out, trimmed(&input), "pattern {p:?}");
        }
    }

    #[test]
    fn decompress_recovers_fewer_rows_when_bottom_is_blank() {
        // 3x4 glyph whose last two rows are blank
        let input = bits("# ## #      ");
        let c = compress(&input).unwrap();
        let rows = decompress(&c.bytes, c.units, 3).unwrap();
        assert_eq!(rows, vec![bits("# #"), bits("# #")]);
    }

    #[test]
    fn decompress_pads_partial_last_row() {
        let input = bits("####      ");
        let c = compress(&input).unwrap();
        let rows = decompress(&c.bytes, c.units, 3).unwrap();
        assert_eq!(rows, vec![bits("###"), bits("#  ")]);
    }

    #[test]
    fn decompress_rejects_short_buffer_and_zero_width() {
        assert!(decompress(&[0x88], 3, 4).is_err());
        assert!(decompress(&[0x08], 1, 0).is_err());
        assert!(decompress(&[], 0, 0).unwrap().is_empty());
    }
}
