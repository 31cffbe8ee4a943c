//! Word-oriented CRC-32 used by the resource pack format.
//!
//! This is the checksum the device computes with its CRC peripheral, not the
//! zlib/PNG CRC-32. It uses polynomial `0x04C11DB7` shifted MSB-first, starts
//! the register at `0xFFFFFFFF`, and never complements the result. Input is
//! consumed in 4-byte little-endian words, so each word's bytes enter the
//! register last-to-first. A trailing partial word of `k` bytes is fed as
//! `4 - k` zero bytes followed by its `k` bytes in order.
//!
//! Do not substitute a generic CRC-32 here; existing packs depend on these
//! exact values.

const POLY: u32 = 0x04C1_1DB7;
const INIT: u32 = 0xFFFF_FFFF;

static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            r = if r & 0x8000_0000 != 0 {
                (r << 1) ^ POLY
            } else {
                r << 1
            };
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

#[inline]
fn feed(crc: u32, byte: u8) -> u32 {
    (crc << 8) ^ TABLE[((crc >> 24) as u8 ^ byte) as usize]
}

fn feed_word(mut crc: u32, word: &[u8]) -> u32 {
    if let &[a, b, c, d] = word {
        for byte in [d, c, b, a] {
            crc = feed(crc, byte);
        }
        return crc;
    }
    let mut padded = [0u8; 4];
    for (i, &byte) in word.iter().enumerate() {
        padded[word.len() - 1 - i] = byte;
    }
    for &byte in padded.iter().rev() {
        crc = feed(crc, byte);
    }
    crc
}

/// Checksum `data` from the initial register value.
///
/// ```
/// assert_eq!(pbfkit::crc32(&[]), 0xFFFF_FFFF);
/// assert_eq!(pbfkit::crc32(&[0, 0, 0, 0]), 0xC704_DD7B);
/// ```
pub fn crc32(data: &[u8]) -> u32 {
    crc32_update(INIT, data)
}

/// Continue a checksum from a previous register value.
///
/// Every call starts a fresh word, so splitting input at an offset that is
/// not a multiple of four gives a different result than one call over the
/// whole buffer.
pub fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    data.chunks(4).fold(crc, feed_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_polynomial() {
        assert_eq!(TABLE[0], 0);
        assert_eq!(TABLE[1], POLY);
        assert_eq!(TABLE[255], 0xB1F7_40B4);
    }

    #[test]
    fn empty_input_returns_seed() {
        assert_eq!(crc32(&[]), 0xFFFF_FFFF);
        assert_eq!(crc32_update(0x1234_5678, &[]), 0x1234_5678);
    }

    #[test]
    fn fixed_vectors() {
        assert_eq!(crc32(&[0, 0, 0, 0]), 0xC704_DD7B);
        assert_eq!(crc32(&[1, 2, 3, 4]), 0x1DAB_E74F);
        assert_eq!(crc32(b"abcd"), 0xA62F_1C36);
        assert_eq!(crc32(b"123456789"), 0xAFF1_9057);
        assert_eq!(crc32(b"0123456789"), 0xF55D_C95F);
    }

    #[test]
    fn partial_words_are_zero_padded_in_front() {
        assert_eq!(crc32(&[0x01]), 0xC3C5_C0CC);
        assert_eq!(crc32(&[0x01, 0x02]), 0x1C9F_27C9);
        assert_eq!(crc32(b"a"), 0x6F60_065B);
        // [1] is fed 0, 0, 0, 1, the same path as the full word [1, 0, 0, 0].
        assert_eq!(crc32(&[0x01]), crc32(&[0x01, 0, 0, 0]));
        assert_eq!(crc32(&[0x01, 0x02]), crc32(&[0x02, 0x01, 0, 0]));
    }

    #[test]
    fn word_bytes_enter_last_to_first() {
        // A full word is fed d, c, b, a; a whole-word reversal of input is not a no-op.
        assert_ne!(crc32(&[1, 2, 3, 4]), crc32(&[4, 3, 2, 1]));
        let manual = [4u8, 3, 2, 1].iter().fold(INIT, |c, &b| feed(c, b));
        assert_eq!(crc32(&[1, 2, 3, 4]), manual);
    }

    #[test]
    fn update_carries_register_across_aligned_calls() {
        let whole = crc32(b"98765432100123456789");
        let split = crc32_update(crc32(b"98765432"), b"100123456789");
        assert_eq!(whole, split);
        assert_eq!(whole, 0x8784_0079);
    }
}
