#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // PBF font: one raw 1x1 wildcard glyph at '*'
    let mut font = vec![3u8, 8, 1, 0, b'*', 0, 255, 2, 10, 0x01];
    for bucket in 0..255u8 {
        let count = u8::from(bucket == b'*');
        let slice: u16 = if bucket <= b'*' { 0 } else { 4 };
        font.extend_from_slice(&[bucket, count]);
        font.extend_from_slice(&slice.to_le_bytes());
    }
    font.extend_from_slice(&[b'*', 0, 0, 0]); // codepoint, glyph offset
    font.extend_from_slice(&[1, 1, 0, 0, 2, 0x01]);
    fs::write(format!("{dir}/font_1glyph.pbf"), &font).unwrap();

    // Same font flagged as run-length compressed: one run of one set pixel
    let mut compressed = font.clone();
    compressed[9] |= 0x02;
    let n = compressed.len();
    compressed[n - 1] = 0x08;
    fs::write(format!("{dir}/font_1glyph_rle.pbf"), &compressed).unwrap();

    // Empty user pack: no files, crc of nothing is 0xFFFFFFFF
    let mut pack = vec![0u8; 12 + 256 * 16];
    pack[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    fs::write(format!("{dir}/pack_empty_user.pbl"), &pack).unwrap();

    // Empty system pack
    let mut pack = vec![0u8; 12 + 512 * 16];
    pack[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    fs::write(format!("{dir}/pack_empty_system.pbl"), &pack).unwrap();

    println!("Generated seed corpus in {dir}/");
}
