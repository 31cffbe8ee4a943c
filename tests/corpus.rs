//! Test corpus: roundtrips over generated glyph patterns and pack layouts.

#![cfg(all(feature = "font", feature = "pack"))]

use pbfkit::font::*;
use pbfkit::pack::*;

const WILDCARD: u16 = 0x25AF;

fn checkerboard(w: u8, h: u8) -> Vec<bool> {
    let mut bits = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        for x in 0..w {
            bits.push((x + y) % 2 == 0);
        }
    }
    bits
}

fn noise_pattern(w: u8, h: u8, seed: u32) -> Vec<bool> {
    let mut state: u32 = 0xDEAD_BEEF ^ seed;
    (0..w as usize * h as usize)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state & 1 != 0
        })
        .collect()
}

fn stripes(w: u8, h: u8) -> Vec<bool> {
    let mut bits = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        for _ in 0..w {
            bits.push(y % 3 != 1);
        }
    }
    bits
}

/// Rows a compressed font stores for `bits`: trailing blank pixels are
/// dropped and the last row is padded back out to `width`.
fn compressed_view(bits: &[bool], width: u8) -> Vec<bool> {
    let end = bits.iter().rposition(|&b| b).map_or(0, |p| p + 1);
    let mut out = bits[..end].to_vec();
    if width > 0 {
        out.resize(end.div_ceil(width as usize) * width as usize, false);
    }
    out
}

fn corpus() -> Vec<(u32, GlyphRecord)> {
    let mut glyphs = vec![(
        WILDCARD as u32,
        GlyphRecord::new(6, 9, 0, 0, 7, vec![true; 54]).unwrap(),
    )];
    let sizes = [(1, 1), (2, 7), (5, 5), (8, 3), (9, 13), (12, 12), (15, 2)];
    let mut cp = 0x21;
    for (i, &(w, h)) in sizes.iter().enumerate() {
        for (j, bits) in [checkerboard(w, h), noise_pattern(w, h, cp), stripes(w, h)]
            .into_iter()
            .enumerate()
        {
            let top = (i + j) as i8 - 3;
            glyphs.push((cp, GlyphRecord::new(w, h, 1, top, w as i8 + 1, bits).unwrap()));
            cp += 1;
        }
    }
    glyphs.push((' ' as u32 + 0x3000, GlyphRecord::blank(12)));
    glyphs
}

fn build(glyphs: &[(u32, GlyphRecord)], encoding: Encoding) -> BuildOutput {
    let mut builder = PbfBuilder::new(16, WILDCARD);
    for (cp, g) in glyphs {
        builder.add_glyph(*cp, g.clone()).unwrap();
    }
    builder.build(encoding).unwrap()
}

// ── Font roundtrips ──────────────────────────────────────────────────

#[test]
fn pattern_corpus_uncompressed() {
    let glyphs = corpus();
    let out = build(&glyphs, Encoding::Uncompressed);
    assert!(out.ignored.is_empty());

    let font = PbfFont::parse(&out.bytes).unwrap();
    for (cp, g) in &glyphs {
        let d = font.read(*cp).unwrap();
        assert_eq!((d.width, d.height), (g.width() as u32, g.height() as u32));
        assert_eq!(d.pixels(), g.bits(), "U+{cp:04X}");
    }
}

#[test]
fn pattern_corpus_compressed() {
    let glyphs = corpus();
    let out = build(&glyphs, Encoding::Compressed);
    assert!(out.ignored.is_empty());

    let font = PbfFont::parse(&out.bytes).unwrap();
    for (cp, g) in &glyphs {
        let d = font.read(*cp).unwrap();
        let expected = compressed_view(g.bits(), g.width());
        assert_eq!(d.width, g.width() as u32);
        assert!(d.height <= g.height() as u32);
        assert_eq!(d.pixels(), &expected[..], "U+{cp:04X}");
        assert_eq!((d.left, d.top, d.advance), (g.left(), g.top(), g.advance()));
    }
}

#[test]
fn auto_matches_one_forced_encoding() {
    let glyphs = corpus();
    let auto = build(&glyphs, Encoding::Auto);
    let forced = build(
        &glyphs,
        if auto.compressed {
            Encoding::Compressed
        } else {
            Encoding::Uncompressed
        },
    );
    assert_eq!(auto.bytes, forced.bytes);

    let other = build(
        &glyphs,
        if auto.compressed {
            Encoding::Uncompressed
        } else {
            Encoding::Compressed
        },
    );
    assert!(auto.bytes.len() <= other.bytes.len());
}

#[test]
fn every_glyph_decodes_through_iterator() {
    let glyphs = corpus();
    let out = build(&glyphs, Encoding::Auto);
    let font = PbfFont::parse(&out.bytes).unwrap();

    let mut expected: Vec<u32> = glyphs.iter().map(|(cp, _)| *cp).collect();
    expected.sort_unstable();
    let decoded: Vec<u32> = font
        .glyphs()
        .map(|(cp, g)| {
            g.unwrap();
            cp
        })
        .collect();
    assert_eq!(decoded, expected);
}

// ── Fonts inside packs ───────────────────────────────────────────────

#[test]
fn fonts_roundtrip_through_a_pack() {
    let glyphs = corpus();
    let raw = build(&glyphs, Encoding::Uncompressed).bytes;
    let packed = build(&glyphs, Encoding::Compressed).bytes;

    let mut builder = ResourcePackBuilder::new(PackVariant::User).with_timestamp(42);
    builder.add_resource(raw.clone()).unwrap();
    builder.add_resource(packed.clone()).unwrap();
    builder.add_resource(raw.clone()).unwrap();
    let bytes = builder.serialize().unwrap();
    assert_eq!(
        bytes.len(),
        PackVariant::User.content_start() + raw.len() + packed.len()
    );

    let pack = ResourcePack::decode(&bytes, PackVariant::User).unwrap();
    assert_eq!(pack.contents().len(), 2);
    for resource in pack.resources() {
        let font = PbfFont::parse(resource).unwrap();
        assert_eq!(font.len(), glyphs.len());
        assert!(font.read_or_wildcard(0x10FFFF).is_ok());
    }
    assert!(!PbfFont::parse(pack.resource(0).unwrap()).unwrap().is_compressed());
    assert!(PbfFont::parse(pack.resource(1).unwrap()).unwrap().is_compressed());
}

#[test]
fn noise_resources_roundtrip_in_both_variants() {
    let resources: Vec<Vec<u8>> = (0..40u32)
        .map(|i| {
            let len = (i * 37 % 101) as u8;
            let bits = noise_pattern(len, 8, i % 7);
            bits.chunks(8)
                .map(|c| c.iter().fold(0u8, |acc, &b| acc << 1 | u8::from(b)))
                .collect()
        })
        .collect();

    for variant in [PackVariant::User, PackVariant::System] {
        let mut builder = ResourcePackBuilder::new(variant);
        for r in &resources {
            builder.add_resource(r.clone()).unwrap();
        }
        let bytes = builder.serialize().unwrap();

        let pack = ResourcePack::decode(&bytes, variant).unwrap();
        assert!(pack.manifest_crc_matches());
        let decoded: Vec<&[u8]> = pack.resources().collect();
        let expected: Vec<&[u8]> = resources.iter().map(Vec::as_slice).collect();
        assert_eq!(decoded, expected, "{variant}");
    }
}
