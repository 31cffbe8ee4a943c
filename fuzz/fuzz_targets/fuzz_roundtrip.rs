#![no_main]
use libfuzzer_sys::fuzz_target;
use pbfkit::font::{Encoding, GlyphRecord, PbfBuilder, PbfFont};
use pbfkit::pack::{PackVariant, ResourcePack, ResourcePackBuilder};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    // Packs: split the input into resources and expect them back verbatim
    let resources: Vec<&[u8]> = rest.split(|&b| b == selector).collect();
    let variant = if selector & 1 == 0 {
        PackVariant::User
    } else {
        PackVariant::System
    };
    let mut builder = ResourcePackBuilder::new(variant);
    for r in &resources {
        builder.add_resource(*r).unwrap();
    }
    if let Ok(bytes) = builder.serialize() {
        let pack = ResourcePack::decode(&bytes, variant).expect("serialized pack failed to decode");
        assert!(pack.manifest_crc_matches());
        assert_eq!(pack.resources().collect::<Vec<_>>(), resources);
    }

    // Fonts: one glyph per resource, bitmap taken from its bytes
    let mut font = PbfBuilder::new(16, 0);
    font.add_glyph(0, GlyphRecord::blank(1)).unwrap();
    let mut expected = Vec::new();
    for (i, r) in resources.iter().enumerate().take(64) {
        let width = r.first().map_or(0, |b| b % 17);
        let bits: Vec<bool> = r
            .iter()
            .flat_map(|b| (0..8).map(move |bit| b >> bit & 1 != 0))
            .collect();
        let height = if width == 0 { 0 } else { (bits.len() / width as usize).min(16) };
        let cells = width as usize * height;
        let glyph = GlyphRecord::new(width, height as u8, 0, 0, 1, bits[..cells].to_vec()).unwrap();
        let codepoint = 1 + i as u32 * 97;
        expected.push((codepoint, glyph.clone()));
        font.add_glyph(codepoint, glyph).unwrap();
    }
    let out = font.build(Encoding::Uncompressed).unwrap();
    let parsed = PbfFont::parse(&out.bytes).expect("built font failed to parse");
    for (cp, glyph) in expected {
        let decoded = parsed.read(cp).unwrap();
        assert_eq!(decoded.pixels(), glyph.bits(), "glyph roundtrip mismatch");
    }
});
