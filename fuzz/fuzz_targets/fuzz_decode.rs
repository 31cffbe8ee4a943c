#![no_main]
use libfuzzer_sys::fuzz_target;
use pbfkit::Limits;
use pbfkit::font::PbfFont;
use pbfkit::pack::{PackVariant, ResourcePack};

fuzz_target!(|data: &[u8]| {
    // Fonts: parsing and decoding every indexed glyph must never panic
    let limits = Limits {
        max_glyph_pixels: Some(1 << 16),
        ..Default::default()
    };
    if let Ok(font) = PbfFont::parse_with_limits(data, &limits) {
        for (_, glyph) in font.glyphs() {
            if let Ok(glyph) = glyph {
                let _ = glyph.to_text();
            }
        }
        let _ = font.read_or_wildcard(0x10FFFF);
    }

    // Packs: each variant explicitly, then with fallback
    let limits = Limits {
        max_memory_bytes: Some(16 << 20),
        ..Default::default()
    };
    for variant in [PackVariant::User, PackVariant::System] {
        if let Ok(pack) = ResourcePack::decode_with_limits(data, variant, &limits) {
            let _ = pack.manifest_crc_matches();
            assert_eq!(pack.resources().count(), pack.len());
        }
    }
    let _ = ResourcePack::decode_any(data);
});
