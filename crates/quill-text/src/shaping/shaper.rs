use harfrust::{
    Direction as HbDirection,
    FontRef as HbFontRef,
    Script as HbScript,
    ShaperData,
    ShaperInstance,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};
use tracing::warn;

use crate::font::FontFace;
use crate::types::{FontId, GlyphInfo};
use crate::unicode::Script;

use super::ShapedGlyph;

/// Shape one chunk of text with harfrust (pure-Rust HarfBuzz port).
///
/// The chunk is expected to share a single font and script. Glyphs are
/// returned in logical order; right to left output is reversed back after
/// shaping. Character indices are relative to the chunk.
pub fn shape_with_face(
    face: &FontFace,
    font_id: FontId,
    font_size: f32,
    text: &[char],
    script: Script,
) -> Vec<ShapedGlyph> {
    let utf8: String = text.iter().collect();
    let char_starts: Vec<usize> = utf8.char_indices().map(|(offset, _)| offset).collect();

    let font_data = face.as_bytes();
    let font_ref = match HbFontRef::from_index(&font_data, face.index() as u32) {
        Ok(font_ref) => font_ref,
        Err(err) => {
            warn!(?err, font_id, "harfrust rejected font data; emitting missing glyphs");
            return missing_glyphs(text.len(), font_id);
        }
    };

    // Shaper configuration with default (no variations) instance.
    let data = ShaperData::new(&font_ref);
    let instance =
        ShaperInstance::from_variations(&font_ref, core::iter::empty::<harfrust::Variation>());
    let shaper = data
        .shaper(&font_ref)
        .instance(Some(&instance))
        .point_size(None)
        .build();

    let rtl = script.is_right_to_left();
    let mut buffer = HbUnicodeBuffer::new();
    buffer.push_str(&utf8);
    buffer.set_direction(if rtl {
        HbDirection::RightToLeft
    } else {
        HbDirection::LeftToRight
    });
    if let Some(tag) = script.iso15924_tag() {
        if let Some(hb_script) = HbScript::from_iso15924_tag(HbTag::new(tag)) {
            buffer.set_script(hb_script);
        }
    }
    // Let harfrust fill in any remaining segment properties.
    buffer.guess_segment_properties();

    let glyph_buffer = shaper.shape(buffer, &[]);
    let infos = glyph_buffer.glyph_infos();
    let positions = glyph_buffer.glyph_positions();

    // harfrust uses design units.
    let scale = face.metrics().scale(font_size);

    let mut glyphs: Vec<ShapedGlyph> = infos
        .iter()
        .zip(positions.iter())
        .map(|(info, pos)| {
            let character_index = match char_starts.binary_search(&(info.cluster as usize)) {
                Ok(index) => index,
                Err(index) => index.saturating_sub(1),
            };
            let mut glyph = GlyphInfo::new(font_id, info.glyph_id);
            glyph.advance = pos.x_advance as f32 * scale;
            glyph.x_bearing = pos.x_offset as f32 * scale;
            glyph.y_bearing = pos.y_offset as f32 * scale;
            glyph.scale_factor = 1.0;
            ShapedGlyph {
                glyph,
                character_index,
            }
        })
        .collect();

    if rtl {
        glyphs.reverse();
    }
    glyphs
}

/// One missing glyph per character, used when a font cannot be shaped.
pub(crate) fn missing_glyphs(count: usize, font_id: FontId) -> Vec<ShapedGlyph> {
    (0..count)
        .map(|character_index| ShapedGlyph {
            glyph: GlyphInfo::new(font_id, 0),
            character_index,
        })
        .collect()
}
