//! Deterministic font service and shaper for pipeline tests.
//!
//! Font 1 covers ASCII, font 2 covers Hebrew, Arabic and the space. Fonts 3
//! and 4 cover the same characters as 1 and 2 and become the defaults when
//! `prefer_serif` is set. Every glyph id is the character's code point.
//! Visible glyphs are 8x8 with a bearing of 1 and advance 10; white space
//! advances 10 with no ink. Every font has ascender 8 and descender -2.

#![allow(dead_code)]

use quill_text::{
    FontId, FontMetrics, FontService, GlyphId, GlyphInfo, PointSize26Dot6, Script, ShapedGlyph,
    Shaper, DEFAULT_POINT_SIZE,
};

pub const LATIN_FONT: FontId = 1;
pub const RTL_FONT: FontId = 2;
pub const SERIF_FONT: FontId = 3;
pub const RTL_SERIF_FONT: FontId = 4;
pub const ELLIPSIS_GLYPH: GlyphId = 0x2026;

fn is_rtl(c: char) -> bool {
    matches!(c as u32, 0x0590..=0x06FF)
}

fn covers(font_id: FontId, c: char) -> bool {
    match font_id {
        LATIN_FONT | SERIF_FONT => c.is_ascii(),
        RTL_FONT | RTL_SERIF_FONT => is_rtl(c) || c == ' ',
        _ => false,
    }
}

#[derive(Debug, Default)]
pub struct FakeFonts {
    pub fallback_queries: usize,
    pub prefer_serif: bool,
}

impl FakeFonts {
    pub fn new() -> Self {
        Self::default()
    }
}

fn measure(glyph: &mut GlyphInfo) {
    let ink = glyph.index > 0x20;
    if ink {
        glyph.width = 8.0;
        glyph.height = 8.0;
        glyph.x_bearing += 1.0;
        glyph.y_bearing += 8.0;
    }
    if glyph.advance == 0.0 {
        glyph.advance = 10.0;
    }
}

impl FontService for FakeFonts {
    fn find_default_font(&mut self, character: char, _: PointSize26Dot6, _: bool) -> FontId {
        match (is_rtl(character), self.prefer_serif) {
            (true, false) => RTL_FONT,
            (true, true) => RTL_SERIF_FONT,
            (false, false) => LATIN_FONT,
            (false, true) => SERIF_FONT,
        }
    }

    fn find_fallback_font(
        &mut self,
        _: FontId,
        character: char,
        point_size: PointSize26Dot6,
        prefer_color: bool,
    ) -> FontId {
        self.fallback_queries += 1;
        self.find_default_font(character, point_size, prefer_color)
    }

    fn point_size(&self, _: FontId) -> PointSize26Dot6 {
        DEFAULT_POINT_SIZE
    }

    fn glyph_index(&self, font_id: FontId, character: char) -> GlyphId {
        if covers(font_id, character) {
            character as GlyphId
        } else {
            0
        }
    }

    fn glyph_metrics(&mut self, glyphs: &mut [GlyphInfo], horizontal: bool) -> bool {
        if !horizontal {
            return false;
        }
        glyphs
            .iter_mut()
            .filter(|glyph| glyph.font_id != 0)
            .for_each(measure);
        true
    }

    fn font_metrics(&self, _: FontId) -> FontMetrics {
        FontMetrics {
            ascender: 8.0,
            descender: -2.0,
            height: 10.0,
            underline_position: -1.0,
            underline_thickness: 1.0,
        }
    }

    fn ellipsis_glyph(&mut self, _: PointSize26Dot6) -> GlyphInfo {
        let mut glyph = GlyphInfo::new(LATIN_FONT, ELLIPSIS_GLYPH);
        measure(&mut glyph);
        glyph
    }
}

/// One glyph per character in logical order.
#[derive(Debug, Default)]
pub struct FakeShaper {
    pub calls: Vec<(String, FontId, Script)>,
}

impl Shaper for FakeShaper {
    fn shape(&mut self, text: &[char], font_id: FontId, script: Script) -> Vec<ShapedGlyph> {
        self.calls.push((text.iter().collect(), font_id, script));
        text.iter()
            .enumerate()
            .map(|(character_index, &c)| {
                let mut glyph = GlyphInfo::new(font_id, c as GlyphId);
                glyph.advance = 10.0;
                glyph.scale_factor = 1.0;
                ShapedGlyph {
                    glyph,
                    character_index,
                }
            })
            .collect()
    }
}
