//! Index aliases and the run records shared by every pipeline stage.

use crate::unicode::Script;

/// Logical index of a character within the text buffer.
pub type CharacterIndex = usize;
/// Index of a glyph within the shaped glyph array.
pub type GlyphIndex = usize;
/// Index of a laid-out line.
pub type LineIndex = usize;
/// A number of characters, glyphs or lines.
pub type Length = usize;
/// Opaque font handle handed out by a [`FontService`](crate::font::FontService).
/// Zero means "no font".
pub type FontId = u32;
/// Glyph index within a font. Zero is the missing glyph.
pub type GlyphId = u32;
/// Point size in 26.6 fixed point (points * 64).
pub type PointSize26Dot6 = u32;
/// Handle to a paragraph analysed by [`BidirectionalSupport`](crate::bidi::BidirectionalSupport).
pub type BidiInfoIndex = usize;
/// Per-character direction: `false` is left to right, `true` right to left.
pub type CharacterDirection = bool;

/// Right to left direction value.
pub const RTL: CharacterDirection = true;

/// Point size used when no font provides one (12pt).
pub const DEFAULT_POINT_SIZE: PointSize26Dot6 = 768;

/// Half-open range of characters `[character_index, character_index + number_of_characters)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterRun {
    pub character_index: CharacterIndex,
    pub number_of_characters: Length,
}

impl CharacterRun {
    pub fn new(character_index: CharacterIndex, number_of_characters: Length) -> Self {
        Self {
            character_index,
            number_of_characters,
        }
    }

    /// Index one past the last character of the run.
    pub fn end(&self) -> CharacterIndex {
        self.character_index + self.number_of_characters
    }

    pub fn contains(&self, index: CharacterIndex) -> bool {
        index >= self.character_index && index < self.end()
    }
}

/// Half-open range of glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphRun {
    pub glyph_index: GlyphIndex,
    pub number_of_glyphs: Length,
}

impl GlyphRun {
    pub fn new(glyph_index: GlyphIndex, number_of_glyphs: Length) -> Self {
        Self {
            glyph_index,
            number_of_glyphs,
        }
    }

    pub fn end(&self) -> GlyphIndex {
        self.glyph_index + self.number_of_glyphs
    }
}

/// Characters sharing one resolved script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun {
    pub character_run: CharacterRun,
    pub script: Script,
}

/// Characters rendered with one font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontRun {
    pub character_run: CharacterRun,
    pub font_id: FontId,
    /// Whether the font was chosen by the validator rather than the application.
    pub is_default: bool,
}

impl FontRun {
    pub fn new(character_run: CharacterRun, font_id: FontId) -> Self {
        Self {
            character_run,
            font_id,
            is_default: false,
        }
    }
}

/// A laid-out line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineRun {
    pub glyph_run: GlyphRun,
    pub character_run: CharacterRun,
    /// Width of the line, bearings included, trailing white space excluded
    /// (except on the last line).
    pub width: f32,
    /// Maximum ascender of the fonts in the line.
    pub ascender: f32,
    /// Minimum descender of the fonts in the line (negative below the baseline).
    pub descender: f32,
    /// Length of the trailing white space.
    pub extra_length: f32,
    /// Horizontal offset computed by the alignment pass.
    pub alignment_offset: f32,
    /// Direction of the paragraph the line belongs to.
    pub direction: CharacterDirection,
    /// Whether the line was cut to fit and must end with an ellipsis glyph.
    pub ellipsis: bool,
}

impl LineRun {
    /// `ascender - descender`.
    pub fn height(&self) -> f32 {
        self.ascender - self.descender
    }
}

/// A paragraph containing right to left script, with its analysed bidi state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidirectionalParagraphInfoRun {
    pub character_run: CharacterRun,
    pub bidirectional_info_index: BidiInfoIndex,
    pub direction: CharacterDirection,
}

/// Visual order of one laid-out line of a bidirectional paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidirectionalLineInfoRun {
    pub character_run: CharacterRun,
    /// For each visual position, the logical index relative to the line's first character.
    pub visual_to_logical_map: Vec<CharacterIndex>,
    pub direction: CharacterDirection,
}

/// Glyph metrics as produced by shaping and the font service.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphInfo {
    pub font_id: FontId,
    pub index: GlyphId,
    pub width: f32,
    pub height: f32,
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub advance: f32,
    pub scale_factor: f32,
}

impl GlyphInfo {
    pub fn new(font_id: FontId, index: GlyphId) -> Self {
        Self {
            font_id,
            index,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_run_bounds() {
        let run = CharacterRun::new(3, 4);
        assert_eq!(run.end(), 7);
        assert!(run.contains(3));
        assert!(run.contains(6));
        assert!(!run.contains(7));
        assert!(!run.contains(2));
    }

    #[test]
    fn line_height_uses_negative_descender() {
        let line = LineRun {
            ascender: 10.0,
            descender: -4.0,
            ..Default::default()
        };
        assert_eq!(line.height(), 14.0);
    }
}
