use crate::segmentation::{LineBreakInfo, WordBreakInfo};
use crate::types::{
    BidirectionalLineInfoRun, CharacterDirection, CharacterIndex, GlyphIndex, GlyphInfo, Length,
};

use super::Size;

/// Everything the layout engine reads, borrowed from the models.
///
/// `character_directions` may be empty, meaning all text is left to right.
/// `characters_to_glyphs`, `glyphs_per_character` and
/// `line_bidirectional_info` are only needed to re-lay out right to left
/// lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutParameters<'a> {
    pub bounding_box: Size,
    pub text: &'a [char],
    pub line_break_info: &'a [LineBreakInfo],
    pub word_break_info: &'a [WordBreakInfo],
    pub character_directions: &'a [CharacterDirection],
    pub glyphs: &'a [GlyphInfo],
    pub glyphs_to_characters: &'a [CharacterIndex],
    pub characters_per_glyph: &'a [Length],
    pub characters_to_glyphs: &'a [GlyphIndex],
    pub glyphs_per_character: &'a [Length],
    pub line_bidirectional_info: &'a [BidirectionalLineInfoRun],
    /// Whether the text ends with a new paragraph character.
    pub is_last_new_paragraph: bool,
}

impl LayoutParameters<'_> {
    pub(crate) fn direction(&self, index: CharacterIndex) -> CharacterDirection {
        self.character_directions.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn line_break(&self, index: CharacterIndex) -> LineBreakInfo {
        self.line_break_info
            .get(index)
            .copied()
            .unwrap_or(LineBreakInfo::MustBreak)
    }

    pub(crate) fn word_break(&self, index: CharacterIndex) -> WordBreakInfo {
        self.word_break_info
            .get(index)
            .copied()
            .unwrap_or(WordBreakInfo::Break)
    }
}
