//! Text shaping glue.
//!
//! The text is cut into chunks that share one font, one script and one
//! paragraph, and each chunk is handed to a [`Shaper`]. The results are
//! concatenated into the glyph array plus the glyph to character tables.

pub mod shaper;

pub use shaper::shape_with_face;

use tracing::trace;

use crate::segmentation::LineBreakInfo;
use crate::types::{CharacterIndex, FontId, FontRun, GlyphIndex, GlyphInfo, Length, ScriptRun};
use crate::unicode::{is_new_paragraph, Script};

/// A glyph produced by shaping a chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph: GlyphInfo,
    /// First character of the cluster, relative to the chunk.
    pub character_index: CharacterIndex,
}

/// Converts characters to positioned glyph ids for a single font and script.
pub trait Shaper {
    /// Shape `text` and return its glyphs in logical order.
    fn shape(&mut self, text: &[char], font_id: FontId, script: Script) -> Vec<ShapedGlyph>;
}

/// Output of [`shape_text`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedText {
    pub glyphs: Vec<GlyphInfo>,
    pub glyphs_to_characters: Vec<CharacterIndex>,
    pub characters_per_glyph: Vec<Length>,
    /// Glyphs shaped from new paragraph characters.
    pub new_paragraph_glyphs: Vec<GlyphIndex>,
}

/// Shape the whole text.
///
/// Chunks end at font run, script run and mandatory line break boundaries.
pub fn shape_text(
    shaper: &mut dyn Shaper,
    text: &[char],
    line_breaks: &[LineBreakInfo],
    scripts: &[ScriptRun],
    fonts: &[FontRun],
) -> ShapedText {
    let mut shaped = ShapedText::default();
    if text.is_empty() {
        return shaped;
    }

    let mut font_index = 0;
    let mut script_index = 0;
    let mut previous = 0;

    while previous < text.len() {
        while font_index < fonts.len() && fonts[font_index].character_run.end() <= previous {
            font_index += 1;
        }
        while script_index < scripts.len()
            && scripts[script_index].character_run.end() <= previous
        {
            script_index += 1;
        }

        let (font_id, font_end) = fonts
            .get(font_index)
            .map(|run| (run.font_id, run.character_run.end()))
            .unwrap_or((0, text.len()));
        let (script, script_end) = scripts
            .get(script_index)
            .map(|run| (run.script, run.character_run.end()))
            .unwrap_or((Script::Latin, text.len()));

        let mut end = font_end.min(script_end).min(text.len());
        let mut ends_paragraph = false;
        let breaks = line_breaks.get(previous..end).unwrap_or(&[]);
        if let Some(offset) = breaks.iter().position(|b| *b == LineBreakInfo::MustBreak) {
            end = previous + offset + 1;
            ends_paragraph = is_new_paragraph(text[end - 1]);
        }

        trace!(previous, end, font_id, ?script, "shaping chunk");
        let glyphs = shaper.shape(&text[previous..end], font_id, script);
        let produced = !glyphs.is_empty();
        for glyph in glyphs {
            shaped.glyphs.push(glyph.glyph);
            shaped
                .glyphs_to_characters
                .push(previous + glyph.character_index);
        }

        if ends_paragraph && produced {
            shaped.new_paragraph_glyphs.push(shaped.glyphs.len() - 1);
        }

        previous = end;
    }

    let count = shaped.glyphs_to_characters.len();
    shaped.characters_per_glyph = (0..count)
        .map(|index| {
            let next = shaped
                .glyphs_to_characters
                .get(index + 1)
                .copied()
                .unwrap_or(text.len());
            next.saturating_sub(shaped.glyphs_to_characters[index])
        })
        .collect();

    shaped
}
