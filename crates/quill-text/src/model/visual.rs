use palette::Srgba;

use crate::layout::{Point, Size};
use crate::types::{
    CharacterIndex, GlyphIndex, GlyphInfo, GlyphRun, Length, LineIndex, LineRun,
};

fn black() -> Srgba {
    Srgba::new(0.0, 0.0, 0.0, 1.0)
}

/// Glyphs, their positions and the laid-out lines, plus the style values
/// passed through to the renderer.
#[derive(Debug, Clone)]
pub struct VisualModel {
    pub glyphs: Vec<GlyphInfo>,
    /// First character of each glyph.
    pub glyphs_to_characters: Vec<CharacterIndex>,
    /// First glyph of each character.
    pub characters_to_glyph: Vec<GlyphIndex>,
    pub characters_per_glyph: Vec<Length>,
    pub glyphs_per_character: Vec<Length>,
    pub glyph_positions: Vec<Point>,
    pub lines: Vec<LineRun>,
    pub underline_runs: Vec<GlyphRun>,
    /// Size of the box the text was last laid out in.
    pub control_size: Size,
    natural_size: Size,
    actual_size: Size,
    text_color: Srgba,
    shadow_color: Srgba,
    underline_color: Srgba,
    shadow_offset: Point,
    underline_height: f32,
    underline_enabled: bool,
    underline_color_set: bool,
    cached_line_index: LineIndex,
}

impl Default for VisualModel {
    fn default() -> Self {
        Self {
            glyphs: Vec::new(),
            glyphs_to_characters: Vec::new(),
            characters_to_glyph: Vec::new(),
            characters_per_glyph: Vec::new(),
            glyphs_per_character: Vec::new(),
            glyph_positions: Vec::new(),
            lines: Vec::new(),
            underline_runs: Vec::new(),
            control_size: Size::zero(),
            natural_size: Size::zero(),
            actual_size: Size::zero(),
            text_color: black(),
            shadow_color: black(),
            underline_color: black(),
            shadow_offset: Point::zero(),
            underline_height: 0.0,
            underline_enabled: false,
            underline_color_set: false,
            cached_line_index: 0,
        }
    }
}

impl VisualModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `glyphs_per_character` from `characters_per_glyph`.
    ///
    /// The glyphs of a ligature belong to its last character; the other
    /// characters get zero glyphs. Glyphs with no character are counted on
    /// the next character that has one.
    pub fn create_glyphs_per_character_table(&mut self) {
        self.glyphs_per_character.clear();
        self.glyphs_per_character
            .reserve(self.characters_per_glyph.len());

        let mut zero_characters_per_glyph = 0;
        for &characters in &self.characters_per_glyph {
            if characters == 0 {
                zero_characters_per_glyph += 1;
                continue;
            }
            self.glyphs_per_character
                .extend(std::iter::repeat_n(0, characters - 1));
            self.glyphs_per_character.push(1 + zero_characters_per_glyph);
            zero_characters_per_glyph = 0;
        }
    }

    /// Build `characters_to_glyph`. Needs `glyphs_per_character`.
    pub fn create_character_to_glyph_table(&mut self) {
        debug_assert!(
            !self.glyphs_per_character.is_empty() || self.characters_per_glyph.is_empty(),
            "glyphs per character table missing"
        );

        self.characters_to_glyph.clear();
        let mut glyph_index = 0;
        let mut character_index = 0;

        for &characters in &self.characters_per_glyph {
            let mut number_of_glyphs = 0;
            for _ in 0..characters {
                self.characters_to_glyph.push(glyph_index);
                number_of_glyphs += self
                    .glyphs_per_character
                    .get(character_index)
                    .copied()
                    .unwrap_or(0);
                character_index += 1;
            }
            glyph_index += number_of_glyphs;
        }
    }

    /// First line and number of lines holding any glyph of the range.
    pub fn number_of_lines(
        &self,
        glyph_index: GlyphIndex,
        number_of_glyphs: Length,
    ) -> (LineIndex, Length) {
        let last_glyph_index = glyph_index + number_of_glyphs;
        let mut first_line = 0;
        let mut number_of_lines = 0;

        for line in &self.lines {
            if line.glyph_run.end() > glyph_index && last_glyph_index > line.glyph_run.glyph_index {
                number_of_lines += 1;
            } else if last_glyph_index <= line.glyph_run.glyph_index {
                break;
            } else if number_of_lines == 0 {
                first_line += 1;
            }
        }

        (first_line, number_of_lines)
    }

    /// Lines holding any glyph of the range.
    pub fn lines_of_glyph_range(&self, glyph_index: GlyphIndex, number_of_glyphs: Length) -> &[LineRun] {
        let (first_line, number_of_lines) = self.number_of_lines(glyph_index, number_of_glyphs);
        &self.lines[first_line..first_line + number_of_lines]
    }

    /// Line holding the character. Returns the number of lines when no
    /// line does.
    ///
    /// The last line found is cached, so walking the text in order is
    /// cheap.
    pub fn line_of_character(&mut self, character_index: CharacterIndex) -> LineIndex {
        if let Some(line) = self.lines.get(self.cached_line_index) {
            if line.character_run.contains(character_index) {
                return self.cached_line_index;
            }
        }

        let start = match self.lines.get(self.cached_line_index) {
            Some(line) if character_index >= line.character_run.character_index => {
                self.cached_line_index + 1
            }
            _ => 0,
        };

        for (index, line) in self.lines.iter().enumerate().skip(start) {
            if character_index < line.character_run.end() {
                self.cached_line_index = index;
                return index;
            }
        }

        self.lines.len()
    }

    pub fn clear_caches(&mut self) {
        self.cached_line_index = 0;
    }

    /// Drop glyphs, tables and lines.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.glyphs_to_characters.clear();
        self.characters_to_glyph.clear();
        self.characters_per_glyph.clear();
        self.glyphs_per_character.clear();
        self.glyph_positions.clear();
        self.lines.clear();
        self.underline_runs.clear();
        self.natural_size = Size::zero();
        self.actual_size = Size::zero();
        self.cached_line_index = 0;
    }

    pub fn set_natural_size(&mut self, size: Size) {
        self.natural_size = size;
    }

    pub fn natural_size(&self) -> Size {
        self.natural_size
    }

    pub fn set_actual_size(&mut self, size: Size) {
        self.actual_size = size;
    }

    pub fn actual_size(&self) -> Size {
        self.actual_size
    }

    /// The underline follows the text color until it is set explicitly.
    pub fn set_text_color(&mut self, color: Srgba) {
        self.text_color = color;
        if !self.underline_color_set {
            self.underline_color = color;
        }
    }

    pub fn text_color(&self) -> Srgba {
        self.text_color
    }

    pub fn set_shadow_offset(&mut self, offset: Point) {
        self.shadow_offset = offset;
    }

    pub fn shadow_offset(&self) -> Point {
        self.shadow_offset
    }

    pub fn set_shadow_color(&mut self, color: Srgba) {
        self.shadow_color = color;
    }

    pub fn shadow_color(&self) -> Srgba {
        self.shadow_color
    }

    pub fn set_underline_color(&mut self, color: Srgba) {
        self.underline_color = color;
        self.underline_color_set = true;
    }

    pub fn underline_color(&self) -> Srgba {
        self.underline_color
    }

    pub fn set_underline_enabled(&mut self, enabled: bool) {
        self.underline_enabled = enabled;
    }

    pub fn is_underline_enabled(&self) -> bool {
        self.underline_enabled
    }

    pub fn set_underline_height(&mut self, height: f32) {
        self.underline_height = height;
    }

    pub fn underline_height(&self) -> f32 {
        self.underline_height
    }
}
