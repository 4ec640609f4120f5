use tracing::{debug, trace};

use crate::font::FontService;
use crate::segmentation::{LineBreakInfo, WordBreakInfo};
use crate::types::{
    CharacterDirection, CharacterIndex, FontId, GlyphIndex, GlyphInfo, Length, LineRun, RTL,
};
use crate::unicode::is_white_space;

use super::{HorizontalAlignment, Layout, LayoutParameters, Point, Size, VerticalAlignment};

const CURSOR_WIDTH: f32 = 1.0;

/// Temporary layout of a line while its glyphs are being collected.
#[derive(Debug, Clone, Copy)]
struct LineLayout {
    /// First glyph of the line.
    glyph_index: GlyphIndex,
    /// First character of the line.
    character_index: CharacterIndex,
    number_of_glyphs: Length,
    number_of_characters: Length,
    /// Sum of the advances of the glyphs that fit.
    length: f32,
    /// Added when the first glyph has a negative bearing.
    extra_bearing: f32,
    /// Added when the last glyph's bearing plus width exceeds its advance.
    extra_width: f32,
    /// Length of the white space at the end of the line.
    ws_length_end_of_line: f32,
    ascender: f32,
    descender: f32,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            glyph_index: 0,
            character_index: 0,
            number_of_glyphs: 0,
            number_of_characters: 0,
            length: 0.0,
            extra_bearing: 0.0,
            extra_width: 0.0,
            ws_length_end_of_line: 0.0,
            ascender: 0.0,
            descender: f32::MAX,
        }
    }
}

impl LineLayout {
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append a temporary layout to this one.
    fn merge(&mut self, other: &LineLayout) {
        self.number_of_characters += other.number_of_characters;
        self.number_of_glyphs += other.number_of_glyphs;
        self.length += other.length;

        if other.length > 0.0 {
            // White space between the two parts now sits inside the line.
            self.length += self.ws_length_end_of_line;
            self.ws_length_end_of_line = other.ws_length_end_of_line;
        } else {
            self.ws_length_end_of_line += other.ws_length_end_of_line;
        }

        self.ascender = self.ascender.max(other.ascender);
        self.descender = self.descender.min(other.descender);
    }

    /// Raise the ascender and lower the descender to fit `font_id`.
    fn update_line_height(&mut self, metrics: &dyn FontService, font_id: FontId) {
        let font_metrics = metrics.font_metrics(font_id);
        self.ascender = self.ascender.max(font_metrics.ascender);
        self.descender = self.descender.min(font_metrics.descender);
    }
}

fn extra_bearing(glyph: &GlyphInfo) -> f32 {
    if glyph.x_bearing < 0.0 {
        -glyph.x_bearing
    } else {
        0.0
    }
}

fn extra_width(glyph: &GlyphInfo) -> f32 {
    (glyph.x_bearing + glyph.width - glyph.advance).max(0.0)
}

/// Lays glyphs out on lines inside a box and aligns them.
///
/// The first pass works in logical order as if all text were left to
/// right; [`re_layout_right_to_left_lines`](Self::re_layout_right_to_left_lines)
/// then fixes the x positions of lines holding right to left text once their
/// visual order is known.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    layout: Layout,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    cursor_width: f32,
    ellipsis_enabled: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            layout: Layout::SingleLineBox,
            horizontal_alignment: HorizontalAlignment::Begin,
            vertical_alignment: VerticalAlignment::Top,
            cursor_width: CURSOR_WIDTH,
            ellipsis_enabled: false,
        }
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.horizontal_alignment = alignment;
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.vertical_alignment = alignment;
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    /// Room reserved at the end of each line for the text cursor.
    pub fn set_cursor_width(&mut self, width: f32) {
        self.cursor_width = width;
    }

    pub fn cursor_width(&self) -> f32 {
        self.cursor_width
    }

    pub fn set_text_ellipsis_enabled(&mut self, enabled: bool) {
        self.ellipsis_enabled = enabled;
    }

    pub fn text_ellipsis_enabled(&self) -> bool {
        self.ellipsis_enabled
    }

    /// Collect the glyphs of the line starting at `line_layout.glyph_index`.
    ///
    /// `paragraph_direction` is updated to the next paragraph's direction
    /// when the line ends at a mandatory break. With `completely_fill` the
    /// line takes as many glyphs as fit even when that splits a word.
    fn get_line_layout_for_box(
        &self,
        parameters: &LayoutParameters<'_>,
        metrics: &dyn FontService,
        line_layout: &mut LineLayout,
        paragraph_direction: &mut CharacterDirection,
        completely_fill: bool,
    ) {
        let mut tmp_line_layout = LineLayout::default();
        let is_multiline = self.layout == Layout::MultiLineBox;
        let total_number_of_glyphs = parameters.glyphs.len();
        let last_glyph_index = total_number_of_glyphs - 1;

        let first_glyph = &parameters.glyphs[line_layout.glyph_index];
        line_layout.character_index = parameters.glyphs_to_characters[line_layout.glyph_index];
        let first_character_direction = parameters.direction(line_layout.character_index);
        let mut previous_character_direction = first_character_direction;

        let mut tmp_extra_width = extra_width(first_glyph);
        let mut tmp_extra_bearing = extra_bearing(first_glyph);

        tmp_line_layout.length += self.cursor_width;

        // Height of the line even if no glyph fits.
        let mut last_font_id = first_glyph.font_id;
        tmp_line_layout.update_line_height(metrics, last_font_id);

        let mut one_word_laid_out = false;

        for glyph_index in line_layout.glyph_index..total_number_of_glyphs {
            let is_last_glyph = glyph_index == last_glyph_index;
            let glyph = &parameters.glyphs[glyph_index];

            if last_font_id != glyph.font_id {
                tmp_line_layout.update_line_height(metrics, glyph.font_id);
                last_font_id = glyph.font_id;
            }

            // Break info of a ligature is given by its last character.
            let characters_per_glyph = parameters.characters_per_glyph[glyph_index];
            let character_first_index = parameters.glyphs_to_characters[glyph_index];
            let character_last_index = character_first_index + characters_per_glyph.saturating_sub(1);

            let line_break = parameters.line_break(character_last_index);
            let word_break = parameters.word_break(character_last_index);

            tmp_line_layout.number_of_characters += characters_per_glyph;
            tmp_line_layout.number_of_glyphs += 1;

            let is_white_space = parameters
                .text
                .get(character_first_index)
                .is_some_and(|c| is_white_space(*c));

            // Restored when a word that does not fit is split by glyph.
            let previous_tmp_line_length = tmp_line_layout.length;
            let previous_tmp_extra_bearing = tmp_extra_bearing;
            let previous_tmp_extra_width = tmp_extra_width;

            let character_direction = parameters.direction(character_first_index);

            if is_white_space {
                // White space has no width; its advance is what counts.
                tmp_line_layout.ws_length_end_of_line += glyph.advance;
            } else {
                tmp_line_layout.length += tmp_line_layout.ws_length_end_of_line + glyph.advance;

                // The first glyph's negative bearing and the last glyph's
                // overflow widen the line, depending on which end of the
                // line each glyph sits visually.
                if character_direction == *paragraph_direction {
                    if character_direction == RTL {
                        tmp_extra_bearing = extra_bearing(glyph);
                    } else {
                        tmp_extra_width = extra_width(glyph);
                    }
                } else if character_direction != previous_character_direction {
                    if character_direction == RTL {
                        tmp_extra_width = extra_width(glyph);
                    } else {
                        tmp_extra_bearing = extra_bearing(glyph);
                    }
                } else if character_direction == first_character_direction {
                    if character_direction == RTL {
                        tmp_extra_bearing = extra_bearing(glyph);
                    } else {
                        tmp_extra_width = extra_width(glyph);
                    }
                }

                tmp_line_layout.ws_length_end_of_line = 0.0;
            }

            let line_width = tmp_extra_bearing
                + line_layout.length
                + line_layout.ws_length_end_of_line
                + tmp_line_layout.length
                + tmp_extra_width;

            if (completely_fill || is_multiline)
                && !is_white_space
                && line_width > parameters.bounding_box.width
            {
                if !one_word_laid_out || completely_fill {
                    trace!(glyph_index, "word split by glyph");
                    if tmp_line_layout.number_of_glyphs > 0 {
                        tmp_line_layout.number_of_characters -= characters_per_glyph;
                        tmp_line_layout.number_of_glyphs -= 1;
                        tmp_line_layout.length = previous_tmp_line_length;
                        tmp_extra_bearing = previous_tmp_extra_bearing;
                        tmp_extra_width = previous_tmp_extra_width;
                    }
                    line_layout.merge(&tmp_line_layout);
                }

                line_layout.extra_bearing = tmp_extra_bearing;
                line_layout.extra_width = tmp_extra_width;
                return;
            }

            if (is_multiline || is_last_glyph) && line_break == LineBreakInfo::MustBreak {
                line_layout.merge(&tmp_line_layout);

                if !is_last_glyph && !parameters.character_directions.is_empty() {
                    *paragraph_direction = parameters.direction(character_last_index + 1);
                }

                line_layout.extra_bearing = tmp_extra_bearing;
                line_layout.extra_width = tmp_extra_width;
                return;
            }

            if is_multiline && word_break == WordBreakInfo::Break {
                one_word_laid_out = true;
                line_layout.merge(&tmp_line_layout);
                tmp_line_layout.clear();
            }

            previous_character_direction = character_direction;
        }

        // Text not terminated by a mandatory break.
        line_layout.merge(&tmp_line_layout);
        line_layout.extra_bearing = tmp_extra_bearing;
        line_layout.extra_width = tmp_extra_width;
    }

    /// Position `glyphs` on a baseline at `pen_y`.
    fn set_glyph_positions(glyphs: &[GlyphInfo], pen_y: f32, positions: &mut [Point]) {
        let Some(first) = glyphs.first() else {
            return;
        };

        // A negative bearing on the first glyph would cross the box edge.
        let mut pen_x = extra_bearing(first);

        for (glyph, position) in glyphs.iter().zip(positions.iter_mut()) {
            position.x = pen_x + glyph.x_bearing;
            position.y = pen_y - glyph.y_bearing;
            pen_x += glyph.advance;
        }
    }

    /// Lay the glyphs out in lines that fit `parameters.bounding_box`.
    ///
    /// `glyph_positions` is resized to the number of glyphs; `lines` and
    /// `actual_size` are replaced. Returns `false` if the box is too narrow
    /// to hold a single glyph on a line.
    pub fn layout_text(
        &self,
        parameters: &LayoutParameters<'_>,
        metrics: &dyn FontService,
        glyph_positions: &mut Vec<Point>,
        lines: &mut Vec<LineRun>,
        actual_size: &mut Size,
    ) -> bool {
        let total_number_of_glyphs = parameters.glyphs.len();
        debug!(
            glyphs = total_number_of_glyphs,
            width = parameters.bounding_box.width,
            height = parameters.bounding_box.height,
            "layout text"
        );

        lines.clear();
        *actual_size = Size::zero();
        glyph_positions.clear();
        glyph_positions.resize(total_number_of_glyphs, Point::zero());

        let mut paragraph_direction = parameters.direction(0);
        let mut pen_y = 0.0;
        let mut index = 0;

        while index < total_number_of_glyphs {
            let current_paragraph_direction = paragraph_direction;

            let mut layout = LineLayout {
                glyph_index: index,
                ..Default::default()
            };
            self.get_line_layout_for_box(
                parameters,
                metrics,
                &mut layout,
                &mut paragraph_direction,
                false,
            );

            trace!(
                glyph_index = layout.glyph_index,
                character_index = layout.character_index,
                glyphs = layout.number_of_glyphs,
                characters = layout.number_of_characters,
                length = layout.length,
                "line"
            );

            if layout.number_of_glyphs == 0 {
                debug!("box too narrow to lay out a glyph");
                return false;
            }

            pen_y += layout.ascender;

            let exceeds_height = pen_y - layout.descender > parameters.bounding_box.height;
            let exceeds_width = self.layout == Layout::SingleLineBox
                && layout.extra_bearing + layout.length + layout.extra_width
                    > parameters.bounding_box.width;

            if self.ellipsis_enabled && (exceeds_height || exceeds_width) {
                // No more lines: the last one is filled completely, even if
                // that splits a word, and ends with an ellipsis.
                let mut line_run = LineRun::default();
                let mut ellipsis_layout = LineLayout::default();

                if let Some(last) = lines.last() {
                    line_run = *last;
                    pen_y -= layout.ascender - line_run.descender;
                    actual_size.height -= line_run.height();
                    ellipsis_layout.glyph_index = line_run.glyph_run.glyph_index;
                }

                let mut direction = current_paragraph_direction;
                self.get_line_layout_for_box(
                    parameters,
                    metrics,
                    &mut ellipsis_layout,
                    &mut direction,
                    true,
                );

                if ellipsis_layout.number_of_glyphs == 0 {
                    debug!("box too narrow for the ellipsis line");
                    return false;
                }

                line_run.glyph_run.number_of_glyphs = ellipsis_layout.number_of_glyphs;
                line_run.character_run.character_index = ellipsis_layout.character_index;
                line_run.character_run.number_of_characters = ellipsis_layout.number_of_characters;
                line_run.width = ellipsis_layout.length;
                line_run.extra_length = if ellipsis_layout.ws_length_end_of_line > 0.0 {
                    ellipsis_layout.ws_length_end_of_line - ellipsis_layout.extra_width
                } else {
                    0.0
                };
                line_run.ascender = ellipsis_layout.ascender;
                line_run.descender = ellipsis_layout.descender;
                line_run.direction = !RTL;
                line_run.ellipsis = true;

                actual_size.width = parameters.bounding_box.width;
                actual_size.height += line_run.height();

                let start = line_run.glyph_run.glyph_index;
                let end = start + ellipsis_layout.number_of_glyphs;
                Self::set_glyph_positions(
                    &parameters.glyphs[start..end],
                    pen_y,
                    &mut glyph_positions[start..end],
                );

                match lines.last_mut() {
                    Some(last) => *last = line_run,
                    None => lines.push(line_run),
                }
                debug!(lines = lines.len(), "text elided");
                break;
            }

            let is_last_line = index + layout.number_of_glyphs == total_number_of_glyphs;

            let mut line_run = LineRun::default();
            line_run.glyph_run.glyph_index = index;
            line_run.glyph_run.number_of_glyphs = layout.number_of_glyphs;
            line_run.character_run.character_index = layout.character_index;
            line_run.character_run.number_of_characters = layout.number_of_characters;

            if is_last_line && !parameters.is_last_new_paragraph {
                let width = layout.extra_bearing
                    + layout.length
                    + layout.extra_width
                    + layout.ws_length_end_of_line;
                line_run.width = if self.layout == Layout::MultiLineBox {
                    width.min(parameters.bounding_box.width)
                } else {
                    width
                };
                line_run.extra_length = 0.0;
            } else {
                line_run.width = layout.extra_bearing + layout.length + layout.extra_width;
                line_run.extra_length = if layout.ws_length_end_of_line > 0.0 {
                    layout.ws_length_end_of_line - layout.extra_width
                } else {
                    0.0
                };
            }
            line_run.ascender = layout.ascender;
            line_run.descender = layout.descender;
            line_run.direction = !RTL;
            line_run.ellipsis = false;
            lines.push(line_run);

            actual_size.width = actual_size.width.max(line_run.width);
            actual_size.height += line_run.height();

            let end = index + layout.number_of_glyphs;
            Self::set_glyph_positions(
                &parameters.glyphs[index..end],
                pen_y,
                &mut glyph_positions[index..end],
            );

            pen_y -= layout.descender;
            index = end;

            if is_last_line && parameters.is_last_new_paragraph && self.layout == Layout::MultiLineBox {
                // An empty line after the last new paragraph character, so
                // the cursor has somewhere to go.
                let font_id = parameters.glyphs[total_number_of_glyphs - 1].font_id;
                let font_metrics = metrics.font_metrics(font_id);

                let mut empty_line = LineRun::default();
                empty_line.glyph_run.glyph_index = total_number_of_glyphs;
                empty_line.character_run.character_index = parameters.text.len();
                empty_line.ascender = font_metrics.ascender;
                empty_line.descender = font_metrics.descender;
                empty_line.direction = !RTL;

                actual_size.height += empty_line.height();
                lines.push(empty_line);
            }
        }

        true
    }

    /// Recompute the x position of the glyphs of every right to left line
    /// in visual order. Lines and y positions are unchanged.
    pub fn re_layout_right_to_left_lines(
        &self,
        parameters: &LayoutParameters<'_>,
        glyph_positions: &mut [Point],
    ) {
        let glyphs = parameters.glyphs;

        for bidi_line in parameters.line_bidirectional_info {
            let run = bidi_line.character_run;
            let Some(&first_visual) = bidi_line.visual_to_logical_map.first() else {
                continue;
            };

            // Where the run starts on the line, in case it does not start
            // the line (single line layouts crossing paragraphs).
            let Some(&first_glyph_index) = parameters.characters_to_glyphs.get(run.character_index)
            else {
                continue;
            };
            let (Some(first_glyph), Some(first_position)) =
                (glyphs.get(first_glyph_index), glyph_positions.get(first_glyph_index))
            else {
                continue;
            };
            let origin = first_position.x - first_glyph.x_bearing.max(0.0);

            let visual_glyph = parameters
                .characters_to_glyphs
                .get(run.character_index + first_visual)
                .and_then(|&index| glyphs.get(index));
            let mut pen_x = origin + visual_glyph.map(extra_bearing).unwrap_or(0.0);

            for &logical in &bidi_line.visual_to_logical_map {
                let character_index = run.character_index + logical;
                let number_of_glyphs = parameters
                    .glyphs_per_character
                    .get(character_index)
                    .copied()
                    .unwrap_or(0);
                let Some(&glyph_start) = parameters.characters_to_glyphs.get(character_index)
                else {
                    continue;
                };

                for glyph_index in glyph_start..glyph_start + number_of_glyphs {
                    let (Some(glyph), Some(position)) =
                        (glyphs.get(glyph_index), glyph_positions.get_mut(glyph_index))
                    else {
                        continue;
                    };
                    position.x = pen_x + glyph.x_bearing;
                    pen_x += glyph.advance;
                }
            }
        }
    }

    fn calculate_horizontal_alignment(&self, box_width: f32, line: &mut LineRun, is_last_line: bool) {
        line.alignment_offset = 0.0;
        let is_rtl = line.direction == RTL;
        let mut line_length = line.width;

        let alignment = match (self.horizontal_alignment, is_rtl) {
            (HorizontalAlignment::Begin, true) => HorizontalAlignment::End,
            (HorizontalAlignment::End, true) => HorizontalAlignment::Begin,
            (alignment, _) => alignment,
        };

        match alignment {
            HorizontalAlignment::Begin => {
                if is_rtl {
                    // Trailing white space is visually at the start of the line.
                    line.alignment_offset -= line.extra_length;
                    if is_last_line {
                        line.alignment_offset += line.extra_length.min(box_width - line_length);
                    }
                }
            }
            HorizontalAlignment::Center => {
                if is_last_line && !is_rtl {
                    line_length += line.extra_length;
                    if line_length > box_width {
                        return;
                    }
                }

                line.alignment_offset = 0.5 * (box_width - line_length);

                if is_rtl {
                    line.alignment_offset -= line.extra_length;
                    if is_last_line {
                        line.alignment_offset +=
                            0.5 * line.extra_length.min(box_width - line_length);
                    }
                }

                line.alignment_offset = line.alignment_offset.floor();
            }
            HorizontalAlignment::End => {
                if is_last_line && !is_rtl {
                    line_length += line.extra_length;
                    if line_length > box_width {
                        return;
                    }
                }

                if is_rtl {
                    line_length += line.extra_length;
                }

                line.alignment_offset = box_width - line_length;
            }
        }
    }

    fn vertical_offset(&self, box_height: f32, lines: &[LineRun]) -> f32 {
        let block_height: f32 = lines.iter().map(LineRun::height).sum();
        match self.vertical_alignment {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => (0.5 * (box_height - block_height)).floor(),
            VerticalAlignment::Bottom => box_height - block_height,
        }
    }

    /// Compute each line's horizontal offset and the block's vertical
    /// offset, and move the glyphs of every line by them.
    ///
    /// Returns the vertical offset.
    pub fn align(
        &self,
        layout_size: Size,
        lines: &mut [LineRun],
        glyph_positions: &mut [Point],
    ) -> f32 {
        let vertical_offset = self.vertical_offset(layout_size.height, lines);
        let number_of_lines = lines.len();

        for (line_index, line) in lines.iter_mut().enumerate() {
            let is_last_line = line_index + 1 == number_of_lines;
            self.calculate_horizontal_alignment(layout_size.width, line, is_last_line);

            let start = line.glyph_run.glyph_index.min(glyph_positions.len());
            let end = line.glyph_run.end().min(glyph_positions.len());
            for position in &mut glyph_positions[start..end] {
                position.x += line.alignment_offset;
                position.y += vertical_offset;
            }
        }

        vertical_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontMetrics;
    use crate::types::{
        BidirectionalLineInfoRun, CharacterRun, GlyphId, PointSize26Dot6,
    };

    /// Every font has ascender 8 and descender -2.
    struct FixedMetrics;

    impl FontService for FixedMetrics {
        fn find_default_font(&mut self, _: char, _: PointSize26Dot6, _: bool) -> FontId {
            1
        }

        fn find_fallback_font(&mut self, _: FontId, _: char, _: PointSize26Dot6, _: bool) -> FontId {
            1
        }

        fn point_size(&self, _: FontId) -> PointSize26Dot6 {
            crate::types::DEFAULT_POINT_SIZE
        }

        fn glyph_index(&self, _: FontId, c: char) -> GlyphId {
            c as GlyphId
        }

        fn glyph_metrics(&mut self, _: &mut [GlyphInfo], _: bool) -> bool {
            true
        }

        fn font_metrics(&self, _: FontId) -> FontMetrics {
            FontMetrics {
                ascender: 8.0,
                descender: -2.0,
                height: 10.0,
                ..Default::default()
            }
        }

        fn ellipsis_glyph(&mut self, _: PointSize26Dot6) -> GlyphInfo {
            GlyphInfo::default()
        }
    }

    struct Fixture {
        text: Vec<char>,
        line_breaks: Vec<LineBreakInfo>,
        word_breaks: Vec<WordBreakInfo>,
        glyphs: Vec<GlyphInfo>,
        indices: Vec<usize>,
        ones: Vec<usize>,
    }

    impl Fixture {
        /// One glyph per character. Letters advance 10 with a bearing of 1
        /// and width 8; white space advances 10 and new lines 0.
        fn new(text: &str, line_breaks: &str, word_breaks: &str) -> Self {
            let text: Vec<char> = text.chars().collect();
            let glyphs = text
                .iter()
                .map(|&c| {
                    let mut glyph = GlyphInfo::new(1, c as GlyphId);
                    if c == '\n' {
                        return glyph;
                    }
                    glyph.advance = 10.0;
                    if !is_white_space(c) {
                        glyph.width = 8.0;
                        glyph.height = 8.0;
                        glyph.x_bearing = 1.0;
                        glyph.y_bearing = 8.0;
                    }
                    glyph
                })
                .collect();
            let line_breaks = line_breaks
                .bytes()
                .map(|b| match b {
                    b'0' => LineBreakInfo::MustBreak,
                    b'1' => LineBreakInfo::AllowBreak,
                    _ => LineBreakInfo::NoBreak,
                })
                .collect();
            let word_breaks = word_breaks
                .bytes()
                .map(|b| {
                    if b == b'0' {
                        WordBreakInfo::Break
                    } else {
                        WordBreakInfo::NoBreak
                    }
                })
                .collect();
            let n = text.len();
            Self {
                text,
                line_breaks,
                word_breaks,
                glyphs,
                indices: (0..n).collect(),
                ones: vec![1; n],
            }
        }

        fn parameters(&self, width: f32, height: f32) -> LayoutParameters<'_> {
            LayoutParameters {
                bounding_box: Size::new(width, height),
                text: &self.text,
                line_break_info: &self.line_breaks,
                word_break_info: &self.word_breaks,
                glyphs: &self.glyphs,
                glyphs_to_characters: &self.indices,
                characters_per_glyph: &self.ones,
                characters_to_glyphs: &self.indices,
                glyphs_per_character: &self.ones,
                ..Default::default()
            }
        }
    }

    fn hello_world() -> Fixture {
        Fixture::new("Hello world", "22222122220", "11110011110")
    }

    fn run(
        engine: &LayoutEngine,
        parameters: &LayoutParameters<'_>,
    ) -> (bool, Vec<Point>, Vec<LineRun>, Size) {
        let mut positions = Vec::new();
        let mut lines = Vec::new();
        let mut size = Size::zero();
        let ok = engine.layout_text(parameters, &FixedMetrics, &mut positions, &mut lines, &mut size);
        (ok, positions, lines, size)
    }

    fn multi_line() -> LayoutEngine {
        let mut engine = LayoutEngine::new();
        engine.set_layout(Layout::MultiLineBox);
        engine
    }

    #[test]
    fn single_line_fits() {
        let fixture = hello_world();
        let (ok, positions, lines, size) = run(&multi_line(), &fixture.parameters(200.0, 100.0));

        assert!(ok);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].glyph_run, crate::types::GlyphRun::new(0, 11));
        assert_eq!(lines[0].character_run, CharacterRun::new(0, 11));
        // Cursor width plus ten letters and a space.
        assert_eq!(lines[0].width, 111.0);
        assert_eq!(size, Size::new(111.0, 10.0));
        assert_eq!(positions[0], Point::new(1.0, 0.0));
        assert_eq!(positions[6], Point::new(61.0, 0.0));
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let fixture = hello_world();
        let (ok, positions, lines, size) = run(&multi_line(), &fixture.parameters(80.0, 100.0));

        assert!(ok);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].character_run, CharacterRun::new(0, 6));
        assert_eq!(lines[0].width, 51.0);
        assert_eq!(lines[0].extra_length, 10.0);
        assert_eq!(lines[1].character_run, CharacterRun::new(6, 5));
        assert_eq!(lines[1].width, 51.0);
        assert_eq!(size, Size::new(51.0, 20.0));
        assert_eq!(positions[6], Point::new(1.0, 10.0));
    }

    #[test]
    fn too_narrow_box_fails() {
        let fixture = hello_world();
        let (ok, _, lines, _) = run(&multi_line(), &fixture.parameters(5.0, 100.0));
        assert!(!ok);
        assert!(lines.is_empty());
    }

    #[test]
    fn ellipsis_replaces_the_last_fitting_line() {
        let fixture = hello_world();
        let mut engine = multi_line();
        engine.set_text_ellipsis_enabled(true);
        let (ok, _, lines, size) = run(&engine, &fixture.parameters(80.0, 15.0));

        assert!(ok);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ellipsis);
        assert_eq!(lines[0].glyph_run.number_of_glyphs, 7);
        assert_eq!(lines[0].width, 71.0);
        assert_eq!(size, Size::new(80.0, 10.0));
    }

    #[test]
    fn single_line_ellipsis_cuts_at_the_box_width() {
        let fixture = hello_world();
        let mut engine = LayoutEngine::new();
        engine.set_text_ellipsis_enabled(true);
        let (ok, _, lines, _) = run(&engine, &fixture.parameters(60.0, 100.0));

        assert!(ok);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ellipsis);
        assert_eq!(lines[0].glyph_run.number_of_glyphs, 6);
    }

    #[test]
    fn single_line_without_ellipsis_overflows() {
        let fixture = hello_world();
        let (ok, _, lines, size) = run(&LayoutEngine::new(), &fixture.parameters(60.0, 100.0));
        assert!(ok);
        assert_eq!(lines.len(), 1);
        assert_eq!(size.width, 111.0);
    }

    #[test]
    fn trailing_new_paragraph_adds_an_empty_line() {
        let fixture = Fixture::new("Hello\n", "222220", "111100");
        let mut parameters = fixture.parameters(200.0, 100.0);
        parameters.is_last_new_paragraph = true;
        let (ok, _, lines, size) = run(&multi_line(), &parameters);

        assert!(ok);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].glyph_run.glyph_index, 6);
        assert_eq!(lines[1].glyph_run.number_of_glyphs, 0);
        assert_eq!(lines[1].character_run, CharacterRun::new(6, 0));
        assert_eq!(size.height, 20.0);
    }

    #[test]
    fn right_to_left_lines_are_mirrored() {
        let fixture = Fixture::new("abc", "220", "110");
        let line_info = [BidirectionalLineInfoRun {
            character_run: CharacterRun::new(0, 3),
            visual_to_logical_map: vec![2, 1, 0],
            direction: true,
        }];
        let mut parameters = fixture.parameters(200.0, 100.0);
        let (ok, mut positions, _, _) = run(&multi_line(), &parameters);
        assert!(ok);

        let before = positions.clone();
        multi_line().re_layout_right_to_left_lines(&parameters, &mut positions);
        assert_eq!(positions, before);

        parameters.line_bidirectional_info = &line_info;
        multi_line().re_layout_right_to_left_lines(&parameters, &mut positions);
        let xs: Vec<f32> = positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![21.0, 11.0, 1.0]);
        assert!(positions.iter().zip(&before).all(|(a, b)| a.y == b.y));
    }

    #[test]
    fn aligns_lines_and_block() {
        let fixture = Fixture::new("Hello", "22220", "11110");
        let parameters = fixture.parameters(100.0, 30.0);
        let mut engine = LayoutEngine::new();
        engine.set_horizontal_alignment(HorizontalAlignment::Center);
        engine.set_vertical_alignment(VerticalAlignment::Center);

        let (ok, mut positions, mut lines, _) = run(&engine, &parameters);
        assert!(ok);
        let vertical = engine.align(Size::new(100.0, 30.0), &mut lines, &mut positions);

        assert_eq!(vertical, 10.0);
        assert_eq!(lines[0].alignment_offset, 24.0);
        assert_eq!(positions[0], Point::new(25.0, 10.0));

        engine.set_horizontal_alignment(HorizontalAlignment::End);
        engine.set_vertical_alignment(VerticalAlignment::Bottom);
        let (_, mut positions, mut lines, _) = run(&engine, &parameters);
        let vertical = engine.align(Size::new(100.0, 30.0), &mut lines, &mut positions);
        assert_eq!(vertical, 20.0);
        assert_eq!(lines[0].alignment_offset, 49.0);
    }

    #[test]
    fn right_to_left_lines_swap_begin_and_end() {
        let engine = LayoutEngine::new();
        let mut lines = [LineRun {
            width: 51.0,
            direction: true,
            ..Default::default()
        }];
        engine.align(Size::new(100.0, 30.0), &mut lines, &mut []);
        assert_eq!(lines[0].alignment_offset, 49.0);
    }

    #[test]
    fn empty_text_lays_out_nothing() {
        let fixture = Fixture::new("", "", "");
        let (ok, positions, lines, size) = run(&multi_line(), &fixture.parameters(100.0, 100.0));
        assert!(ok);
        assert!(positions.is_empty() && lines.is_empty());
        assert_eq!(size, Size::zero());
    }
}
