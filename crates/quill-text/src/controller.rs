//! Runs the pipeline stages in order and owns their state.

use palette::Srgba;
use tracing::debug;

use crate::bidi::{self, BidirectionalSupport};
use crate::font::FontService;
use crate::layout::{
    HorizontalAlignment, Layout, LayoutEngine, LayoutParameters, Point, Size, VerticalAlignment,
};
use crate::model::{LogicalModel, VisualModel};
use crate::multilanguage::{set_scripts, MultilanguageSupport};
use crate::segmentation::{set_line_break_info, set_word_break_info, BreakService};
use crate::shaping::{shape_text, Shaper};
use crate::types::{CharacterRun, FontId, FontRun, GlyphRun};
use crate::unicode::is_new_paragraph;
use crate::view::View;

/// Owns the models of one text and the pipeline components.
///
/// Services are passed in by the caller: [`update_model`](Self::update_model)
/// needs fonts, breaks and a shaper after every text change, and
/// [`relayout`](Self::relayout) needs font metrics after every size change.
#[derive(Debug, Default)]
pub struct TextController {
    logical: LogicalModel,
    visual: VisualModel,
    layout_engine: LayoutEngine,
    multilanguage: MultilanguageSupport,
    bidi: BidirectionalSupport,
    /// Fonts requested by the application, validated on every update.
    font_runs: Vec<FontRun>,
    default_font: FontId,
    vertical_offset: f32,
    natural_size_valid: bool,
}

impl TextController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text. Fonts set with [`set_font_runs`](Self::set_font_runs)
    /// are dropped; the models are empty until the next `update_model`.
    pub fn set_text(&mut self, text: &str) {
        self.logical.text = text.chars().collect();
        self.font_runs.clear();
        self.logical.clear_derived();
        self.visual.clear();
        self.bidi.clear();
        self.natural_size_valid = false;
    }

    pub fn text(&self) -> String {
        self.logical.text.iter().collect()
    }

    /// Fonts requested by the application. Gaps are filled by the default
    /// font, and characters a font cannot render get a fallback.
    pub fn set_font_runs(&mut self, font_runs: Vec<FontRun>) {
        self.font_runs = font_runs;
        self.natural_size_valid = false;
    }

    /// Font used for the whole text when no font runs are set.
    pub fn set_default_font(&mut self, font_id: FontId) {
        self.default_font = font_id;
        self.natural_size_valid = false;
    }

    pub fn default_font(&self) -> FontId {
        self.default_font
    }

    /// Fonts set with [`set_font_runs`](Self::set_font_runs). The validated
    /// fonts are in the logical model.
    pub fn font_runs(&self) -> &[FontRun] {
        &self.font_runs
    }

    /// Run every stage up to glyph metrics: scripts, font validation,
    /// breaks, bidi analysis, mirroring and shaping.
    ///
    /// The requested fonts are kept, so calling this again after
    /// [`clear_font_caches`](Self::clear_font_caches) or a default font
    /// change picks fonts afresh.
    pub fn update_model(
        &mut self,
        fonts: &mut dyn FontService,
        breaks: &mut dyn BreakService,
        shaper: &mut dyn Shaper,
    ) {
        let number_of_characters = self.logical.text.len();
        debug!(characters = number_of_characters, "update model");

        self.logical.clear_derived();
        self.visual.clear();
        self.bidi.clear();
        self.natural_size_valid = false;

        self.logical.script_runs = set_scripts(&self.logical.text);

        let mut font_runs = self.font_runs.clone();
        if font_runs.is_empty() && self.default_font != 0 && number_of_characters > 0 {
            font_runs.push(FontRun {
                character_run: CharacterRun::new(0, number_of_characters),
                font_id: self.default_font,
                is_default: true,
            });
        }
        self.multilanguage.validate_fonts(
            fonts,
            &self.logical.text,
            &self.logical.script_runs,
            &mut font_runs,
        );
        self.logical.font_runs = font_runs;

        let text = &self.logical.text;
        self.logical.line_break_info = set_line_break_info(breaks, text);
        self.logical.word_break_info = set_word_break_info(breaks, text);

        self.logical.bidirectional_paragraph_info = bidi::set_bidirectional_info(
            &mut self.bidi,
            &self.logical.text,
            &self.logical.script_runs,
            &self.logical.line_break_info,
        );

        let mut mirrored = None;
        if !self.logical.bidirectional_paragraph_info.is_empty() {
            let (text, updated) = bidi::get_mirrored_text(
                &self.bidi,
                &self.logical.text,
                &self.logical.bidirectional_paragraph_info,
            );
            if updated {
                mirrored = Some(text);
            }
            self.logical.character_directions = bidi::get_characters_direction(
                &self.bidi,
                &self.logical.bidirectional_paragraph_info,
                number_of_characters,
            );
        }

        // Mirrored characters are only shaped; the model keeps the text as given.
        let text_to_shape = mirrored.as_deref().unwrap_or(self.logical.text.as_slice());
        let shaped = shape_text(
            shaper,
            text_to_shape,
            &self.logical.line_break_info,
            &self.logical.script_runs,
            &self.logical.font_runs,
        );

        self.visual.glyphs = shaped.glyphs;
        self.visual.glyphs_to_characters = shaped.glyphs_to_characters;
        self.visual.characters_per_glyph = shaped.characters_per_glyph;
        self.visual.create_glyphs_per_character_table();
        self.visual.create_character_to_glyph_table();

        if !fonts.glyph_metrics(&mut self.visual.glyphs, true) {
            debug!("some glyphs could not be measured");
        }

        // New paragraph characters take no room.
        for &index in &shaped.new_paragraph_glyphs {
            if let Some(glyph) = self.visual.glyphs.get_mut(index) {
                glyph.x_bearing = 0.0;
                glyph.width = 0.0;
                glyph.advance = 0.0;
            }
        }

        debug!(
            glyphs = self.visual.glyphs.len(),
            scripts = self.logical.script_runs.len(),
            fonts = self.logical.font_runs.len(),
            paragraphs = self.logical.bidirectional_paragraph_info.len(),
            "model updated"
        );
    }

    /// Lay the text out in a box of `size` and align it.
    ///
    /// An empty box removes the glyph positions. Returns `false` when the
    /// box is empty or too narrow for a single glyph.
    pub fn relayout(&mut self, size: Size, fonts: &dyn FontService) -> bool {
        debug!(width = size.width, height = size.height, "relayout");
        self.visual.control_size = size;

        if size.is_empty() {
            self.visual.glyph_positions.clear();
            self.visual.lines.clear();
            return false;
        }

        self.do_relayout(size, fonts).is_some()
    }

    /// Size of the text laid out without limits. Cached until the text,
    /// fonts or layout options change.
    ///
    /// Leaves the unbounded layout in the visual model; call
    /// [`relayout`](Self::relayout) again before reading the view.
    pub fn natural_size(&mut self, fonts: &dyn FontService) -> Size {
        if self.natural_size_valid {
            return self.visual.natural_size();
        }

        let size = self.do_relayout(Size::unbounded(), fonts).unwrap_or_default();
        self.visual.set_natural_size(size);
        self.natural_size_valid = true;
        debug!(width = size.width, height = size.height, "natural size");
        size
    }

    /// Height of the text laid out in a box `width` wide.
    ///
    /// Like [`natural_size`](Self::natural_size) this replaces the current
    /// layout.
    pub fn height_for_width(&mut self, width: f32, fonts: &dyn FontService) -> f32 {
        self.do_relayout(Size::new(width, f32::MAX), fonts)
            .map(|size| size.height)
            .unwrap_or(0.0)
    }

    /// Lay out, reorder right to left lines, store the actual size and
    /// align. Returns the laid-out size, or `None` if nothing fits.
    fn do_relayout(&mut self, size: Size, fonts: &dyn FontService) -> Option<Size> {
        let mut positions = std::mem::take(&mut self.visual.glyph_positions);
        let mut lines = std::mem::take(&mut self.visual.lines);
        let mut layout_size = Size::zero();

        if self.visual.glyphs.is_empty() {
            positions.clear();
            lines.clear();
            self.visual.glyph_positions = positions;
            self.visual.lines = lines;
            self.visual.set_actual_size(layout_size);
            return Some(layout_size);
        }

        let is_last_new_paragraph = self
            .logical
            .text
            .last()
            .is_some_and(|c| is_new_paragraph(*c));

        let mut parameters = LayoutParameters {
            bounding_box: size,
            text: &self.logical.text,
            line_break_info: &self.logical.line_break_info,
            word_break_info: &self.logical.word_break_info,
            character_directions: &self.logical.character_directions,
            glyphs: &self.visual.glyphs,
            glyphs_to_characters: &self.visual.glyphs_to_characters,
            characters_per_glyph: &self.visual.characters_per_glyph,
            is_last_new_paragraph,
            ..Default::default()
        };

        let laid_out = self.layout_engine.layout_text(
            &parameters,
            fonts,
            &mut positions,
            &mut lines,
            &mut layout_size,
        );

        let mut line_runs = Vec::new();
        if laid_out && !self.logical.bidirectional_paragraph_info.is_empty() {
            line_runs = bidi::reorder_lines(
                &self.bidi,
                &self.logical.bidirectional_paragraph_info,
                &mut lines,
            );

            parameters.line_bidirectional_info = &line_runs;
            parameters.characters_to_glyphs = &self.visual.characters_to_glyph;
            parameters.glyphs_per_character = &self.visual.glyphs_per_character;
            self.layout_engine
                .re_layout_right_to_left_lines(&parameters, &mut positions);
        }

        if !laid_out {
            debug!("nothing fits in the box");
            positions.clear();
            lines.clear();
        }

        self.logical.set_visual_to_logical_map(&line_runs);
        self.logical.bidirectional_line_info = line_runs;

        if laid_out {
            self.visual.set_actual_size(layout_size);

            // An unbounded box is aligned within the text itself.
            let align_size = Size::new(
                if size.width >= f32::MAX { layout_size.width } else { size.width },
                if size.height >= f32::MAX { layout_size.height } else { size.height },
            );
            self.vertical_offset = self
                .layout_engine
                .align(align_size, &mut lines, &mut positions);
        }

        self.visual.glyph_positions = positions;
        self.visual.lines = lines;
        self.visual.clear_caches();

        laid_out.then_some(layout_size)
    }

    /// Underline the glyphs of a range of characters.
    pub fn underline_characters(&mut self, characters: CharacterRun) {
        let first = characters.character_index;
        let last = first + characters.number_of_characters.saturating_sub(1);

        let (Some(&glyph_start), Some(&last_glyph), Some(&glyphs_of_last)) = (
            self.visual.characters_to_glyph.get(first),
            self.visual.characters_to_glyph.get(last),
            self.visual.glyphs_per_character.get(last),
        ) else {
            debug!(first, last, "underline range outside the text");
            return;
        };

        let glyph_end = last_glyph + glyphs_of_last.saturating_sub(1);
        self.visual.underline_runs.push(GlyphRun::new(
            glyph_start,
            1 + glyph_end.saturating_sub(glyph_start),
        ));
    }

    pub fn clear_underline_runs(&mut self) {
        self.visual.underline_runs.clear();
    }

    /// Forget the cached default and valid fonts per script.
    pub fn clear_font_caches(&mut self) {
        self.multilanguage.clear_caches();
    }

    pub fn set_layout_engine(&mut self, engine: LayoutEngine) {
        self.layout_engine = engine;
        self.natural_size_valid = false;
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout_engine
    }

    pub fn set_multi_line_enabled(&mut self, enabled: bool) {
        let layout = if enabled {
            Layout::MultiLineBox
        } else {
            Layout::SingleLineBox
        };
        if layout != self.layout_engine.layout() {
            self.layout_engine.set_layout(layout);
            self.natural_size_valid = false;
        }
    }

    pub fn is_multi_line_enabled(&self) -> bool {
        self.layout_engine.layout() == Layout::MultiLineBox
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.layout_engine.set_horizontal_alignment(alignment);
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.layout_engine.set_vertical_alignment(alignment);
    }

    pub fn set_text_ellipsis_enabled(&mut self, enabled: bool) {
        self.layout_engine.set_text_ellipsis_enabled(enabled);
    }

    pub fn set_cursor_width(&mut self, width: f32) {
        self.layout_engine.set_cursor_width(width);
        self.natural_size_valid = false;
    }

    pub fn set_text_color(&mut self, color: Srgba) {
        self.visual.set_text_color(color);
    }

    pub fn set_shadow_offset(&mut self, offset: Point) {
        self.visual.set_shadow_offset(offset);
    }

    pub fn set_shadow_color(&mut self, color: Srgba) {
        self.visual.set_shadow_color(color);
    }

    pub fn set_underline_color(&mut self, color: Srgba) {
        self.visual.set_underline_color(color);
    }

    pub fn set_underline_enabled(&mut self, enabled: bool) {
        self.visual.set_underline_enabled(enabled);
    }

    pub fn set_underline_height(&mut self, height: f32) {
        self.visual.set_underline_height(height);
    }

    /// Vertical offset applied by the last alignment.
    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    pub fn logical_model(&self) -> &LogicalModel {
        &self.logical
    }

    pub fn visual_model(&self) -> &VisualModel {
        &self.visual
    }

    pub fn view(&self) -> View<'_> {
        View::new(&self.visual)
    }
}
