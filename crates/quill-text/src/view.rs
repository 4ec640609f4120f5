//! Read-only access to a laid-out text for renderers.

use palette::Srgba;

use crate::font::FontService;
use crate::layout::{Point, Size};
use crate::model::VisualModel;
use crate::types::{GlyphIndex, GlyphInfo, GlyphRun, Length};

/// Glyphs, positions and style of a laid-out text.
///
/// Positions already include the alignment offsets.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    model: &'a VisualModel,
}

impl<'a> View<'a> {
    pub fn new(model: &'a VisualModel) -> Self {
        Self { model }
    }

    pub fn control_size(&self) -> Size {
        self.model.control_size
    }

    /// Number of glyphs with a position.
    pub fn number_of_glyphs(&self) -> Length {
        let glyphs = self.model.glyphs.len();
        let positions = self.model.glyph_positions.len();
        debug_assert!(positions <= glyphs, "more glyph positions than glyphs");
        positions.min(glyphs)
    }

    /// Copy out the glyphs and positions of a range.
    ///
    /// When the text was elided, glyphs after the last laid-out line are
    /// dropped and the last glyphs that make room for it are replaced by the
    /// font service's ellipsis glyph. Nothing is returned before layout.
    pub fn glyphs(
        &self,
        fonts: &mut dyn FontService,
        glyph_index: GlyphIndex,
        number_of_glyphs: Length,
    ) -> (Vec<GlyphInfo>, Vec<Point>) {
        let Some(last_line) = self.model.lines.last() else {
            return (Vec::new(), Vec::new());
        };

        let available = self.number_of_glyphs();
        let start = glyph_index.min(available);
        let mut end = start.saturating_add(number_of_glyphs).min(available);
        if last_line.ellipsis {
            end = end.min(last_line.glyph_run.end()).max(start);
        }

        let mut glyphs = self.model.glyphs[start..end].to_vec();
        let mut positions = self.model.glyph_positions[start..end].to_vec();

        // Not worth eliding a single glyph.
        if last_line.ellipsis && glyphs.len() > 1 {
            let kept = insert_ellipsis(fonts, &mut glyphs, &mut positions);
            glyphs.truncate(kept);
            positions.truncate(kept);
        }

        (glyphs, positions)
    }

    pub fn text_color(&self) -> Srgba {
        self.model.text_color()
    }

    pub fn shadow_offset(&self) -> Point {
        self.model.shadow_offset()
    }

    pub fn shadow_color(&self) -> Srgba {
        self.model.shadow_color()
    }

    pub fn underline_color(&self) -> Srgba {
        self.model.underline_color()
    }

    pub fn is_underline_enabled(&self) -> bool {
        self.model.is_underline_enabled()
    }

    pub fn underline_height(&self) -> f32 {
        self.model.underline_height()
    }

    pub fn number_of_underline_runs(&self) -> Length {
        self.model.underline_runs.len()
    }

    pub fn underline_runs(&self, index: usize, number_of_runs: Length) -> &'a [GlyphRun] {
        let runs = &self.model.underline_runs;
        let start = index.min(runs.len());
        let end = start.saturating_add(number_of_runs).min(runs.len());
        &runs[start..end]
    }
}

/// Replace trailing glyphs by the ellipsis glyph, removing as many as
/// needed to make room for it. Returns the number of glyphs to keep.
fn insert_ellipsis(
    fonts: &mut dyn FontService,
    glyphs: &mut [GlyphInfo],
    positions: &mut [Point],
) -> Length {
    let mut first_pen_x = 0.0;
    let mut pen_y = 0.0;
    let mut first_pen_set = false;
    let mut removed_glyphs_width = 0.0;
    let mut number_of_removed_glyphs = 0;
    let mut index = glyphs.len() - 1;

    loop {
        let glyph_to_remove = glyphs[index];

        // Glyphs shaped from new paragraph characters may have no font.
        if glyph_to_remove.font_id != 0 {
            // The ellipsis matches the size of the glyph it replaces.
            let point_size = fonts.point_size(glyph_to_remove.font_id);
            let ellipsis = fonts.ellipsis_glyph(point_size);

            if !first_pen_set {
                let position = positions[index];
                pen_y = position.y + glyph_to_remove.y_bearing;
                // Keeps an elided right to left line inside the box.
                first_pen_x = (position.x - glyph_to_remove.x_bearing).max(-ellipsis.x_bearing);
                removed_glyphs_width = -ellipsis.x_bearing;
                first_pen_set = true;
            }

            removed_glyphs_width += glyph_to_remove
                .advance
                .min(glyph_to_remove.x_bearing + glyph_to_remove.width);

            let ellipsis_width = ellipsis.width + ellipsis.x_bearing;
            if ellipsis_width < removed_glyphs_width {
                let position = &mut positions[index];
                if glyph_to_remove.x_bearing < 0.0 {
                    position.x -= glyph_to_remove.x_bearing;
                }

                glyphs[index] = ellipsis;

                if position.x > first_pen_x {
                    position.x = first_pen_x + removed_glyphs_width - ellipsis_width;
                }
                position.x += ellipsis.x_bearing;
                position.y = pen_y - ellipsis.y_bearing;

                return glyphs.len() - number_of_removed_glyphs;
            }
        }

        number_of_removed_glyphs += 1;
        if index == 0 {
            // No room for the ellipsis.
            return 0;
        }
        index -= 1;
    }
}
