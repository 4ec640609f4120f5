use crate::types::PointSize26Dot6;

/// Face-level metrics in font units.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    /// Units per em.
    pub units_per_em: u16,
    /// Distance from the baseline to the top of the underline (negative below).
    pub underline_offset: f32,
    /// Thickness of underline and strikeout strokes.
    pub stroke_size: f32,
}

impl FaceMetrics {
    /// Scale factor from font units to pixels at `px` pixels per em.
    pub fn scale(&self, px: f32) -> f32 {
        if self.units_per_em != 0 {
            px / self.units_per_em as f32
        } else {
            1.0
        }
    }

    /// Scale metrics to pixel size, where `font_size` is in logical pixels
    /// (px per em).
    pub fn scale_to_pixels(&self, font_size: f32) -> FontMetrics {
        let scale = self.scale(font_size);
        FontMetrics {
            ascender: self.ascent * scale,
            descender: -self.descent * scale,
            height: (self.ascent + self.descent + self.line_gap) * scale,
            underline_position: -self.underline_offset * scale,
            underline_thickness: self.stroke_size * scale,
        }
    }

    /// Scale metrics for a 26.6 point size at a given DPI.
    ///
    /// `px = pt * dpi / 72.0`.
    pub fn scale_from_points(&self, point_size: PointSize26Dot6, dpi: f32) -> FontMetrics {
        self.scale_to_pixels(points_to_pixels(point_size, dpi))
    }
}

/// Convert a 26.6 point size to pixels per em.
pub fn points_to_pixels(point_size: PointSize26Dot6, dpi: f32) -> f32 {
    point_size as f32 / 64.0 * dpi / 72.0
}

/// Pixel metrics of a sized font as used by the layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line (positive).
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the line (negative).
    pub descender: f32,
    /// Line height including the line gap.
    pub height: f32,
    /// Distance below the baseline of the underline.
    pub underline_position: f32,
    pub underline_thickness: f32,
}
