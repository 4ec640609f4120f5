use std::sync::Arc;

use swash::scale::outline::Outline;
use swash::scale::ScaleContext;
use swash::{FontRef, GlyphId, Metrics};

use crate::font::{FaceMetrics, FontError, Result};

/// Loaded font face backed by a font file (TTF/OTF).
///
/// Thin wrapper around `swash::FontRef` that owns the font data and
/// exposes metrics, character coverage and per-glyph measurements.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Full font data.
    data: Arc<[u8]>,
    /// Index of the face within a collection.
    index: usize,
    /// Offset to the table directory for this font.
    offset: u32,
    /// Cache key used internally by swash.
    key: swash::CacheKey,
    /// Extracted font metrics in font units.
    metrics: FaceMetrics,
}

/// Measurements of one glyph in pixels, y axis pointing up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphBounds {
    pub width: f32,
    pub height: f32,
    /// Left edge of the outline relative to the pen position.
    pub x_bearing: f32,
    /// Top edge of the outline relative to the baseline.
    pub y_bearing: f32,
}

impl FontFace {
    /// Create a font face from raw bytes and a font index within the file.
    pub fn from_bytes(data: Arc<[u8]>, index: usize) -> Result<Self> {
        let font = FontRef::from_index(&data, index).ok_or(FontError::InvalidFont)?;
        let metrics = Self::metrics_from_swash(&font);
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            data,
            index,
            offset,
            key,
            metrics,
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: usize) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: usize) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    /// Raw font bytes, shared with the shaper.
    pub fn as_bytes(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    /// Face index within the font file.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return a transient `FontRef` for interacting with swash APIs.
    fn as_swash_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FaceMetrics {
        // Use default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            underline_offset,
            stroke_size,
            ..
        } = font.metrics(&[]);

        FaceMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
            underline_offset,
            stroke_size,
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    /// Glyph for `character`, `0` when the face does not cover it.
    pub fn glyph_id(&self, character: char) -> u32 {
        self.as_swash_ref().charmap().map(character) as u32
    }

    pub fn has_glyph(&self, character: char) -> bool {
        self.glyph_id(character) != 0
    }

    /// Horizontal advance of a glyph at `font_size` pixels per em.
    pub fn advance(&self, glyph_id: GlyphId, font_size: f32) -> f32 {
        self.as_swash_ref()
            .glyph_metrics(&[])
            .scale(font_size)
            .advance_width(glyph_id)
    }

    /// Convert a glyph id to a scaled outline at the specified size.
    pub fn glyph_outline(&self, glyph_id: GlyphId, font_size: f32) -> Option<Outline> {
        let mut context = ScaleContext::new();
        let font = self.as_swash_ref();
        let mut scaler = context.builder(font).size(font_size).build();
        scaler.scale_outline(glyph_id)
    }

    /// Outline bounds of a glyph. Glyphs without an outline (spaces) are empty.
    pub fn glyph_bounds(&self, glyph_id: GlyphId, font_size: f32) -> GlyphBounds {
        let Some(outline) = self.glyph_outline(glyph_id, font_size) else {
            return GlyphBounds::default();
        };

        let bounds = outline.bounds();
        GlyphBounds {
            width: bounds.max.x - bounds.min.x,
            height: bounds.max.y - bounds.min.y,
            x_bearing: bounds.min.x,
            y_bearing: bounds.max.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage() {
        let err = FontFace::from_vec(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, FontError::InvalidFont));
    }
}
