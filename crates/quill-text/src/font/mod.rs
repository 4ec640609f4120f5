pub mod face;
pub mod metrics;
pub mod system;

pub use face::FontFace;
pub use metrics::{FaceMetrics, FontMetrics};
pub use system::SystemFontClient;

use thiserror::Error;

use crate::types::{FontId, GlyphId, GlyphInfo, PointSize26Dot6};

/// Errors that can occur while loading fonts.
#[derive(Error, Debug)]
pub enum FontError {
    /// Reading a font file failed.
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data is not a font `swash` can parse.
    #[error("invalid font data")]
    InvalidFont,

    /// No face matched the requested family.
    #[error("no font found for family `{0}`")]
    FamilyNotFound(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// Font discovery and metrics consumed by the pipeline.
///
/// Font ids are opaque; `0` means "no font" and glyph index `0` is the
/// missing glyph.
pub trait FontService {
    /// Best default font for `character`.
    fn find_default_font(
        &mut self,
        character: char,
        point_size: PointSize26Dot6,
        prefer_color: bool,
    ) -> FontId;

    /// A font that can render `character`, preferring one close to `preferred`.
    fn find_fallback_font(
        &mut self,
        preferred: FontId,
        character: char,
        point_size: PointSize26Dot6,
        prefer_color: bool,
    ) -> FontId;

    fn point_size(&self, font_id: FontId) -> PointSize26Dot6;

    /// Glyph index of `character` in the font, `0` when unsupported.
    fn glyph_index(&self, font_id: FontId, character: char) -> GlyphId;

    /// Fill width, height, bearings and (when zero) the advance of each glyph.
    ///
    /// Bearings are added to any offsets already set by shaping. Glyphs with
    /// font id `0` are left untouched. Returns `false` if any glyph could
    /// not be measured.
    fn glyph_metrics(&mut self, glyphs: &mut [GlyphInfo], horizontal: bool) -> bool;

    fn font_metrics(&self, font_id: FontId) -> FontMetrics;

    /// The measured `'…'` glyph for the given point size.
    fn ellipsis_glyph(&mut self, point_size: PointSize26Dot6) -> GlyphInfo;
}
