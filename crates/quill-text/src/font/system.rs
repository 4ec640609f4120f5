use std::sync::Arc;

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::font::{metrics::points_to_pixels, FontError, FontFace, FontMetrics, FontService, Result};
use crate::shaping::shaper::missing_glyphs;
use crate::shaping::{shape_with_face, ShapedGlyph, Shaper};
use crate::types::{FontId, GlyphId, GlyphInfo, PointSize26Dot6, DEFAULT_POINT_SIZE};
use crate::unicode::Script;

const ELLIPSIS: char = '\u{2026}';
const DEFAULT_DPI: f32 = 96.0;

/// A face at one point size, addressed by `FontId - 1`.
#[derive(Debug, Clone)]
struct FontEntry {
    face_id: ID,
    face: Arc<FontFace>,
    point_size: PointSize26Dot6,
}

/// Font service over the fonts installed on the system.
///
/// Discovery goes through `fontdb`, per-face data (coverage, metrics,
/// outlines) through `swash`, and shaping through `harfrust`. Font ids are
/// interned per (face, point size) pair and stay valid for the lifetime of
/// the client.
pub struct SystemFontClient {
    db: Database,
    dpi: f32,
    /// Parsed faces; `None` marks data swash could not read.
    faces: HashMap<ID, Option<Arc<FontFace>>>,
    fonts: Vec<FontEntry>,
    font_ids: HashMap<(ID, PointSize26Dot6), FontId>,
    ellipsis: HashMap<PointSize26Dot6, GlyphInfo>,
    default_face: Option<ID>,
}

impl SystemFontClient {
    /// Client over every font installed on the system.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::with_database(db)
    }

    /// Client over an already populated database.
    pub fn with_database(db: Database) -> Self {
        debug!(faces = db.len(), "font database ready");
        Self {
            db,
            dpi: DEFAULT_DPI,
            faces: HashMap::new(),
            fonts: Vec::new(),
            font_ids: HashMap::new(),
            ellipsis: HashMap::new(),
            default_face: None,
        }
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Change the resolution used to convert points to pixels.
    ///
    /// Cached ellipsis glyphs are dropped since their metrics depend on it.
    pub fn set_dpi(&mut self, dpi: f32) {
        self.dpi = dpi;
        self.ellipsis.clear();
    }

    /// Register font data (TTF/OTF/TTC) in memory.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.default_face = None;
    }

    /// Intern the best face of `family` at `point_size`.
    pub fn font_for_family(&mut self, family: &str, point_size: PointSize26Dot6) -> Result<FontId> {
        let id = self
            .db
            .query(&Query {
                families: &[Family::Name(family)],
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
            .ok_or_else(|| FontError::FamilyNotFound(family.to_string()))?;
        self.intern(id, point_size).ok_or(FontError::InvalidFont)
    }

    /// Parsed face behind a font id.
    pub fn face(&self, font_id: FontId) -> Option<Arc<FontFace>> {
        self.entry(font_id).map(|entry| entry.face.clone())
    }

    fn entry(&self, font_id: FontId) -> Option<&FontEntry> {
        let index = (font_id as usize).checked_sub(1)?;
        self.fonts.get(index)
    }

    fn pixel_size(&self, entry: &FontEntry) -> f32 {
        points_to_pixels(entry.point_size, self.dpi)
    }

    fn load_face(&mut self, id: ID) -> Option<Arc<FontFace>> {
        if let Some(face) = self.faces.get(&id) {
            return face.clone();
        }

        let loaded = self
            .db
            .with_face_data(id, |data, index| FontFace::from_vec(data.to_vec(), index as usize));
        let face = match loaded {
            Some(Ok(face)) => Some(Arc::new(face)),
            Some(Err(err)) => {
                warn!(?err, ?id, "failed to parse font face");
                None
            }
            None => None,
        };
        self.faces.insert(id, face.clone());
        face
    }

    fn intern(&mut self, id: ID, point_size: PointSize26Dot6) -> Option<FontId> {
        if let Some(font_id) = self.font_ids.get(&(id, point_size)) {
            return Some(*font_id);
        }

        let face = self.load_face(id)?;
        self.fonts.push(FontEntry {
            face_id: id,
            face,
            point_size,
        });
        let font_id = self.fonts.len() as FontId;
        self.font_ids.insert((id, point_size), font_id);
        Some(font_id)
    }

    fn default_face_id(&mut self) -> Option<ID> {
        if self.default_face.is_none() {
            self.default_face = self.db.query(&Query {
                families: &[
                    Family::SansSerif,
                    Family::Name("Segoe UI"),
                    Family::Name("SF Pro Text"),
                    Family::Name("Arial"),
                ],
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            });
        }
        self.default_face.or_else(|| self.db.faces().next().map(|face| face.id))
    }

    fn family_of(&self, id: ID) -> Option<String> {
        self.db
            .face(id)
            .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
    }
}

impl Default for SystemFontClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FontService for SystemFontClient {
    fn find_default_font(
        &mut self,
        character: char,
        point_size: PointSize26Dot6,
        prefer_color: bool,
    ) -> FontId {
        let Some(id) = self.default_face_id() else {
            warn!("no fonts available");
            return 0;
        };

        let covers = self.load_face(id).is_some_and(|face| face.has_glyph(character));
        if !covers {
            let fallback = self.find_fallback_font(0, character, point_size, prefer_color);
            if fallback != 0 {
                return fallback;
            }
        }
        self.intern(id, point_size).unwrap_or(0)
    }

    fn find_fallback_font(
        &mut self,
        preferred: FontId,
        character: char,
        point_size: PointSize26Dot6,
        prefer_color: bool,
    ) -> FontId {
        let preferred_family = self
            .entry(preferred)
            .map(|entry| entry.face_id)
            .and_then(|id| self.family_of(id));

        let mut candidates: Vec<(u8, ID)> = self
            .db
            .faces()
            .map(|info| {
                let family = info.families.first().map(|(name, _)| name.as_str()).unwrap_or("");
                let mut rank = 2;
                if preferred_family.as_deref() == Some(family) {
                    rank = 1;
                }
                if prefer_color && family.contains("Emoji") {
                    rank = 0;
                }
                (rank, info.id)
            })
            .collect();
        candidates.sort_by_key(|(rank, _)| *rank);

        for (_, id) in candidates {
            if self.load_face(id).is_some_and(|face| face.has_glyph(character)) {
                return self.intern(id, point_size).unwrap_or(0);
            }
        }

        debug!(?character, "no fallback font covers character");
        0
    }

    fn point_size(&self, font_id: FontId) -> PointSize26Dot6 {
        self.entry(font_id)
            .map(|entry| entry.point_size)
            .unwrap_or(DEFAULT_POINT_SIZE)
    }

    fn glyph_index(&self, font_id: FontId, character: char) -> GlyphId {
        self.entry(font_id)
            .map(|entry| entry.face.glyph_id(character))
            .unwrap_or(0)
    }

    fn glyph_metrics(&mut self, glyphs: &mut [GlyphInfo], horizontal: bool) -> bool {
        if !horizontal {
            warn!("vertical glyph metrics are not supported");
            return false;
        }

        let mut success = true;
        for glyph in glyphs.iter_mut() {
            if glyph.font_id == 0 {
                continue;
            }
            let Some(entry) = self.entry(glyph.font_id) else {
                success = false;
                continue;
            };
            let Ok(glyph_id) = u16::try_from(glyph.index) else {
                success = false;
                continue;
            };

            let px = self.pixel_size(entry);
            let bounds = entry.face.glyph_bounds(glyph_id, px);
            glyph.width = bounds.width;
            glyph.height = bounds.height;
            glyph.x_bearing += bounds.x_bearing;
            glyph.y_bearing += bounds.y_bearing;
            if glyph.advance == 0.0 {
                glyph.advance = entry.face.advance(glyph_id, px);
            }
            glyph.scale_factor = 1.0;
        }
        success
    }

    fn font_metrics(&self, font_id: FontId) -> FontMetrics {
        self.entry(font_id)
            .map(|entry| entry.face.metrics().scale_from_points(entry.point_size, self.dpi))
            .unwrap_or_default()
    }

    fn ellipsis_glyph(&mut self, point_size: PointSize26Dot6) -> GlyphInfo {
        if let Some(glyph) = self.ellipsis.get(&point_size) {
            return *glyph;
        }

        let font_id = self.find_default_font(ELLIPSIS, point_size, false);
        let mut glyph = GlyphInfo::new(font_id, self.glyph_index(font_id, ELLIPSIS));
        self.glyph_metrics(core::slice::from_mut(&mut glyph), true);
        self.ellipsis.insert(point_size, glyph);
        glyph
    }
}

impl Shaper for SystemFontClient {
    fn shape(&mut self, text: &[char], font_id: FontId, script: Script) -> Vec<ShapedGlyph> {
        match self.entry(font_id) {
            Some(entry) => {
                let px = self.pixel_size(entry);
                shape_with_face(&entry.face, font_id, px, text, script)
            }
            None => missing_glyphs(text.len(), font_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_client() -> SystemFontClient {
        SystemFontClient::with_database(Database::new())
    }

    #[test]
    fn empty_database_has_no_default_font() {
        let mut client = empty_client();
        assert_eq!(client.find_default_font('A', DEFAULT_POINT_SIZE, false), 0);
        assert_eq!(client.find_fallback_font(0, 'A', DEFAULT_POINT_SIZE, false), 0);
    }

    #[test]
    fn unknown_font_ids_are_inert() {
        let mut client = empty_client();
        assert_eq!(client.point_size(7), DEFAULT_POINT_SIZE);
        assert_eq!(client.glyph_index(7, 'A'), 0);
        assert_eq!(client.font_metrics(7), FontMetrics::default());

        let mut glyphs = [GlyphInfo::new(0, 3)];
        assert!(client.glyph_metrics(&mut glyphs, true));
        assert_eq!(glyphs[0], GlyphInfo::new(0, 3));

        let mut glyphs = [GlyphInfo::new(7, 3)];
        assert!(!client.glyph_metrics(&mut glyphs, true));
    }

    #[test]
    fn missing_family_is_an_error() {
        let mut client = empty_client();
        let err = client.font_for_family("Nope Sans", DEFAULT_POINT_SIZE).unwrap_err();
        assert!(matches!(err, FontError::FamilyNotFound(name) if name == "Nope Sans"));
    }

    #[test]
    fn shaping_without_a_face_emits_missing_glyphs() {
        let mut client = empty_client();
        let glyphs = client.shape(&['a', 'b'], 3, Script::Latin);
        assert_eq!(glyphs.len(), 2);
        assert!(glyphs.iter().all(|g| g.glyph.index == 0));
        assert_eq!(glyphs[1].character_index, 1);
    }
}
