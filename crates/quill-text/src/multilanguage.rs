//! Script segmentation and per-script font validation.

use hashbrown::HashMap;
use tracing::{trace, warn};

use crate::font::FontService;
use crate::types::{CharacterRun, FontId, FontRun, ScriptRun, DEFAULT_POINT_SIZE};
use crate::unicode::{character_script, is_common_script, is_new_paragraph, Script};

const UTF32_A: char = 'A';

/// Split `text` into runs of characters sharing a script.
///
/// Characters valid for every script (white space, punctuation, digits,
/// zero width characters and directional marks) are merged into a
/// neighbour:
///
/// * at the start of a paragraph they join the first script that follows;
/// * at the end of a paragraph they join the last script;
/// * between two scripts of the same direction they join the previous one;
/// * between scripts of different directions they join the run whose
///   direction matches the first script of the paragraph.
///
/// Text made only of such characters is tagged [`Script::Latin`].
pub fn set_scripts(text: &[char]) -> Vec<ScriptRun> {
    let mut scripts = Vec::new();
    if text.is_empty() {
        return scripts;
    }

    let mut current = ScriptRun {
        character_run: CharacterRun::new(0, 0),
        script: Script::Unknown,
    };

    let mut is_first_script_to_be_set = true;
    let mut is_paragraph_rtl = false;
    // Characters valid for all scripts waiting to be assigned to a run.
    let mut pending_common = 0;

    for &character in text {
        let script = character_script(character);

        if script == Script::Common {
            pending_common += 1;
            if is_new_paragraph(character) {
                is_first_script_to_be_set = true;
                if current.script != Script::Unknown {
                    current.character_run.number_of_characters += pending_common;
                    pending_common = 0;
                }
            }
            continue;
        }

        if is_first_script_to_be_set && script != Script::Unknown {
            is_paragraph_rtl = script.is_right_to_left();
            is_first_script_to_be_set = false;
        }

        if script != current.script {
            let current_rtl = current.script.is_right_to_left();
            if current.script != Script::Unknown
                && (is_paragraph_rtl == current_rtl || current_rtl == script.is_right_to_left())
            {
                current.character_run.number_of_characters += pending_common;
                pending_common = 0;
            }

            if current.character_run.number_of_characters != 0 {
                scripts.push(current);
            }

            current = ScriptRun {
                character_run: CharacterRun::new(current.character_run.end(), pending_common + 1),
                script,
            };
            pending_common = 0;
        } else {
            if current.script != Script::Unknown {
                current.character_run.number_of_characters += pending_common;
                pending_common = 0;
            }
            current.character_run.number_of_characters += 1;
        }
    }

    current.character_run.number_of_characters += pending_common;
    debug_assert!(current.character_run.number_of_characters != 0);

    if current.script == Script::Unknown {
        // Only script-neutral characters in the last run.
        current.script = Script::Latin;
        if let Some(last) = scripts.last_mut().filter(|last| last.script == Script::Latin) {
            last.character_run.number_of_characters += current.character_run.number_of_characters;
            return scripts;
        }
    }

    scripts.push(current);
    scripts
}

/// Cursor over sorted runs, advanced as character indices increase.
struct RunCursor<'a, T> {
    runs: &'a [T],
    position: usize,
}

impl<'a, T> RunCursor<'a, T> {
    fn new(runs: &'a [T]) -> Self {
        Self { runs, position: 0 }
    }

    /// The run containing `index`, if any. Runs ending at or before `index`
    /// are skipped.
    fn find(&mut self, index: usize, run_of: impl Fn(&T) -> CharacterRun) -> Option<&'a T> {
        while let Some(run) = self.runs.get(self.position) {
            if run_of(run).end() > index {
                break;
            }
            self.position += 1;
        }
        self.runs
            .get(self.position)
            .filter(|run| run_of(run).contains(index))
    }
}

/// Validates that fonts cover the characters they are assigned to and
/// replaces them with a default font otherwise.
///
/// Decisions are cached per script for the lifetime of the instance; call
/// [`MultilanguageSupport::clear_caches`] when the font configuration or
/// DPI changes.
#[derive(Debug, Default)]
pub struct MultilanguageSupport {
    default_font_per_script: HashMap<Script, FontId>,
    valid_fonts_per_script: HashMap<Script, Vec<FontId>>,
}

impl MultilanguageSupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached default font for `script`, `0` when none has been chosen yet.
    pub fn default_font(&self, script: Script) -> FontId {
        self.default_font_per_script.get(&script).copied().unwrap_or(0)
    }

    pub fn clear_caches(&mut self) {
        self.default_font_per_script.clear();
        self.valid_fonts_per_script.clear();
    }

    fn is_valid_font(&self, script: Script, font_id: FontId, character: char) -> bool {
        let found = |script: Script| {
            self.valid_fonts_per_script
                .get(&script)
                .is_some_and(|fonts| fonts.contains(&font_id))
        };
        found(script) || (is_common_script(character) && found(Script::Common))
    }

    /// Replace `font_runs` with validated runs covering the whole text.
    ///
    /// The incoming runs are the fonts requested by the application; gaps
    /// and font id `0` mean "use a default font". The output is coalesced by
    /// font id and whether the font was chosen by the validator.
    pub fn validate_fonts(
        &mut self,
        fonts: &mut dyn FontService,
        text: &[char],
        scripts: &[ScriptRun],
        font_runs: &mut Vec<FontRun>,
    ) {
        if text.is_empty() {
            return;
        }

        let user_fonts = std::mem::take(font_runs);
        let mut font_cursor = RunCursor::new(&user_fonts);
        let mut script_cursor = RunCursor::new(scripts);

        let mut current = FontRun::default();

        for (index, &character) in text.iter().enumerate() {
            let mut font_id = font_cursor
                .find(index, |run| run.character_run)
                .map(|run| run.font_id)
                .unwrap_or(0);
            let mut script = script_cursor
                .find(index, |run| run.character_run)
                .map(|run| run.script)
                .unwrap_or(Script::Unknown);

            if script == Script::Unknown {
                warn!(index, ?character, "unknown script, using latin");
                script = Script::Latin;
            }

            let is_default = font_id == 0;
            let preferred = font_id;
            let mut point_size = DEFAULT_POINT_SIZE;

            if !is_default
                && font_id != self.default_font(script)
                && !self.is_valid_font(script, font_id, character)
            {
                if fonts.glyph_index(font_id, character) == 0 {
                    point_size = fonts.point_size(font_id);
                    font_id = 0;
                } else {
                    // A font covering a shared character says nothing about the
                    // run's script.
                    let cache_script = if is_common_script(character) {
                        Script::Common
                    } else {
                        script
                    };
                    self.valid_fonts_per_script
                        .entry(cache_script)
                        .or_default()
                        .push(font_id);
                }
            }

            if font_id == 0 {
                font_id = self.default_font(script);
                if font_id == 0 {
                    let prefer_color = script == Script::Emoji;
                    font_id = fonts.find_fallback_font(preferred, character, point_size, prefer_color);
                    if font_id == 0 {
                        font_id = self.default_font(Script::Latin);
                    }
                    if font_id == 0 {
                        font_id = fonts.find_default_font(UTF32_A, point_size, false);
                    }
                    trace!(?script, font_id, "caching default font");
                    self.default_font_per_script.insert(script, font_id);
                }
            }

            if font_id != current.font_id || is_default != current.is_default {
                if current.character_run.number_of_characters != 0 {
                    font_runs.push(current);
                }
                current = FontRun {
                    character_run: CharacterRun::new(current.character_run.end(), 0),
                    font_id,
                    is_default,
                };
            }
            current.character_run.number_of_characters += 1;
        }

        if current.character_run.number_of_characters != 0 {
            font_runs.push(current);
        }
    }
}
