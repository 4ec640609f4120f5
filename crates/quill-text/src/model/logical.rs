use crate::segmentation::{LineBreakInfo, WordBreakInfo};
use crate::types::{
    BidirectionalLineInfoRun, BidirectionalParagraphInfoRun, CharacterDirection, CharacterIndex,
    FontRun, ScriptRun,
};
use crate::unicode::Script;

/// Per-character data of the text in logical order.
///
/// `character_directions` is empty when the text holds no right to left
/// script; the visual/logical maps are empty when no line needs reordering.
#[derive(Debug, Clone, Default)]
pub struct LogicalModel {
    pub text: Vec<char>,
    pub script_runs: Vec<ScriptRun>,
    /// Validated fonts covering the whole text.
    pub font_runs: Vec<FontRun>,
    pub line_break_info: Vec<LineBreakInfo>,
    pub word_break_info: Vec<WordBreakInfo>,
    pub bidirectional_paragraph_info: Vec<BidirectionalParagraphInfoRun>,
    pub bidirectional_line_info: Vec<BidirectionalLineInfoRun>,
    pub character_directions: Vec<CharacterDirection>,
    visual_to_logical_map: Vec<CharacterIndex>,
    logical_to_visual_map: Vec<CharacterIndex>,
    visual_to_logical_cursor_map: Vec<CharacterIndex>,
}

impl LogicalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_characters(&self) -> usize {
        self.text.len()
    }

    /// Script of the character at `index`, `Unknown` outside the text.
    pub fn script(&self, index: CharacterIndex) -> Script {
        let position = self
            .script_runs
            .partition_point(|run| run.character_run.end() <= index);
        match self.script_runs.get(position) {
            Some(run) if run.character_run.contains(index) => run.script,
            _ => Script::Unknown,
        }
    }

    /// Direction of the character at `index`; left to right when the text
    /// has no right to left script.
    pub fn character_direction(&self, index: CharacterIndex) -> CharacterDirection {
        self.character_directions
            .get(index)
            .copied()
            .unwrap_or(false)
    }

    /// Build the whole-text conversion tables from the reordered lines.
    ///
    /// Characters not covered by a line run map to themselves. An empty
    /// slice clears the tables.
    pub fn set_visual_to_logical_map(&mut self, line_runs: &[BidirectionalLineInfoRun]) {
        self.visual_to_logical_map.clear();
        self.logical_to_visual_map.clear();
        self.visual_to_logical_cursor_map.clear();

        if line_runs.is_empty() {
            return;
        }

        let number_of_characters = self.text.len();
        self.visual_to_logical_map.reserve(number_of_characters);

        for run in line_runs {
            let start = run.character_run.character_index;
            while self.visual_to_logical_map.len() < start {
                let index = self.visual_to_logical_map.len();
                self.visual_to_logical_map.push(index);
            }
            self.visual_to_logical_map
                .extend(run.visual_to_logical_map.iter().map(|&logical| start + logical));
        }
        while self.visual_to_logical_map.len() < number_of_characters {
            let index = self.visual_to_logical_map.len();
            self.visual_to_logical_map.push(index);
        }
        self.visual_to_logical_map.truncate(number_of_characters);

        self.logical_to_visual_map = vec![0; number_of_characters];
        for (visual, &logical) in self.visual_to_logical_map.iter().enumerate() {
            if let Some(slot) = self.logical_to_visual_map.get_mut(logical) {
                *slot = visual;
            }
        }

        self.build_cursor_map();
    }

    /// Logical cursor position for each of the `n + 1` visual cursor
    /// positions.
    fn build_cursor_map(&mut self) {
        let number_of_characters = self.text.len();
        let mut paragraphs = self.bidirectional_paragraph_info.iter().peekable();
        let mut is_rtl_paragraph = false;

        for index in 0..=number_of_characters {
            if let Some(paragraph) = paragraphs.peek() {
                if paragraph.character_run.character_index == index {
                    is_rtl_paragraph = self.character_direction(index);
                }
            }

            let logical = if index == 0 {
                if is_rtl_paragraph { number_of_characters } else { 0 }
            } else if index == number_of_characters {
                if is_rtl_paragraph { 0 } else { number_of_characters }
            } else {
                let logical0 = self.visual_to_logical_map[index - 1];
                let logical1 = self.visual_to_logical_map[index];
                let direction0 = self.character_direction(logical0);
                let direction1 = self.character_direction(logical1);

                if direction0 == direction1 {
                    if direction0 { logical0 } else { logical1 }
                } else if is_rtl_paragraph {
                    if direction1 { logical1 + 1 } else { logical0 }
                } else if direction0 {
                    logical1
                } else {
                    logical0 + 1
                }
            };
            self.visual_to_logical_cursor_map.push(logical);

            if let Some(paragraph) = paragraphs.peek() {
                if paragraph.character_run.end() == index {
                    is_rtl_paragraph = false;
                    paragraphs.next();
                }
            }
        }
    }

    /// Logical index of the character shown at visual position `visual`.
    pub fn logical_character_index(&self, visual: CharacterIndex) -> CharacterIndex {
        self.visual_to_logical_map
            .get(visual)
            .copied()
            .unwrap_or(visual)
    }

    /// Visual position of the character at logical index `logical`.
    pub fn visual_character_index(&self, logical: CharacterIndex) -> CharacterIndex {
        self.logical_to_visual_map
            .get(logical)
            .copied()
            .unwrap_or(logical)
    }

    /// Logical cursor position for a visual cursor position.
    pub fn logical_cursor_index(&self, visual_cursor: CharacterIndex) -> CharacterIndex {
        self.visual_to_logical_cursor_map
            .get(visual_cursor)
            .copied()
            .unwrap_or(visual_cursor)
    }

    pub fn visual_to_logical_map(&self) -> &[CharacterIndex] {
        &self.visual_to_logical_map
    }

    /// Reset everything derived from the text.
    pub fn clear_derived(&mut self) {
        self.script_runs.clear();
        self.font_runs.clear();
        self.line_break_info.clear();
        self.word_break_info.clear();
        self.bidirectional_paragraph_info.clear();
        self.bidirectional_line_info.clear();
        self.character_directions.clear();
        self.visual_to_logical_map.clear();
        self.logical_to_visual_map.clear();
        self.visual_to_logical_cursor_map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CharacterRun;

    fn model(text: &str) -> LogicalModel {
        LogicalModel {
            text: text.chars().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn script_lookup() {
        let mut model = model("abc אבג");
        model.script_runs = vec![
            ScriptRun {
                character_run: CharacterRun::new(0, 4),
                script: Script::Latin,
            },
            ScriptRun {
                character_run: CharacterRun::new(4, 3),
                script: Script::Hebrew,
            },
        ];

        assert_eq!(model.script(0), Script::Latin);
        assert_eq!(model.script(3), Script::Latin);
        assert_eq!(model.script(4), Script::Hebrew);
        assert_eq!(model.script(6), Script::Hebrew);
        assert_eq!(model.script(7), Script::Unknown);
    }

    #[test]
    fn maps_default_to_identity() {
        let model = model("abc");
        assert_eq!(model.logical_character_index(2), 2);
        assert_eq!(model.visual_character_index(1), 1);
        assert!(!model.character_direction(0));
    }

    #[test]
    fn whole_text_maps_from_line_runs() {
        // "ab אבג": one line, LTR paragraph with an RTL word at the end.
        let mut model = model("ab אבג");
        model.character_directions = vec![false, false, false, true, true, true];
        model.bidirectional_paragraph_info = vec![BidirectionalParagraphInfoRun {
            character_run: CharacterRun::new(0, 6),
            bidirectional_info_index: 0,
            direction: false,
        }];
        model.set_visual_to_logical_map(&[BidirectionalLineInfoRun {
            character_run: CharacterRun::new(3, 3),
            visual_to_logical_map: vec![2, 1, 0],
            direction: false,
        }]);

        assert_eq!(model.visual_to_logical_map(), &[0, 1, 2, 5, 4, 3]);
        assert_eq!(model.visual_character_index(5), 3);
        assert_eq!(model.logical_character_index(3), 5);

        // Between the space and the RTL word the cursor follows the space.
        assert_eq!(model.logical_cursor_index(0), 0);
        assert_eq!(model.logical_cursor_index(3), 3);
        assert_eq!(model.logical_cursor_index(6), 6);

        model.set_visual_to_logical_map(&[]);
        assert!(model.visual_to_logical_map().is_empty());
        assert_eq!(model.logical_character_index(3), 3);
    }
}
