use tracing::trace;
use unicode_bidi::{BidiClass, BidiInfo, Level, LTR_LEVEL};

use crate::bidi::mirror::mirrored_char;
use crate::types::{BidiInfoIndex, CharacterDirection, CharacterIndex, Length};

/// UAX-9 analysis of one paragraph, stored per character.
#[derive(Debug, Clone)]
struct ParagraphBidi {
    classes: Vec<BidiClass>,
    levels: Vec<Level>,
    level: Level,
}

impl ParagraphBidi {
    fn analyse(paragraph: &[char]) -> Self {
        let text: String = paragraph.iter().collect();

        // A chunk ending in CR LF is split by the algorithm into two
        // paragraphs; both must share the level of the first one.
        let info = BidiInfo::new(&text, None);
        let level = info.paragraphs.first().map(|p| p.level).unwrap_or(LTR_LEVEL);
        let info = if info.paragraphs.len() > 1 {
            BidiInfo::new(&text, Some(level))
        } else {
            info
        };

        let (classes, levels) = text
            .char_indices()
            .map(|(offset, _)| (info.original_classes[offset], info.levels[offset]))
            .unzip();

        Self {
            classes,
            levels,
            level,
        }
    }
}

/// Strong direction of a bidi class; `None` for neutral and weak classes
/// other than numbers and number separators.
fn strong_direction(class: BidiClass) -> Option<CharacterDirection> {
    match class {
        BidiClass::L | BidiClass::EN | BidiClass::AN | BidiClass::ES | BidiClass::ET => Some(false),
        BidiClass::R | BidiClass::AL => Some(true),
        _ => None,
    }
}

/// Rule L1: separators, and white space before them or at the end of the
/// line, go back to the paragraph level.
fn reset_white_space_levels(classes: &[BidiClass], levels: &mut [Level], paragraph_level: Level) {
    let mut white_space_start: Option<usize> = None;

    for (index, class) in classes.iter().enumerate() {
        match class {
            BidiClass::B | BidiClass::S => {
                let start = white_space_start.unwrap_or(index);
                levels[start..=index].fill(paragraph_level);
                white_space_start = None;
            }
            BidiClass::WS
            | BidiClass::BN
            | BidiClass::LRE
            | BidiClass::RLE
            | BidiClass::LRO
            | BidiClass::RLO
            | BidiClass::PDF
            | BidiClass::LRI
            | BidiClass::RLI
            | BidiClass::FSI
            | BidiClass::PDI => {
                white_space_start.get_or_insert(index);
            }
            _ => white_space_start = None,
        }
    }

    if let Some(start) = white_space_start {
        levels[start..].fill(paragraph_level);
    }
}

/// Arena of analysed paragraphs.
///
/// Each paragraph containing right to left text is analysed once with
/// [`create_info`](Self::create_info) and addressed afterwards by the
/// returned index. Released slots are reused.
#[derive(Debug, Default)]
pub struct BidirectionalSupport {
    paragraphs: Vec<Option<ParagraphBidi>>,
    free_indices: Vec<BidiInfoIndex>,
}

impl BidirectionalSupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyse a paragraph and keep the result.
    pub fn create_info(&mut self, paragraph: &[char]) -> BidiInfoIndex {
        let info = ParagraphBidi::analyse(paragraph);

        let index = match self.free_indices.pop() {
            Some(index) => {
                self.paragraphs[index] = Some(info);
                index
            }
            None => {
                self.paragraphs.push(Some(info));
                self.paragraphs.len() - 1
            }
        };
        trace!(index, characters = paragraph.len(), "bidi info created");
        index
    }

    /// Release the analysis stored at `index`. Unknown indices are ignored.
    pub fn destroy_info(&mut self, index: BidiInfoIndex) {
        if let Some(slot) = self.paragraphs.get_mut(index) {
            if slot.take().is_some() {
                self.free_indices.push(index);
            }
        }
    }

    /// Release every analysis.
    pub fn clear(&mut self) {
        self.paragraphs.clear();
        self.free_indices.clear();
    }

    /// Number of live analyses.
    pub fn len(&self) -> usize {
        self.paragraphs.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn info(&self, index: BidiInfoIndex) -> Option<&ParagraphBidi> {
        let info = self.paragraphs.get(index).and_then(Option::as_ref);
        debug_assert!(info.is_some(), "invalid bidi info index {index}");
        info
    }

    /// Visual to logical map of the line `[first, first + len)` of the
    /// paragraph, relative to `first`.
    pub fn reorder(
        &self,
        index: BidiInfoIndex,
        first: CharacterIndex,
        len: Length,
    ) -> Vec<CharacterIndex> {
        let Some(info) = self.info(index) else {
            return (0..len).collect();
        };

        let end = first + len;
        debug_assert!(end <= info.levels.len(), "line exceeds its paragraph");
        if end > info.levels.len() {
            return (0..len).collect();
        }

        let mut levels = info.levels[first..end].to_vec();
        reset_white_space_levels(&info.classes[first..end], &mut levels, info.level);
        BidiInfo::reorder_visual(&levels)
    }

    /// Replace mirrorable characters resolved to a right to left level by
    /// their mirror image. Returns whether any character changed.
    pub fn mirrored_text(&self, index: BidiInfoIndex, text: &mut [char]) -> bool {
        let Some(info) = self.info(index) else {
            return false;
        };

        let mut updated = false;
        for (character, level) in text.iter_mut().zip(info.levels.iter()) {
            if !level.is_rtl() {
                continue;
            }
            if let Some(mirrored) = mirrored_char(*character) {
                *character = mirrored;
                updated = true;
            }
        }
        updated
    }

    /// Whether the paragraph is right to left.
    pub fn paragraph_direction(&self, index: BidiInfoIndex) -> CharacterDirection {
        self.info(index).is_some_and(|info| info.level.is_rtl())
    }

    /// Direction of every character of the paragraph.
    ///
    /// Runs of neutral characters take the direction shared by the strong
    /// characters around them, or the paragraph direction when those differ.
    pub fn characters_direction(&self, index: BidiInfoIndex) -> Vec<CharacterDirection> {
        let Some(info) = self.info(index) else {
            return Vec::new();
        };

        let paragraph_direction = info.level.is_rtl();
        let count = info.classes.len();
        let mut directions = vec![false; count];
        let mut previous = paragraph_direction;
        let mut index = 0;

        while index < count {
            if let Some(direction) = strong_direction(info.classes[index]) {
                directions[index] = direction;
                previous = direction;
                index += 1;
                continue;
            }

            let next_index = (index + 1..count)
                .find(|&next| strong_direction(info.classes[next]).is_some())
                .unwrap_or(count);
            let next = info
                .classes
                .get(next_index)
                .and_then(|class| strong_direction(*class))
                .unwrap_or(paragraph_direction);

            let direction = if previous == next {
                previous
            } else {
                paragraph_direction
            };
            directions[index..next_index].fill(direction);
            previous = direction;
            index = next_index;
        }

        directions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn ltr_paragraph_with_rtl_word() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("abc אבג"));
        assert!(!support.paragraph_direction(index));
        assert_eq!(support.reorder(index, 0, 7), vec![0, 1, 2, 3, 6, 5, 4]);
        assert_eq!(
            support.characters_direction(index),
            vec![false, false, false, false, true, true, true]
        );
    }

    #[test]
    fn rtl_paragraph_with_ltr_word() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("אבג abc"));
        assert!(support.paragraph_direction(index));
        assert_eq!(support.reorder(index, 0, 7), vec![4, 5, 6, 3, 2, 1, 0]);
    }

    #[test]
    fn trailing_white_space_goes_to_paragraph_level() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("אבג abc def"));
        // Line "abc " of an RTL paragraph: the space is visually leftmost.
        assert_eq!(support.reorder(index, 4, 4), vec![3, 0, 1, 2]);
    }

    #[test]
    fn neutrals_between_different_directions_take_the_paragraph_direction() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("אב , cd , גד"));
        let directions = support.characters_direction(index);
        assert_eq!(directions.len(), 12);
        assert!(directions[2] && directions[3] && directions[4]);
        assert!(!directions[5] && !directions[6]);
        assert!(directions[7] && directions[8] && directions[9]);
    }

    #[test]
    fn mirrors_only_rtl_characters() {
        let mut support = BidirectionalSupport::new();
        let rtl = support.create_info(&chars("אב(ג)"));
        let mut text = chars("אב(ג)");
        assert!(support.mirrored_text(rtl, &mut text));
        assert_eq!(text, chars("אב)ג("));

        let ltr = support.create_info(&chars("ab(c) א"));
        let mut text = chars("ab(c) א");
        assert!(!support.mirrored_text(ltr, &mut text));
        assert_eq!(text, chars("ab(c) א"));
    }

    #[test]
    fn crlf_paragraph_keeps_first_level() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("אב ab\r\n"));
        assert!(support.paragraph_direction(index));
        assert_eq!(support.characters_direction(index).len(), 7);
    }

    #[test]
    fn slots_are_reused() {
        let mut support = BidirectionalSupport::new();
        let first = support.create_info(&chars("א"));
        let second = support.create_info(&chars("ב"));
        assert_eq!((first, second), (0, 1));

        support.destroy_info(first);
        support.destroy_info(first);
        assert_eq!(support.len(), 1);
        assert_eq!(support.create_info(&chars("ג")), 0);
        assert_eq!(support.create_info(&chars("ד")), 2);

        support.clear();
        assert!(support.is_empty());
        assert_eq!(support.create_info(&chars("ה")), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid bidi info index")]
    fn destroyed_index_is_a_contract_violation() {
        let mut support = BidirectionalSupport::new();
        let index = support.create_info(&chars("א"));
        support.destroy_info(index);
        support.reorder(index, 0, 1);
    }
}
