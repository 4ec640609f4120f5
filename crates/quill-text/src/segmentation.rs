//! Per-character line and word break classes.
//!
//! The break iteration itself is delegated to a [`BreakService`]; the
//! default [`UnicodeBreakService`] uses UAX-14 via `unicode-linebreak`
//! and UAX-29 word boundaries via `unicode-segmentation`.

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Line break opportunity after a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LineBreakInfo {
    /// A line must end after this character (new paragraph or end of text).
    MustBreak = 0,
    /// A line may end after this character.
    AllowBreak = 1,
    NoBreak = 2,
}

/// Word boundary after a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WordBreakInfo {
    /// The character ends a word (or a non-word segment).
    Break = 0,
    NoBreak = 1,
}

/// Source of Unicode break opportunities.
///
/// Implementations return one entry per input character.
pub trait BreakService {
    fn line_break_positions(&mut self, text: &[char]) -> Vec<LineBreakInfo>;
    fn word_break_positions(&mut self, text: &[char]) -> Vec<WordBreakInfo>;
}

/// Break service backed by the `unicode-linebreak` and
/// `unicode-segmentation` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeBreakService;

impl UnicodeBreakService {
    pub fn new() -> Self {
        Self
    }
}

/// Byte offset one past each character of `text`.
fn char_end_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, c)| offset + c.len_utf8())
        .collect()
}

impl BreakService for UnicodeBreakService {
    fn line_break_positions(&mut self, text: &[char]) -> Vec<LineBreakInfo> {
        let utf8: String = text.iter().collect();
        let ends = char_end_offsets(&utf8);
        let mut info = vec![LineBreakInfo::NoBreak; text.len()];

        // `linebreaks` reports the byte offset after the break, which is the
        // end of the character the break follows.
        for (offset, opportunity) in linebreaks(&utf8) {
            if let Ok(index) = ends.binary_search(&offset) {
                info[index] = match opportunity {
                    BreakOpportunity::Mandatory => LineBreakInfo::MustBreak,
                    BreakOpportunity::Allowed => LineBreakInfo::AllowBreak,
                };
            }
        }

        info
    }

    fn word_break_positions(&mut self, text: &[char]) -> Vec<WordBreakInfo> {
        let utf8: String = text.iter().collect();
        let ends = char_end_offsets(&utf8);
        let mut info = vec![WordBreakInfo::NoBreak; text.len()];

        for (offset, segment) in utf8.split_word_bound_indices() {
            if let Ok(index) = ends.binary_search(&(offset + segment.len())) {
                info[index] = WordBreakInfo::Break;
            }
        }

        info
    }
}

/// Compute the line break class of every character.
///
/// Empty text returns an empty vector without calling the service.
pub fn set_line_break_info(service: &mut dyn BreakService, text: &[char]) -> Vec<LineBreakInfo> {
    if text.is_empty() {
        return Vec::new();
    }

    let info = service.line_break_positions(text);
    debug_assert_eq!(info.len(), text.len(), "one line break entry per character");
    info
}

/// Compute the word break class of every character.
///
/// Empty text returns an empty vector without calling the service.
pub fn set_word_break_info(service: &mut dyn BreakService, text: &[char]) -> Vec<WordBreakInfo> {
    if text.is_empty() {
        return Vec::new();
    }

    let info = service.word_break_positions(text);
    debug_assert_eq!(info.len(), text.len(), "one word break entry per character");
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn line_string(text: &str) -> String {
        set_line_break_info(&mut UnicodeBreakService, &chars(text))
            .into_iter()
            .map(|info| char::from(b'0' + info as u8))
            .collect()
    }

    fn word_string(text: &str) -> String {
        set_word_break_info(&mut UnicodeBreakService, &chars(text))
            .into_iter()
            .map(|info| char::from(b'0' + info as u8))
            .collect()
    }

    struct CountingService {
        calls: usize,
    }

    impl BreakService for CountingService {
        fn line_break_positions(&mut self, text: &[char]) -> Vec<LineBreakInfo> {
            self.calls += 1;
            vec![LineBreakInfo::NoBreak; text.len()]
        }

        fn word_break_positions(&mut self, text: &[char]) -> Vec<WordBreakInfo> {
            self.calls += 1;
            vec![WordBreakInfo::NoBreak; text.len()]
        }
    }

    #[test]
    fn latin_line_breaks() {
        assert_eq!(line_string("Hello world"), "22222122220");
    }

    #[test]
    fn newline_is_mandatory() {
        assert_eq!(line_string("Hello\nworld"), "22222022220");
    }

    #[test]
    fn japanese_breaks_between_every_character() {
        assert_eq!(line_string("こんにちは世界"), "1111110");
    }

    #[test]
    fn latin_word_breaks() {
        assert_eq!(word_string("Hello world"), "11110011110");
    }

    #[test]
    fn chinese_word_breaks() {
        assert_eq!(word_string("你好世界"), "0000");
    }

    #[test]
    fn empty_text_skips_the_service() {
        let mut service = CountingService { calls: 0 };
        assert!(set_line_break_info(&mut service, &[]).is_empty());
        assert!(set_word_break_info(&mut service, &[]).is_empty());
        assert_eq!(service.calls, 0);
    }

    #[test]
    fn output_length_matches_input() {
        let text = chars("a, b; c\u{2029}d");
        assert_eq!(set_line_break_info(&mut UnicodeBreakService, &text).len(), text.len());
        assert_eq!(set_word_break_info(&mut UnicodeBreakService, &text).len(), text.len());
    }
}
