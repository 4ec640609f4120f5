//! Unicode utilities for quill-text.
//!
//! Character classification used across the pipeline: white space, new
//! paragraph and script-neutral characters, and scripts.

pub mod script;

pub use script::{character_script, Script};

const WHITE_SPACE_THRESHOLD: u32 = 0x21;

const CHAR_LF: char = '\u{000A}';
const CHAR_VT: char = '\u{000B}';
const CHAR_FF: char = '\u{000C}';
const CHAR_CR: char = '\u{000D}';
const CHAR_NEL: char = '\u{0085}';
const CHAR_LS: char = '\u{2028}';
const CHAR_PS: char = '\u{2029}';

/// Every code point below U+0021 counts as white space for layout.
pub fn is_white_space(c: char) -> bool {
    (c as u32) < WHITE_SPACE_THRESHOLD
}

/// Characters that end a paragraph.
pub fn is_new_paragraph(c: char) -> bool {
    matches!(
        c,
        CHAR_LF | CHAR_VT | CHAR_FF | CHAR_CR | CHAR_NEL | CHAR_LS | CHAR_PS
    )
}

/// Characters valid for every script: white space, punctuation, digits,
/// zero width characters, directional marks and new paragraph characters.
pub fn is_common_script(c: char) -> bool {
    character_script(c) == Script::Common
}

pub fn is_right_to_left_script(script: Script) -> bool {
    script.is_right_to_left()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_white_space_and_paragraphs() {
        assert!(is_white_space(' '));
        assert!(is_white_space('\t'));
        assert!(!is_white_space('a'));
        assert!(is_new_paragraph('\n'));
        assert!(is_new_paragraph('\u{2029}'));
        assert!(is_right_to_left_script(Script::Hebrew));
        assert!(!is_new_paragraph(' '));
    }

    #[test]
    fn punctuation_and_digits_are_common() {
        assert!(is_common_script(' '));
        assert!(is_common_script('\u{200D}'));
        assert!(is_common_script('\u{2009}'));
        assert!(is_common_script(','));
        assert!(is_common_script('1'));
        assert!(!is_common_script('a'));
        assert!(!is_common_script('\u{1F600}'));
    }
}
