use core::cmp::Ordering;

use unicode_script::{Script as UScript, UnicodeScript};

/// Writing system of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Valid for all scripts, e.g. white space or `'\n'`.
    Common,
    Cyrillic,
    Greek,
    Latin,
    Arabic,
    Hebrew,
    Armenian,
    Georgian,
    /// Han ideographs and CJK symbols.
    Cjk,
    Hangul,
    Hiragana,
    Katakana,
    Bopomofo,
    Bengali,
    Burmese,
    Devanagari,
    Gujarati,
    Gurmukhi,
    Kannada,
    Malayalam,
    Oriya,
    Sinhala,
    Tamil,
    Telugu,
    Lao,
    Thai,
    Khmer,
    Emoji,
    Unknown,
}

impl Script {
    /// Only Arabic and Hebrew are laid out right to left.
    pub fn is_right_to_left(self) -> bool {
        matches!(self, Script::Arabic | Script::Hebrew)
    }

    /// ISO 15924 tag used to drive the shaper, when one applies.
    pub fn iso15924_tag(self) -> Option<&'static [u8; 4]> {
        let tag = match self {
            Script::Cyrillic => b"Cyrl",
            Script::Greek => b"Grek",
            Script::Latin => b"Latn",
            Script::Arabic => b"Arab",
            Script::Hebrew => b"Hebr",
            Script::Armenian => b"Armn",
            Script::Georgian => b"Geor",
            Script::Cjk => b"Hani",
            Script::Hangul => b"Hang",
            Script::Hiragana => b"Hira",
            Script::Katakana => b"Kana",
            Script::Bopomofo => b"Bopo",
            Script::Bengali => b"Beng",
            Script::Burmese => b"Mymr",
            Script::Devanagari => b"Deva",
            Script::Gujarati => b"Gujr",
            Script::Gurmukhi => b"Guru",
            Script::Kannada => b"Knda",
            Script::Malayalam => b"Mlym",
            Script::Oriya => b"Orya",
            Script::Sinhala => b"Sinh",
            Script::Tamil => b"Taml",
            Script::Telugu => b"Telu",
            Script::Lao => b"Laoo",
            Script::Thai => b"Thai",
            Script::Khmer => b"Khmr",
            Script::Common | Script::Emoji | Script::Unknown => return None,
        };
        Some(tag)
    }
}

/// Code points shown as emoji, sorted and non-overlapping. Most of them
/// are `Common` in the Unicode script property.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x20E3, 0x20E3),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2B55),
    (0x1F170, 0x1F6C5),
    (0x1F900, 0x1F9FF),
];

fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .binary_search_by(|&(start, end)| {
            if end < cp {
                Ordering::Less
            } else if start > cp {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// Intrinsic script of a character.
///
/// White space, punctuation, digits, marks and other characters shared by
/// every script return [`Script::Common`]. Scripts the pipeline has no
/// value for return [`Script::Unknown`].
pub fn character_script(c: char) -> Script {
    if is_emoji(c) {
        return Script::Emoji;
    }

    match c.script() {
        UScript::Common | UScript::Inherited => Script::Common,
        UScript::Latin => Script::Latin,
        UScript::Greek => Script::Greek,
        UScript::Cyrillic => Script::Cyrillic,
        UScript::Armenian => Script::Armenian,
        UScript::Hebrew => Script::Hebrew,
        UScript::Arabic => Script::Arabic,
        UScript::Georgian => Script::Georgian,
        UScript::Han => Script::Cjk,
        UScript::Hangul => Script::Hangul,
        UScript::Hiragana => Script::Hiragana,
        UScript::Katakana => Script::Katakana,
        UScript::Bopomofo => Script::Bopomofo,
        UScript::Bengali => Script::Bengali,
        UScript::Myanmar => Script::Burmese,
        UScript::Devanagari => Script::Devanagari,
        UScript::Gujarati => Script::Gujarati,
        UScript::Gurmukhi => Script::Gurmukhi,
        UScript::Kannada => Script::Kannada,
        UScript::Malayalam => Script::Malayalam,
        UScript::Oriya => Script::Oriya,
        UScript::Sinhala => Script::Sinhala,
        UScript::Tamil => Script::Tamil,
        UScript::Telugu => Script::Telugu,
        UScript::Lao => Script::Lao,
        UScript::Thai => Script::Thai,
        UScript::Khmer => Script::Khmer,
        _ => Script::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_ranges_are_sorted_and_disjoint() {
        for pair in EMOJI_RANGES.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0);
        }
    }

    #[test]
    fn classifies_common_scripts() {
        assert_eq!(character_script('a'), Script::Latin);
        assert_eq!(character_script('ж'), Script::Cyrillic);
        assert_eq!(character_script('א'), Script::Hebrew);
        assert_eq!(character_script('ب'), Script::Arabic);
        assert_eq!(character_script('こ'), Script::Hiragana);
        assert_eq!(character_script('カ'), Script::Katakana);
        assert_eq!(character_script('世'), Script::Cjk);
        assert_eq!(character_script('한'), Script::Hangul);
        assert_eq!(character_script('ก'), Script::Thai);
        assert_eq!(character_script('क'), Script::Devanagari);
    }

    #[test]
    fn neutral_and_emoji_characters() {
        assert_eq!(character_script(' '), Script::Common);
        assert_eq!(character_script('\n'), Script::Common);
        assert_eq!(character_script('\u{200F}'), Script::Common);
        assert_eq!(character_script('\u{200D}'), Script::Common);
        assert_eq!(character_script(','), Script::Common);
        assert_eq!(character_script('7'), Script::Common);
        assert_eq!(character_script('\u{2014}'), Script::Common);
        assert_eq!(character_script('\u{3002}'), Script::Common);
        assert_eq!(character_script('\u{00A9}'), Script::Emoji);
        assert_eq!(character_script('\u{2122}'), Script::Emoji);
        assert_eq!(character_script('\u{2121}'), Script::Common);
        assert_eq!(character_script('\u{212B}'), Script::Latin);
        assert_eq!(character_script('\u{1F600}'), Script::Emoji);
    }

    #[test]
    fn unmapped_is_unknown() {
        assert_eq!(character_script('\u{1200}'), Script::Unknown);
        assert_eq!(character_script('\u{10000}'), Script::Unknown);
    }

    #[test]
    fn right_to_left_scripts() {
        assert!(Script::Arabic.is_right_to_left());
        assert!(Script::Hebrew.is_right_to_left());
        assert!(!Script::Latin.is_right_to_left());
        assert!(!Script::Common.is_right_to_left());
    }
}
