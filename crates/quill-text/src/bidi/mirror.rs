//! Bidi_Mirroring_Glyph lookups.
//!
//! Covers the paired brackets, quotation marks and relational operators
//! that fonts commonly render without an `rtlm` feature.

/// Mirrored pairs; every entry maps both ways.
const MIRROR_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
    ('\u{00AB}', '\u{00BB}'), // « »
    ('\u{2039}', '\u{203A}'), // ‹ ›
    ('\u{2045}', '\u{2046}'),
    ('\u{207D}', '\u{207E}'),
    ('\u{208D}', '\u{208E}'),
    ('\u{2208}', '\u{220B}'), // ∈ ∋
    ('\u{2209}', '\u{220C}'),
    ('\u{220A}', '\u{220D}'),
    ('\u{2264}', '\u{2265}'), // ≤ ≥
    ('\u{2266}', '\u{2267}'),
    ('\u{226A}', '\u{226B}'),
    ('\u{2282}', '\u{2283}'), // ⊂ ⊃
    ('\u{2286}', '\u{2287}'),
    ('\u{2308}', '\u{2309}'),
    ('\u{230A}', '\u{230B}'),
    ('\u{2329}', '\u{232A}'),
    ('\u{27E6}', '\u{27E7}'),
    ('\u{27E8}', '\u{27E9}'),
    ('\u{27EA}', '\u{27EB}'),
    ('\u{2983}', '\u{2984}'),
    ('\u{2985}', '\u{2986}'),
    ('\u{3008}', '\u{3009}'), // 〈 〉
    ('\u{300A}', '\u{300B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{3014}', '\u{3015}'),
    ('\u{3016}', '\u{3017}'),
    ('\u{3018}', '\u{3019}'),
    ('\u{301A}', '\u{301B}'),
    ('\u{FF08}', '\u{FF09}'),
    ('\u{FF1C}', '\u{FF1E}'),
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF5B}', '\u{FF5D}'),
    ('\u{FF5F}', '\u{FF60}'),
    ('\u{FF62}', '\u{FF63}'),
];

/// The mirror image of `ch`, if it has one.
pub fn mirrored_char(ch: char) -> Option<char> {
    MIRROR_PAIRS.iter().find_map(|&(open, close)| {
        if ch == open {
            Some(close)
        } else if ch == close {
            Some(open)
        } else {
            None
        }
    })
}

/// Return the mirrored counterpart of `ch`, or `ch` unchanged.
pub fn mirrored_bracket(ch: char) -> char {
    mirrored_char(ch).unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_parentheses() {
        assert_eq!(mirrored_bracket('('), ')');
        assert_eq!(mirrored_bracket(')'), '(');
    }

    #[test]
    fn mirrors_brackets_and_guillemets() {
        assert_eq!(mirrored_bracket('['), ']');
        assert_eq!(mirrored_bracket('}'), '{');
        assert_eq!(mirrored_bracket('«'), '»');
        assert_eq!(mirrored_bracket('≤'), '≥');
    }

    #[test]
    fn leaves_non_mirrorable_unchanged() {
        assert_eq!(mirrored_char('a'), None);
        assert_eq!(mirrored_bracket('א'), 'א');
    }
}
