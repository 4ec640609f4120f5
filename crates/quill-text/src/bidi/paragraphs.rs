//! Paragraph and line level glue between the text model and
//! [`BidirectionalSupport`].

use crate::bidi::BidirectionalSupport;
use crate::segmentation::LineBreakInfo;
use crate::types::{
    BidirectionalLineInfoRun, BidirectionalParagraphInfoRun, CharacterDirection, CharacterRun,
    Length, LineIndex, LineRun, ScriptRun,
};

/// Analyse every paragraph that contains right to left script.
///
/// A paragraph is the text up to and including a mandatory line break; the
/// last character of the text always closes one.
pub fn set_bidirectional_info(
    support: &mut BidirectionalSupport,
    text: &[char],
    scripts: &[ScriptRun],
    line_breaks: &[LineBreakInfo],
) -> Vec<BidirectionalParagraphInfoRun> {
    let mut paragraphs = Vec::new();
    let mut paragraph_start = 0;

    for script_run in scripts {
        let script_end = script_run.character_run.end();
        if !script_run.script.is_right_to_left() || script_end <= paragraph_start {
            continue;
        }

        // A script run may span several paragraphs, and a paragraph may
        // hold several right to left runs.
        let mut index = paragraph_start;
        while index < text.len() && paragraph_start < script_end {
            let must_break =
                line_breaks.get(index) == Some(&LineBreakInfo::MustBreak) || index + 1 == text.len();
            if must_break {
                if index >= script_run.character_run.character_index {
                    let character_run =
                        CharacterRun::new(paragraph_start, index - paragraph_start + 1);
                    let bidirectional_info_index = support
                        .create_info(&text[character_run.character_index..character_run.end()]);
                    paragraphs.push(BidirectionalParagraphInfoRun {
                        character_run,
                        bidirectional_info_index,
                        direction: support.paragraph_direction(bidirectional_info_index),
                    });
                }
                paragraph_start = index + 1;
            }
            index += 1;
        }
    }

    paragraphs
}

/// Lines overlapping `paragraph`, searched from `line_index` on.
fn paragraph_lines(
    paragraph: &BidirectionalParagraphInfoRun,
    lines: &[LineRun],
    line_index: LineIndex,
) -> (LineIndex, Length) {
    let mut first_line = line_index;
    let mut number_of_lines = 0;
    let paragraph_end = paragraph.character_run.end();

    for line in lines.iter().skip(line_index) {
        if line.character_run.end() > paragraph.character_run.character_index
            && paragraph_end > line.character_run.character_index
        {
            number_of_lines += 1;
        } else if paragraph_end <= line.character_run.character_index {
            break;
        } else if number_of_lines == 0 {
            first_line += 1;
        }
    }

    (first_line, number_of_lines)
}

/// Build the visual order of every line belonging to a bidirectional
/// paragraph and set each line's direction.
///
/// A line crossing paragraph boundaries (single line layouts) gets one run
/// per paragraph, clipped to the paragraph.
pub fn reorder_lines(
    support: &BidirectionalSupport,
    paragraphs: &[BidirectionalParagraphInfoRun],
    lines: &mut [LineRun],
) -> Vec<BidirectionalLineInfoRun> {
    let mut line_runs = Vec::new();
    let mut line_index = 0;

    for paragraph in paragraphs {
        let direction = support.paragraph_direction(paragraph.bidirectional_info_index);
        let (first_line, number_of_lines) = paragraph_lines(paragraph, lines, line_index);
        line_index = first_line + number_of_lines;

        for line in &mut lines[first_line..first_line + number_of_lines] {
            line.direction = direction;

            let start = line
                .character_run
                .character_index
                .max(paragraph.character_run.character_index);
            let end = line.character_run.end().min(paragraph.character_run.end());
            let character_run = CharacterRun::new(start, end - start);

            let visual_to_logical_map = support.reorder(
                paragraph.bidirectional_info_index,
                start - paragraph.character_run.character_index,
                character_run.number_of_characters,
            );
            line_runs.push(BidirectionalLineInfoRun {
                character_run,
                visual_to_logical_map,
                direction,
            });
        }

        // The next paragraph may start on the last line of this one.
        line_index = line_index.saturating_sub(1).max(first_line);
    }

    line_runs
}

/// Copy of `text` with mirrorable characters of right to left runs replaced.
///
/// Returns the text and whether anything changed.
pub fn get_mirrored_text(
    support: &BidirectionalSupport,
    text: &[char],
    paragraphs: &[BidirectionalParagraphInfoRun],
) -> (Vec<char>, bool) {
    let mut mirrored = text.to_vec();
    let mut updated = false;

    for paragraph in paragraphs {
        let run = paragraph.character_run;
        if let Some(slice) = mirrored.get_mut(run.character_index..run.end()) {
            updated |= support.mirrored_text(paragraph.bidirectional_info_index, slice);
        }
    }

    (mirrored, updated)
}

/// Direction of every character of the text. Characters outside the
/// analysed paragraphs are left to right.
pub fn get_characters_direction(
    support: &BidirectionalSupport,
    paragraphs: &[BidirectionalParagraphInfoRun],
    number_of_characters: Length,
) -> Vec<CharacterDirection> {
    let mut directions = vec![false; number_of_characters];

    for paragraph in paragraphs {
        let run = paragraph.character_run;
        let paragraph_directions = support.characters_direction(paragraph.bidirectional_info_index);
        if let Some(slice) = directions.get_mut(run.character_index..run.end()) {
            for (direction, value) in slice.iter_mut().zip(paragraph_directions) {
                *direction = value;
            }
        }
    }

    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multilanguage::set_scripts;
    use crate::segmentation::{set_line_break_info, UnicodeBreakService};
    use crate::types::GlyphRun;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn analyse(
        support: &mut BidirectionalSupport,
        text: &[char],
    ) -> Vec<BidirectionalParagraphInfoRun> {
        let scripts = set_scripts(text);
        let breaks = set_line_break_info(&mut UnicodeBreakService, text);
        set_bidirectional_info(support, text, &scripts, &breaks)
    }

    fn line(character_index: usize, number_of_characters: usize) -> LineRun {
        LineRun {
            glyph_run: GlyphRun::new(character_index, number_of_characters),
            character_run: CharacterRun::new(character_index, number_of_characters),
            ..Default::default()
        }
    }

    #[test]
    fn latin_text_has_no_paragraphs() {
        let mut support = BidirectionalSupport::new();
        assert!(analyse(&mut support, &chars("Hello\nworld")).is_empty());
        assert!(support.is_empty());
    }

    #[test]
    fn only_paragraphs_with_rtl_script_are_analysed() {
        let mut support = BidirectionalSupport::new();
        let text = chars("Hello\nשלום עולם\nworld\nابجد");
        let paragraphs = analyse(&mut support, &text);

        let ranges: Vec<_> = paragraphs
            .iter()
            .map(|p| (p.character_run.character_index, p.character_run.number_of_characters))
            .collect();
        assert_eq!(ranges, vec![(6, 10), (22, 4)]);
        assert!(paragraphs.iter().all(|p| p.direction));
    }

    #[test]
    fn reorders_lines_of_rtl_paragraphs() {
        let mut support = BidirectionalSupport::new();
        let text = chars("abc\nאבג def");
        let paragraphs = analyse(&mut support, &text);
        assert_eq!(paragraphs.len(), 1);

        let mut lines = vec![line(0, 4), line(4, 4), line(8, 3)];
        let runs = reorder_lines(&support, &paragraphs, &mut lines);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].character_run, CharacterRun::new(4, 4));
        assert_eq!(runs[0].visual_to_logical_map, vec![3, 2, 1, 0]);
        assert_eq!(runs[1].character_run, CharacterRun::new(8, 3));
        assert_eq!(runs[1].visual_to_logical_map, vec![0, 1, 2]);
        assert!(!lines[0].direction);
        assert!(lines[1].direction && lines[2].direction);
    }

    #[test]
    fn single_line_is_clipped_to_the_paragraph() {
        let mut support = BidirectionalSupport::new();
        let text = chars("abc\nאבג");
        let paragraphs = analyse(&mut support, &text);

        let mut lines = vec![line(0, 7)];
        let runs = reorder_lines(&support, &paragraphs, &mut lines);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].character_run, CharacterRun::new(4, 3));
        assert_eq!(runs[0].visual_to_logical_map, vec![2, 1, 0]);
    }

    #[test]
    fn mirrors_and_directions() {
        let mut support = BidirectionalSupport::new();
        let text = chars("(a)\nא(ב)");
        let paragraphs = analyse(&mut support, &text);

        let (mirrored, updated) = get_mirrored_text(&support, &text, &paragraphs);
        assert!(updated);
        assert_eq!(mirrored, chars("(a)\nא)ב("));

        let directions = get_characters_direction(&support, &paragraphs, text.len());
        assert_eq!(directions.len(), text.len());
        assert!(directions[..4].iter().all(|d| !d));
        assert!(directions[4..].iter().all(|d| *d));
    }
}
