//! Minimal markdown: only `**bold**` spans are interpreted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Strong(&'a str),
}

/// Split `text` into plain and strong segments.
///
/// A span opens at `**` and closes at the nearest following `**` on the same
/// line (`\n`, `\r`, U+2028 or U+2029 end a line). Concatenating the segments, with each strong segment wrapped back in
/// `**`, reproduces `text` exactly. Unmatched `**` stays plain.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while let Some(open) = text[pos..].find("**").map(|i| pos + i) {
        let body_start = open + 2;
        let line_end = text[body_start..]
            .find(LINE_BREAKS)
            .map_or(text.len(), |i| body_start + i);

        match text[body_start..line_end].find("**") {
            Some(i) => {
                let close = body_start + i;
                if open > plain_start {
                    out.push(Segment::Plain(&text[plain_start..open]));
                }
                out.push(Segment::Strong(&text[body_start..close]));
                pos = close + 2;
                plain_start = pos;
            }
            // No closing marker on this line, retry one character later
            None => pos = open + 1,
        }
    }

    if plain_start < text.len() {
        out.push(Segment::Plain(&text[plain_start..]));
    }
    out
}

/// Segments grouped per line, for renderers that lay out line by line
pub fn lines(text: &str) -> Vec<Vec<Segment<'_>>> {
    text.split('\n').map(segments).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Segment::{Plain, Strong};

    fn rebuild(segments: &[Segment<'_>]) -> String {
        segments
            .iter()
            .map(|s| match s {
                Plain(t) => t.to_string(),
                Strong(t) => format!("**{}**", t),
            })
            .collect()
    }

    #[test]
    fn test_leading_bold_word() {
        assert_eq!(
            segments("**Write** a blog post..."),
            vec![Strong("Write"), Plain(" a blog post...")]
        );
    }

    #[test]
    fn test_spans_are_non_greedy() {
        assert_eq!(
            segments("**a** and **b**"),
            vec![Strong("a"), Plain(" and "), Strong("b")]
        );
    }

    #[test]
    fn test_unmatched_markers_stay_literal() {
        assert_eq!(segments("a **b"), vec![Plain("a **b")]);
        assert_eq!(segments("**a** **"), vec![Strong("a"), Plain(" **")]);
        assert_eq!(segments("single *star*"), vec![Plain("single *star*")]);
    }

    #[test]
    fn test_span_does_not_cross_lines() {
        assert_eq!(segments("**a\nb**"), vec![Plain("**a\nb**")]);
        assert_eq!(
            lines("**one**\ntwo **three**"),
            vec![
                vec![Strong("one")],
                vec![Plain("two "), Strong("three")]
            ]
        );
    }

    #[test]
    fn test_span_does_not_cross_other_line_breaks() {
        assert_eq!(segments("**a\r\nb**"), vec![Plain("**a\r\nb**")]);
        assert_eq!(segments("**a\u{2028}b**"), vec![Plain("**a\u{2028}b**")]);
        assert_eq!(segments("**a**\r"), vec![Strong("a"), Plain("\r")]);
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(segments("x****y"), vec![Plain("x"), Strong(""), Plain("y")]);
    }

    #[test]
    fn test_no_other_characters_altered() {
        let samples = [
            "",
            "plain text",
            "**Bold** then _under_ and `code` # heading",
            "Unicode **día** ✓ and **",
            "***triple*** markers",
        ];
        for sample in samples {
            assert_eq!(rebuild(&segments(sample)), sample);
        }
    }
}
