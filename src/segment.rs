// Segmentation of summary text into paragraphs, bullets and sentences
//
// Splits free-form text into an ordered list of segments and puts it
// back together again. Blank lines are kept verbatim so that the
// paragraph layout of a summary survives cleanup untouched.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Leading indent, marker, and the whitespace after it are the "marker"
    static ref BULLET_LINE: Regex =
        Regex::new(r"^(\s*(?:[-*+•]|\d{1,3}[.)])\s+)(.*)$").expect("valid bullet regex");

    // A marker followed by actual text, anywhere a unit could start
    static ref MARKER_START: Regex =
        Regex::new(r"^\s*(?:[-*+•]|\d{1,3}[.)])\s+\S").expect("valid marker regex");

    // Terminal punctuation (plus closing quotes/brackets) that ends a sentence.
    // Latin terminators need trailing whitespace or end of line, CJK ones don't.
    static ref SENTENCE_END: Regex = Regex::new(
        r#"[.!?…]+["'”’)\]»]*(?:\s+|$)|[。！？]+["'”’)\]»」』]*\s*"#
    )
    .expect("valid sentence regex");

    static ref TERMINATED: Regex =
        Regex::new(r#"(?:[.!?…]+["'”’)\]»]*|[。！？]+["'”’)\]»」』]*)$"#)
            .expect("valid terminator regex");
}

/// One piece of a summary, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A whole bullet line. `marker` holds the indent, the marker itself
    /// and the whitespace after it, exactly as written.
    Bullet { marker: String, text: String },
    /// A sentence-like unit of prose. A sentence wrapped over several lines
    /// keeps its inner line breaks in `text`. `indent` is `Some` (holding
    /// the line's leading whitespace) when the sentence opens a line.
    Sentence { text: String, indent: Option<String> },
    /// A blank (or whitespace-only) line, kept verbatim.
    ParagraphBreak(String),
}

impl Segment {
    /// Content units are everything that can be deduplicated.
    pub fn is_content(&self) -> bool {
        !matches!(self, Segment::ParagraphBreak(_))
    }

    /// Text of the unit as written, bullet marker included.
    pub fn raw(&self) -> String {
        match self {
            Segment::Bullet { marker, text } => format!("{}{}", marker, text),
            Segment::Sentence { text, .. } => text.clone(),
            Segment::ParagraphBreak(raw) => raw.clone(),
        }
    }

    /// Prose with no closing punctuation. Written directly before another
    /// prose line it would read back as one wrapped sentence.
    pub fn is_open_ended(&self) -> bool {
        match self {
            Segment::Sentence { text, .. } => {
                !MARKER_START.is_match(text) && !TERMINATED.is_match(text)
            }
            _ => false,
        }
    }

    /// Text used for comparison: bullet markers are not part of the content.
    pub fn content(&self) -> &str {
        match self {
            Segment::Bullet { text, .. } => text,
            Segment::Sentence { text, .. } => strip_marker(text),
            Segment::ParagraphBreak(_) => "",
        }
    }
}

/// Drop a leading bullet marker, if the text has one followed by content.
pub fn strip_marker(text: &str) -> &str {
    match BULLET_LINE.captures(text) {
        Some(caps) if MARKER_START.is_match(text) => {
            caps.get(2).map_or(text, |m| m.as_str())
        }
        _ => text,
    }
}

/// Returns true for lines that separate paragraphs.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a run of prose lines into sentences.
///
/// Sentences may span line breaks. A unit that opens with a bullet marker
/// mid-line ("... 2) Rest early.") takes the rest of its line, the same way
/// a bullet line would.
fn split_run(run: &str) -> Vec<Segment> {
    let mut sentences = Vec::new();

    let body = run.trim_start();
    let mut pos = run.len() - body.len();
    let mut indent = Some(run[..pos].to_string());

    while pos < run.len() {
        let rest = &run[pos..];

        let end = if MARKER_START.is_match(rest) {
            rest.find('\n').unwrap_or(rest.len())
        } else {
            SENTENCE_END.find(rest).map_or(rest.len(), |m| m.end())
        };

        let text = rest[..end].trim_end();
        let tail = &rest[end..];
        let next = end + (tail.len() - tail.trim_start().len());
        let gap = &rest[text.len()..next];

        sentences.push(Segment::Sentence {
            text: text.to_string(),
            indent: indent.take(),
        });

        // Whitespace spanning a line break means the next sentence opens a line
        if let Some(nl) = gap.rfind('\n') {
            indent = Some(gap[nl + 1..].to_string());
        }
        pos += next;
    }

    sentences
}

/// Split prose into sentence-like units.
pub fn split_sentences(text: &str) -> Vec<String> {
    split_run(text)
        .into_iter()
        .map(|seg| match seg {
            Segment::Sentence { text, .. } => text,
            other => other.raw(),
        })
        .collect()
}

/// Split text into segments.
///
/// Each whitespace-only line becomes a [`Segment::ParagraphBreak`]. A line
/// starting with a bullet marker becomes a single [`Segment::Bullet`] and is
/// never split further. Consecutive other lines form a prose run that is
/// split into sentences as a whole. Empty input yields no segments.
pub fn segment(text: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if is_blank(line) {
            flush_run(&mut run, &mut segments);
            segments.push(Segment::ParagraphBreak(line.to_string()));
            continue;
        }

        if let Some(caps) = BULLET_LINE.captures(line) {
            let text = caps[2].trim_end();
            if !text.is_empty() {
                flush_run(&mut run, &mut segments);
                segments.push(Segment::Bullet {
                    marker: caps[1].to_string(),
                    text: text.to_string(),
                });
                continue;
            }
        }

        run.push(line);
    }
    flush_run(&mut run, &mut segments);

    segments
}

fn flush_run(run: &mut Vec<&str>, segments: &mut Vec<Segment>) {
    if !run.is_empty() {
        segments.extend(split_run(&run.join("\n")));
        run.clear();
    }
}

/// CJK sentences are written without a separating space.
fn needs_space(line: &str) -> bool {
    let trimmed = line.trim_end_matches(['"', '\'', '”', '’', ')', ']', '»', '」', '』']);
    !trimmed.ends_with(['。', '！', '？'])
}

/// Join segments back into text.
///
/// Sentences that continue a line are joined to it with a single space,
/// sentences that open a line get their indent back, bullets get a line
/// each, and paragraph breaks are written back as-is.
pub fn reassemble(segments: &[Segment]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut open: Option<String> = None;

    for seg in segments {
        match seg {
            Segment::Sentence { text, indent: None } if open.is_some() => {
                if let Some(line) = open.as_mut() {
                    if needs_space(line) {
                        line.push(' ');
                    }
                    line.push_str(text);
                }
            }
            Segment::Sentence { text, indent } => {
                lines.extend(open.take());
                open = Some(format!("{}{}", indent.as_deref().unwrap_or(""), text));
            }
            other => {
                lines.extend(open.take());
                lines.push(other.raw());
            }
        }
    }
    lines.extend(open.take());

    lines.join("\n")
}

/// Number of paragraphs, i.e. maximal runs of content between blank lines.
pub fn count_paragraphs(segments: &[Segment]) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;

    for seg in segments {
        if seg.is_content() {
            if !in_paragraph {
                count += 1;
                in_paragraph = true;
            }
        } else {
            in_paragraph = false;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening(text: &str) -> Segment {
        Segment::Sentence {
            text: text.to_string(),
            indent: Some(String::new()),
        }
    }

    fn continuing(text: &str) -> Segment {
        Segment::Sentence {
            text: text.to_string(),
            indent: None,
        }
    }

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        assert_eq!(
            split_sentences("Stay calm! Rest well. Why not?"),
            vec!["Stay calm!", "Rest well.", "Why not?"]
        );
    }

    #[test]
    fn test_split_sentences_trailing_fragment() {
        assert_eq!(
            split_sentences("Done. and then some"),
            vec!["Done.", "and then some"]
        );
    }

    #[test]
    fn test_split_sentences_ignores_decimals() {
        assert_eq!(
            split_sentences("Energy rises 3.5 points. Good."),
            vec!["Energy rises 3.5 points.", "Good."]
        );
    }

    #[test]
    fn test_split_sentences_closing_quote() {
        assert_eq!(
            split_sentences("She said \"go.\" Then rest."),
            vec!["She said \"go.\"", "Then rest."]
        );
    }

    #[test]
    fn test_split_sentences_cjk() {
        assert_eq!(split_sentences("保持冷静。多喝水。"), vec!["保持冷静。", "多喝水。"]);
    }

    #[test]
    fn test_split_sentences_marker_takes_rest_of_line() {
        assert_eq!(
            split_sentences("Plan ahead. 2) Rest early. Sleep well."),
            vec!["Plan ahead.", "2) Rest early. Sleep well."]
        );
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("- Hydrate well."), "Hydrate well.");
        assert_eq!(strip_marker("12. Rest"), "Rest");
        assert_eq!(strip_marker("3.5 points"), "3.5 points");
        assert_eq!(strip_marker("-"), "-");
    }

    #[test]
    fn test_segment_empty() {
        assert!(segment("").is_empty());
        assert_eq!(reassemble(&[]), "");
    }

    #[test]
    fn test_segment_bullets() {
        let segments = segment("- Take a walk.\n* Rest\n2) Hydrate well.");
        assert_eq!(
            segments,
            vec![
                Segment::Bullet {
                    marker: "- ".to_string(),
                    text: "Take a walk.".to_string()
                },
                Segment::Bullet {
                    marker: "* ".to_string(),
                    text: "Rest".to_string()
                },
                Segment::Bullet {
                    marker: "2) ".to_string(),
                    text: "Hydrate well.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_bullet_is_not_split_into_sentences() {
        let segments = segment("- One. Two. Three.");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content(), "One. Two. Three.");
    }

    #[test]
    fn test_bold_text_is_not_a_bullet() {
        let segments = segment("**Focus** today.");
        assert_eq!(segments, vec![opening("**Focus** today.")]);
    }

    #[test]
    fn test_segment_paragraph_breaks() {
        let segments = segment("A.\n\n  \nB.");
        assert_eq!(
            segments,
            vec![
                opening("A."),
                Segment::ParagraphBreak(String::new()),
                Segment::ParagraphBreak("  ".to_string()),
                opening("B."),
            ]
        );
        assert_eq!(count_paragraphs(&segments), 2);
    }

    #[test]
    fn test_reassemble_round_trip() {
        let text = "Intro line. Second sentence.\n- Bullet one.\n  - Nested bullet\nAfter list.\n\nNext paragraph!";
        assert_eq!(reassemble(&segment(text)), text);
    }

    #[test]
    fn test_wrapped_sentence_is_one_unit() {
        let segments = segment("Rest well and stay\nhydrated today. Drink water.");
        assert_eq!(
            segments,
            vec![opening("Rest well and stay\nhydrated today."), continuing("Drink water.")]
        );
        assert_eq!(
            reassemble(&segments),
            "Rest well and stay\nhydrated today. Drink water."
        );
    }

    #[test]
    fn test_sentence_after_line_break_opens_line() {
        let segments = segment("One.\n  Two. Three.");
        assert_eq!(
            segments,
            vec![
                opening("One."),
                Segment::Sentence {
                    text: "Two.".to_string(),
                    indent: Some("  ".to_string())
                },
                continuing("Three."),
            ]
        );
    }

    #[test]
    fn test_prose_indent_preserved() {
        assert_eq!(reassemble(&segment("  Indented. Still here.")), "  Indented. Still here.");
        assert_eq!(
            reassemble(&segment("Intro.\n    Wrapped and\n    indented.")),
            "Intro.\n    Wrapped and\n    indented."
        );
    }

    #[test]
    fn test_marker_unit_stops_at_line_end() {
        assert_eq!(
            split_sentences("Plan ahead. 2) Rest early.\nSleep well."),
            vec!["Plan ahead.", "2) Rest early.", "Sleep well."]
        );
    }

    #[test]
    fn test_raw_includes_marker() {
        let segments = segment("  - Hydrate well.");
        assert_eq!(segments[0].raw(), "  - Hydrate well.");
        assert_eq!(segments[0].content(), "Hydrate well.");
    }

    #[test]
    fn test_open_ended_sentences() {
        let segments = segment("Done. stay observant\n- Item\n2) Rest early");
        let open: Vec<bool> = segments.iter().map(Segment::is_open_ended).collect();
        assert_eq!(open, vec![false, true, false, false]);
    }

    #[test]
    fn test_reassemble_trailing_newline() {
        assert_eq!(reassemble(&segment("Done.\n")), "Done.\n");
    }

    #[test]
    fn test_reassemble_normalizes_crlf_and_spacing() {
        assert_eq!(reassemble(&segment("A.   B.\r\nC.")), "A. B.\nC.");
    }

    #[test]
    fn test_reassemble_cjk_without_spaces() {
        assert_eq!(reassemble(&segment("保持冷静。多喝水。")), "保持冷静。多喝水。");
    }

    #[test]
    fn test_sentence_after_bullet_starts_new_line() {
        let segments = vec![
            Segment::Bullet {
                marker: "- ".to_string(),
                text: "Item".to_string(),
            },
            continuing("Tail."),
        ];
        assert_eq!(reassemble(&segments), "- Item\nTail.");
    }
}
