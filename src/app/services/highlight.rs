//! Console line highlighting.
//!
//! Purely textual: every line is scanned the same way whatever lane it came
//! from. The view decides what each [`Highlight`] looks like.

use std::sync::LazyLock;

use regex_lite::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Error,
    Warning,
    Success,
    Link,
    Path,
}

impl Highlight {
    /// ANSI SGR code used by the terminal front end.
    pub fn ansi_code(self) -> &'static str {
        match self {
            Highlight::Error => "31",
            Highlight::Warning => "33",
            Highlight::Success => "32",
            Highlight::Link => "36;4",
            Highlight::Path => "34",
        }
    }
}

/// A run of text with an optional highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub style: Option<Highlight>,
}

/// Patterns in priority order; earlier wins when two matches start together.
static PATTERNS: LazyLock<Vec<(Highlight, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Highlight::Error,
            Regex::new(r"(?i)(?:error|failed|failure|fail|exception):").unwrap(),
        ),
        (Highlight::Warning, Regex::new(r"(?i)(?:warning|warn):").unwrap()),
        (
            Highlight::Success,
            Regex::new(r"(?i)(?:success|done|completed):").unwrap(),
        ),
        (Highlight::Link, Regex::new(r"https?://[^\s)\]]+").unwrap()),
        (
            Highlight::Path,
            Regex::new(r"(?:[A-Za-z0-9_.~-]*/)*[A-Za-z0-9_-]+\.[A-Za-z0-9]+").unwrap(),
        ),
    ]
});

/// Split `text` into plain and highlighted segments.
///
/// Matches never overlap: the earliest start wins, ties go to the pattern
/// listed first, and anything overlapping an accepted match is dropped.
pub fn highlight(text: &str) -> Vec<Segment<'_>> {
    let mut matches: Vec<(usize, usize, usize, Highlight)> = Vec::new();
    for (priority, (style, re)) in PATTERNS.iter().enumerate() {
        for m in re.find_iter(text) {
            matches.push((m.start(), priority, m.end(), *style));
        }
    }
    matches.sort_unstable_by_key(|&(start, priority, _, _)| (start, priority));

    let mut segments = Vec::new();
    let mut pos = 0;
    for (start, _, end, style) in matches {
        if start < pos {
            continue;
        }
        if start > pos {
            segments.push(Segment {
                text: &text[pos..start],
                style: None,
            });
        }
        segments.push(Segment {
            text: &text[start..end],
            style: Some(style),
        });
        pos = end;
    }
    if pos < text.len() {
        segments.push(Segment {
            text: &text[pos..],
            style: None,
        });
    }
    segments
}

/// Render a line with ANSI colours.
pub fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in highlight(text) {
        match segment.style {
            Some(style) => {
                out.push_str("\x1b[");
                out.push_str(style.ansi_code());
                out.push('m');
                out.push_str(segment.text);
                out.push_str("\x1b[0m");
            }
            None => out.push_str(segment.text),
        }
    }
    out
}
