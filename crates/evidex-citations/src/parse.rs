//! Citation marker parsing.
//!
//! Markers are `[[N]]` or grouped `[[N,M,...]]`; adjacent markers such as
//! `[[1]][[2]]` are simply separate markers. Offsets are byte offsets into
//! the text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[\s*(\d+(?:\s*,\s*\d+)*)\s*\]\]").expect("citation marker pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMarker {
    pub span: Range<usize>,
    /// Cited numbers in written order. Values too large for `u64` saturate.
    pub numbers: Vec<u64>,
}

impl CitationMarker {
    pub fn render(numbers: &[u64]) -> String {
        let joined: Vec<String> = numbers.iter().map(u64::to_string).collect();
        format!("[[{}]]", joined.join(","))
    }
}

/// One distinct cited number and where it first appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Citation {
    pub number: u64,
    pub position: usize,
}

/// All markers in `text`, left to right.
pub fn parse_markers(text: &str) -> Vec<CitationMarker> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let numbers = caps
                .get(1)?
                .as_str()
                .split(',')
                .map(|n| n.trim().parse::<u64>().unwrap_or(u64::MAX))
                .collect();
            Some(CitationMarker {
                span: whole.range(),
                numbers,
            })
        })
        .collect()
}

/// Distinct cited numbers in order of first occurrence.
pub fn first_occurrences(markers: &[CitationMarker]) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();
    for marker in markers {
        for &number in &marker.numbers {
            if !citations.iter().any(|c| c.number == number) {
                citations.push(Citation {
                    number,
                    position: marker.span.start,
                });
            }
        }
    }
    citations
}

/// Rebuild `text`, replacing each marker with what `rewrite` returns for its
/// numbers. An empty result removes the marker along with a now-dangling
/// space before it.
pub fn rewrite_markers<F>(text: &str, markers: &[CitationMarker], mut rewrite: F) -> String
where
    F: FnMut(&[u64]) -> Vec<u64>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for marker in markers {
        out.push_str(&text[last..marker.span.start]);
        let kept = rewrite(&marker.numbers);
        if kept.is_empty() {
            let next = text[marker.span.end..].chars().next();
            let dangling = next.is_none_or(|c| c.is_whitespace() || ".,;:!?)".contains(c));
            if dangling && out.ends_with(' ') {
                out.pop();
            }
        } else if kept == marker.numbers {
            out.push_str(&text[marker.span.clone()]);
        } else {
            out.push_str(&CitationMarker::render(&kept));
        }
        last = marker.span.end;
    }
    out.push_str(&text[last..]);
    out
}
