//! Match span handling
//!
//! Turns the raw spans a backend reports into disjoint, ordered emphasis
//! ranges and splits field text into plain and emphasized segments.

use crate::record::MatchSpan;

/// Piece of a field's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Emphasized(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(s) | Segment::Emphasized(s) => s,
        }
    }

    pub fn is_emphasized(&self) -> bool {
        matches!(self, Segment::Emphasized(_))
    }
}

/// Normalize spans against a text of `text_len` characters
///
/// Spans are clamped to the text, empty spans are dropped, the rest are
/// sorted by start and overlapping spans are merged. Spans that only touch
/// (one ends where the next starts) stay separate.
pub fn normalize_spans(spans: &[MatchSpan], text_len: usize) -> Vec<MatchSpan> {
    let mut clamped: Vec<MatchSpan> = spans
        .iter()
        .filter(|s| s.start < text_len)
        .map(|s| MatchSpan::new(s.start, s.len.min(text_len - s.start)))
        .filter(|s| s.len > 0)
        .collect();
    clamped.sort();

    let mut merged: Vec<MatchSpan> = Vec::with_capacity(clamped.len());
    for span in clamped {
        match merged.last_mut() {
            Some(last) if span.start < last.end() => {
                let end = last.end().max(span.end());
                last.len = end - last.start;
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Split `text` into segments, emphasizing the given spans
pub fn segments(text: &str, spans: &[MatchSpan]) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let spans = normalize_spans(spans, chars.len());

    let mut out = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            out.push(Segment::Plain(chars[cursor..span.start].iter().collect()));
        }
        out.push(Segment::Emphasized(chars[span.start..span.end()].iter().collect()));
        cursor = span.end();
    }
    if cursor < chars.len() {
        out.push(Segment::Plain(chars[cursor..].iter().collect()));
    }
    out
}

/// Recover plain text and spans from backend-tagged text
///
/// `pre` and `post` are the tags the backend wrapped matches in. An unclosed
/// `pre` tag emphasizes up to the end of the text; a stray `post` tag is
/// dropped.
pub fn spans_from_tagged(tagged: &str, pre: &str, post: &str) -> (String, Vec<MatchSpan>) {
    let mut plain = String::with_capacity(tagged.len());
    let mut plain_chars = 0;
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut rest = tagged;

    while !rest.is_empty() {
        if !pre.is_empty() && rest.starts_with(pre) {
            if open.is_none() {
                open = Some(plain_chars);
            }
            rest = &rest[pre.len()..];
        } else if !post.is_empty() && rest.starts_with(post) {
            if let Some(start) = open.take() {
                if plain_chars > start {
                    spans.push(MatchSpan::new(start, plain_chars - start));
                }
            }
            rest = &rest[post.len()..];
        } else {
            let mut iter = rest.chars();
            if let Some(c) = iter.next() {
                plain.push(c);
                plain_chars += 1;
            }
            rest = iter.as_str();
        }
    }
    if let Some(start) = open {
        if plain_chars > start {
            spans.push(MatchSpan::new(start, plain_chars - start));
        }
    }
    (plain, spans)
}
