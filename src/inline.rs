//! Inline tokenization: line breaks, then links, then bold.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::InlineSpan;

/// `**text**`, non-greedy, never crossing a newline.
static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// `<br>`, `<br/>`, `<br />` in any case.
static LINE_BREAK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

/// `[label](url)` with a non-empty label and url.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

impl InlineSpan {
    /// Text of the span with all markup removed. Line breaks become `\n`.
    pub fn text(&self) -> String {
        return match self {
            Self::Bold(text) | Self::PlainText(text) => text.clone(),
            Self::LineBreak => "\n".to_string(),
            Self::Link { label, .. } => plain_text(&label_spans(label)),
        };
    }
}

/// Tokenize a link label. Labels may carry bold markup but never nested links
/// or line breaks.
pub fn label_spans(label: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    push_bold_spans(label, &mut spans);
    return spans;
}

/// Concatenate the markup-free text of every span.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    return spans.iter().map(InlineSpan::text).collect();
}

/// Push `text` as a plain span unless it is empty.
fn push_plain(text: &str, spans: &mut Vec<InlineSpan>) {
    if !text.is_empty() {
        spans.push(InlineSpan::PlainText(text.to_string()));
    }
}

/// Split plain text on bold delimiters. Unpaired `**` stays literal.
fn push_bold_spans(text: &str, spans: &mut Vec<InlineSpan>) {
    let mut last = 0_usize;
    for cap in BOLD_PATTERN.captures_iter(text) {
        let (Some(whole), Some(inner)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        push_plain(text.get(last..whole.start()).unwrap_or_default(), spans);
        spans.push(InlineSpan::Bold(inner.as_str().to_string()));
        last = whole.end();
    }
    push_plain(text.get(last..).unwrap_or_default(), spans);
}

/// Extract links left to right; the text around them goes through bold splitting.
fn push_link_spans(segment: &str, spans: &mut Vec<InlineSpan>) {
    let mut last = 0_usize;
    for cap in LINK_PATTERN.captures_iter(segment) {
        let (Some(whole), Some(label), Some(url)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        push_bold_spans(segment.get(last..whole.start()).unwrap_or_default(), spans);
        spans.push(InlineSpan::Link {
            label: label.as_str().to_string(),
            url: url.as_str().to_string(),
        });
        last = whole.end();
    }
    push_bold_spans(segment.get(last..).unwrap_or_default(), spans);
}

/// Render spans back to markdown source. Line breaks normalize to `<br>`.
#[cfg(test)]
pub fn spans_to_markdown(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            InlineSpan::Bold(text) => {
                out.push_str("**");
                out.push_str(text);
                out.push_str("**");
            },
            InlineSpan::LineBreak => out.push_str("<br>"),
            InlineSpan::Link { label, url } => {
                out.push('[');
                out.push_str(label);
                out.push_str("](");
                out.push_str(url);
                out.push(')');
            },
            InlineSpan::PlainText(text) => out.push_str(text),
        }
    }
    return out;
}

/// Tokenize one logical line into inline spans.
///
/// Precedence is fixed: explicit `<br>` markers split the line first, each
/// segment is scanned for links, and only the text outside links is split on
/// bold delimiters. Empty plain fragments are not emitted.
pub fn tokenize_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for (idx, segment) in LINE_BREAK_PATTERN.split(text).enumerate() {
        if idx > 0 {
            spans.push(InlineSpan::LineBreak);
        }
        push_link_spans(segment, &mut spans);
    }
    return spans;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> InlineSpan {
        InlineSpan::PlainText(text.to_string())
    }

    #[test]
    fn plain_line_is_single_span() {
        assert_eq!(tokenize_inline("hello world"), vec![plain("hello world")]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(tokenize_inline("").is_empty());
    }

    #[test]
    fn splits_bold_from_surrounding_text() {
        assert_eq!(
            tokenize_inline("a **b** c"),
            vec![plain("a "), InlineSpan::Bold("b".to_string()), plain(" c")]
        );
    }

    #[test]
    fn unmatched_bold_marker_is_literal() {
        assert_eq!(tokenize_inline("2 ** 3"), vec![plain("2 ** 3")]);
    }

    #[test]
    fn links_keep_text_around_them() {
        assert_eq!(
            tokenize_inline("see [docs](https://x.io) and [more](/m)!"),
            vec![
                plain("see "),
                InlineSpan::Link { label: "docs".to_string(), url: "https://x.io".to_string() },
                plain(" and "),
                InlineSpan::Link { label: "more".to_string(), url: "/m".to_string() },
                plain("!"),
            ]
        );
    }

    #[test]
    fn line_break_variants_split_segments() {
        let spans = tokenize_inline("a<br>b<BR/>c<br />d");
        assert_eq!(
            spans,
            vec![
                plain("a"),
                InlineSpan::LineBreak,
                plain("b"),
                InlineSpan::LineBreak,
                plain("c"),
                InlineSpan::LineBreak,
                plain("d"),
            ]
        );
    }

    #[test]
    fn link_extraction_runs_before_bold() {
        let spans = tokenize_inline("[**bold link**](http://x)");
        assert_eq!(
            spans,
            vec![InlineSpan::Link { label: "**bold link**".to_string(), url: "http://x".to_string() }]
        );
        assert_eq!(label_spans("**bold link**"), vec![InlineSpan::Bold("bold link".to_string())]);
        assert_eq!(plain_text(&spans), "bold link");
    }

    #[test]
    fn plain_text_drops_markup_only() {
        let line = "x **y** [z](u) w";
        assert_eq!(plain_text(&tokenize_inline(line)), "x y z w");
    }

    #[test]
    fn markdown_round_trip_is_stable() {
        for line in [
            "a **b** c",
            "[**bold link**](http://x) tail",
            "one<br/>two ** three",
            "****",
            "[a](b)[c](d)",
        ] {
            let spans = tokenize_inline(line);
            assert_eq!(tokenize_inline(&spans_to_markdown(&spans)), spans, "line: {line}");
        }
    }
}
