//! Inline span rendering.
//!
//! Spans may nest (`strong` inside `hyperlink`) and, in malformed content,
//! overlap. Overlapping spans are clipped to their enclosing span so the
//! produced HTML is always well-formed.

use crate::model::{Span, SpanKind};
use handlebars::html_escape;

/// A span resolved to byte offsets with its opening and closing tags.
#[derive(Debug)]
struct ResolvedSpan {
    start: usize,
    end: usize,
    open: String,
    close: &'static str,
}

/// Renders `text` as escaped HTML with `spans` applied.
pub(super) fn render_inline(text: &str, spans: &[Span]) -> String {
    let mut resolved: Vec<ResolvedSpan> = spans
        .iter()
        .filter_map(|span| resolve_span(text, span))
        .collect();
    // Outer spans first: earliest start, then longest.
    resolved.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut output = String::with_capacity(text.len() + resolved.len() * 16);
    render_range(text, 0, text.len(), &resolved, &mut output);
    output
}

fn resolve_span(text: &str, span: &Span) -> Option<ResolvedSpan> {
    let start = utf16_to_byte(text, span.start);
    let end = utf16_to_byte(text, span.end);
    if start >= end {
        return None;
    }

    let (open, close) = match span.kind {
        SpanKind::Strong => ("<strong>".to_string(), "</strong>"),
        SpanKind::Em => ("<em>".to_string(), "</em>"),
        SpanKind::Hyperlink => {
            let data = span.data.as_ref()?;
            let url = data.url.as_deref()?;
            let open = match data.target.as_deref() {
                Some(target) => format!(
                    "<a href=\"{}\" target=\"{}\" rel=\"noopener noreferrer\">",
                    html_escape(url),
                    html_escape(target)
                ),
                None => format!("<a href=\"{}\">", html_escape(url)),
            };
            (open, "</a>")
        }
        SpanKind::Label => {
            let label = span.data.as_ref().and_then(|d| d.label.as_deref())?;
            (format!("<span class=\"{}\">", html_escape(label)), "</span>")
        }
        SpanKind::Unknown => return None,
    };

    Some(ResolvedSpan {
        start,
        end,
        open,
        close,
    })
}

fn render_range(
    text: &str,
    start: usize,
    end: usize,
    spans: &[ResolvedSpan],
    output: &mut String,
) {
    let mut pos = start;
    let mut i = 0;

    while i < spans.len() {
        let span = &spans[i];
        let span_start = span.start.max(pos);
        let span_end = span.end.min(end);

        if span_start >= span_end {
            i += 1;
            continue;
        }

        // Everything that starts inside this span is rendered as its child.
        let mut j = i + 1;
        while j < spans.len() && spans[j].start < span_end {
            j += 1;
        }

        push_text(&text[pos..span_start], output);
        output.push_str(&span.open);
        render_range(text, span_start, span_end, &spans[i + 1..j], output);
        output.push_str(span.close);

        pos = span_end;
        i = j;
    }

    push_text(&text[pos..end], output);
}

fn push_text(text: &str, output: &mut String) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        output.push_str(&html_escape(first));
    }
    for line in lines {
        output.push_str("<br />");
        output.push_str(&html_escape(line));
    }
}

/// Converts a UTF-16 code unit offset into a byte offset on a char boundary.
fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        if units >= offset {
            return byte_index;
        }
        units += ch.len_utf16();
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(render_inline("a < b & c", &[]), "a &lt; b &amp; c");
    }

    #[test]
    fn test_nested_spans() {
        let spans = vec![
            Span::hyperlink(0, 11, "https://reactjs.org"),
            Span::new(6, 11, SpanKind::Strong),
        ];
        assert_eq!(
            render_inline("React Hooks", &spans),
            "<a href=\"https://reactjs.org\">React <strong>Hooks</strong></a>"
        );
    }

    #[test]
    fn test_overlapping_spans_are_clipped() {
        let spans = vec![
            Span::new(0, 5, SpanKind::Strong),
            Span::new(3, 8, SpanKind::Em),
        ];
        assert_eq!(
            render_inline("abcdefgh", &spans),
            "<strong>abc<em>de</em></strong>fgh"
        );
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        // "é" is one UTF-16 unit, the emoji is two.
        let spans = vec![Span::new(4, 7, SpanKind::Em)];
        assert_eq!(render_inline("é😀 ok!", &spans), "é😀 <em>ok!</em>");
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        assert_eq!(render_inline("one\ntwo", &[]), "one<br />two");
    }
}
