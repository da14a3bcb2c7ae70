use unicode_width::UnicodeWidthChar;

use crate::ui::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

pub type SpanLine = Vec<Span>;

pub fn line_text(line: &[Span]) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}

/// Splits `text` into spans, applying `highlight` over the half-open char
/// `ranges` and `base` elsewhere.
pub fn highlight_spans(
    text: &str,
    ranges: &[(usize, usize)],
    base: Style,
    highlight: Style,
) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut current_hl = false;
    let mut ranges = ranges.iter().peekable();

    for (idx, ch) in text.chars().enumerate() {
        while ranges.peek().is_some_and(|(_, end)| idx >= *end) {
            ranges.next();
        }
        let hl = ranges
            .peek()
            .is_some_and(|(start, end)| idx >= *start && idx < *end);
        if hl != current_hl && !current.is_empty() {
            let style = if current_hl { highlight } else { base };
            spans.push(Span::styled(std::mem::take(&mut current), style));
        }
        current_hl = hl;
        current.push(ch);
    }
    if !current.is_empty() {
        let style = if current_hl { highlight } else { base };
        spans.push(Span::styled(current, style));
    }
    spans
}

/// Cuts a line to `width` terminal columns, marking the cut with `…`.
pub fn truncate_line(line: SpanLine, width: usize) -> SpanLine {
    let total: usize = line
        .iter()
        .flat_map(|span| span.text.chars())
        .map(|ch| ch.width().unwrap_or(0))
        .sum();
    if total <= width {
        return line;
    }
    if width == 0 {
        return Vec::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = Vec::new();
    let mut last_style = Style::default();
    'spans: for span in line {
        let mut text = String::new();
        for ch in span.text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                if !text.is_empty() {
                    out.push(Span::styled(text, span.style));
                }
                last_style = span.style;
                break 'spans;
            }
            used += w;
            text.push(ch);
        }
        last_style = span.style;
        if !text.is_empty() {
            out.push(Span::styled(text, span.style));
        }
    }
    out.push(Span::styled("…", last_style));
    out
}
