//! Hand-off to the rendering backend.
//!
//! The backend receives the text plus an attribute list derived from the
//! spans. Two forms are produced here: a sorted attribute list with a stable
//! one-line-per-attribute text form, and equivalent inline markup for
//! backends that only accept markup.

use std::ops::Range;

use pulldown_cmark_escape::{FmtWriter, escape_html};
use serde::Serialize;

use crate::config::{EngineConfig, RenderStyle};
use crate::error::{EngineError, Result};
use crate::span::{Span, SpanEnd, SpanId, SpanKind, SpanList};
use crate::text::TextBuffer;

/// End offset written for spans that extend to the end of the text.
pub const OPEN_ATTR_END: u32 = u32::MAX;

/// One styled range, as handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub id: SpanId,
    pub kind: SpanKind,
    pub start: usize,
    pub end: SpanEnd,
}

impl Attribute {
    /// `"{start} {end} {property} {value}"`, e.g. `"6 13 style italic"`.
    pub fn describe(&self, style: &RenderStyle) -> String {
        let end = match self.end {
            SpanEnd::At(end) => end.to_string(),
            SpanEnd::Unbounded => OPEN_ATTR_END.to_string(),
        };
        let property = match self.kind {
            SpanKind::Bold => format!("weight {}", weight_name(style.bold_weight)),
            SpanKind::Italic => "style italic".to_string(),
            SpanKind::CursorHighlight => {
                format!("foreground-alpha {}", style.cursor_alpha_u16())
            }
            SpanKind::ComposeUnderline => "underline single".to_string(),
        };
        format!("{} {} {}", self.start, end, property)
    }
}

fn weight_name(weight: u16) -> String {
    match weight {
        100 => "thin".into(),
        200 => "ultralight".into(),
        300 => "light".into(),
        400 => "normal".into(),
        500 => "medium".into(),
        600 => "semibold".into(),
        700 => "bold".into(),
        800 => "ultrabold".into(),
        900 => "heavy".into(),
        other => other.to_string(),
    }
}

/// All spans as attributes, ordered by start offset and then creation order.
pub fn attributes(spans: &SpanList) -> Vec<Attribute> {
    let mut attrs: Vec<Attribute> = spans
        .iter()
        .map(|(id, span)| Attribute {
            id,
            kind: span.kind,
            start: span.start,
            end: span.end,
        })
        .collect();
    attrs.sort_by_key(|attr| (attr.start, attr.id));
    attrs
}

/// Text form of the attribute list, one attribute per line.
pub fn attributes_to_string(spans: &SpanList, style: &RenderStyle) -> String {
    let mut out = String::new();
    for attr in attributes(spans) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&attr.describe(style));
    }
    out
}

/// Render the contents of `buffer` with `spans` as nested inline markup.
///
/// Degenerate spans are skipped and unbounded spans run to the end of the
/// text. Spans that partially overlap cannot be nested and are reported as
/// `CrossingSpans`.
pub fn render_markup<T: TextBuffer>(
    buffer: &T,
    spans: &SpanList,
    style: &RenderStyle,
) -> Result<String> {
    let len = buffer.len_bytes();
    let mut ordered: Vec<(SpanId, Span, usize)> = spans
        .iter()
        .filter(|(_, span)| !span.is_degenerate())
        .map(|(id, span)| (id, *span, span.end.resolve(len).min(len)))
        .collect();
    ordered.sort_by(|a, b| {
        a.1.start
            .cmp(&b.1.start)
            .then(b.2.cmp(&a.2))
            .then(a.0.cmp(&b.0))
    });

    let mut out = String::with_capacity(len + ordered.len() * 16);
    let mut pos = 0;
    let mut open: Vec<(usize, &'static str)> = Vec::new();

    for (_, span, end) in ordered {
        while let Some(&(open_end, close)) = open.last() {
            if open_end > span.start {
                break;
            }
            write_segment(&mut out, buffer, pos..open_end)?;
            pos = open_end;
            out.push_str(close);
            open.pop();
        }
        if let Some(&(open_end, _)) = open.last() {
            if end > open_end {
                return Err(EngineError::CrossingSpans);
            }
        }

        write_segment(&mut out, buffer, pos..span.start)?;
        pos = span.start;
        let (open_tag, close_tag) = tags(span.kind, style);
        out.push_str(&open_tag);
        open.push((end, close_tag));
    }

    while let Some((open_end, close)) = open.pop() {
        write_segment(&mut out, buffer, pos..open_end)?;
        pos = open_end;
        out.push_str(close);
    }
    write_segment(&mut out, buffer, pos..len)?;
    Ok(out)
}

fn tags(kind: SpanKind, style: &RenderStyle) -> (String, &'static str) {
    match kind {
        SpanKind::Bold => (
            format!(r#"<span weight="{}">"#, style.bold_weight),
            "</span>",
        ),
        SpanKind::Italic => ("<i>".to_string(), "</i>"),
        SpanKind::CursorHighlight => (
            format!(r#"<span alpha="{}%">"#, style.cursor_alpha_percent),
            "</span>",
        ),
        SpanKind::ComposeUnderline => ("<u>".to_string(), "</u>"),
    }
}

/// Escape the text in `range` of `buffer` onto `out`.
fn write_segment<T: TextBuffer>(out: &mut String, buffer: &T, range: Range<usize>) -> Result<()> {
    if range.is_empty() {
        return Ok(());
    }
    let text = buffer.slice(range.clone()).ok_or(EngineError::InvalidRange {
        start: range.start,
        end: range.end,
        len: buffer.len_bytes(),
    })?;
    escape_html(FmtWriter(&mut *out), &text)?;
    Ok(())
}

/// A paragraph holding nothing but the cursor marker.
///
/// Used to draw the insertion point on an empty paragraph without running
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorParagraph {
    pub text: String,
    pub spans: SpanList,
}

impl CursorParagraph {
    pub fn new(config: &EngineConfig) -> Self {
        let text = config.cursor_marker.to_string();
        let mut spans = SpanList::new();
        spans.insert(Span::closed(SpanKind::CursorHighlight, 0..text.len()));
        Self { text, spans }
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        attributes(&self.spans)
    }
}

pub fn cursor_paragraph(config: &EngineConfig) -> CursorParagraph {
    CursorParagraph::new(config)
}
