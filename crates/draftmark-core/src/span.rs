//! Styled span tracking.
//!
//! A `SpanList` holds the styled byte ranges the engine maintains over the
//! text: markdown bold/italic spans plus the two reserved overlay spans.
//! Spans are addressed by `SpanId` handles that are never reused, so a handle
//! to a removed span can never alias a newer one.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Formatting applied by a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    /// `**bold**`, rendered semi-bold.
    Bold,
    /// `_italic_`, rendered in italic style.
    Italic,
    /// Insertion-point marker, rendered at partial opacity.
    CursorHighlight,
    /// In-progress IME composition, rendered underlined.
    ComposeUnderline,
}

impl SpanKind {
    /// Whether this kind is toggled by markdown markers (as opposed to
    /// being one of the reserved overlays).
    pub fn is_markdown(self) -> bool {
        matches!(self, SpanKind::Bold | SpanKind::Italic)
    }
}

/// End bound of a span.
///
/// Variant order matters: `Unbounded` compares greater than every concrete
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpanEnd {
    /// Exclusive byte offset.
    At(usize),
    /// Extends to the current end of the text.
    Unbounded,
}

impl SpanEnd {
    /// Resolve against the current text length.
    pub fn resolve(self, text_len: usize) -> usize {
        match self {
            SpanEnd::At(end) => end,
            SpanEnd::Unbounded => text_len,
        }
    }

    /// The concrete offset, if any.
    pub fn offset(self) -> Option<usize> {
        match self {
            SpanEnd::At(end) => Some(end),
            SpanEnd::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, SpanEnd::Unbounded)
    }
}

impl fmt::Display for SpanEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanEnd::At(end) => write!(f, "{end}"),
            SpanEnd::Unbounded => f.write_str(".."),
        }
    }
}

/// A half-open styled byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: SpanEnd,
}

impl Span {
    /// A span that is still open.
    pub fn open(kind: SpanKind, start: usize) -> Self {
        Self {
            kind,
            start,
            end: SpanEnd::Unbounded,
        }
    }

    /// A span with a concrete end.
    pub fn closed(kind: SpanKind, range: Range<usize>) -> Self {
        Self {
            kind,
            start: range.start,
            end: SpanEnd::At(range.end),
        }
    }

    /// The parked `[0,0)` span used for disabled overlays.
    pub fn parked(kind: SpanKind) -> Self {
        Self::closed(kind, 0..0)
    }

    /// Whether the span has a concrete end equal to its start.
    pub fn is_degenerate(&self) -> bool {
        self.end == SpanEnd::At(self.start)
    }

    /// The concrete byte range covered against a text of `text_len` bytes.
    pub fn resolve(&self, text_len: usize) -> Range<usize> {
        self.start..self.end.resolve(text_len)
    }
}

/// Stable handle to an entry of a `SpanList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpanId(u32);

impl SpanId {
    /// Raw handle value; also the creation order of the span.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Unordered collection of spans addressed by `SpanId`.
///
/// Iteration yields spans in creation order, but consumers should treat the
/// list as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanList {
    entries: Vec<(SpanId, Span)>,
    next_id: u32,
}

impl SpanList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a span and return its handle.
    pub fn insert(&mut self, span: Span) -> SpanId {
        let id = SpanId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, span));
        id
    }

    pub fn get(&self, id: SpanId) -> Option<&Span> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, span)| span)
    }

    pub fn get_mut(&mut self, id: SpanId) -> Option<&mut Span> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, span)| span)
    }

    pub fn contains(&self, id: SpanId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a span. Returns it if it was present.
    pub fn remove(&mut self, id: SpanId) -> Option<Span> {
        let idx = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(self.entries.remove(idx).1)
    }

    /// Keep only the spans for which `keep` returns true.
    ///
    /// The closure may also mutate the span it is given.
    pub fn retain_mut(&mut self, mut keep: impl FnMut(SpanId, &mut Span) -> bool) {
        self.entries.retain_mut(|(id, span)| keep(*id, span));
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (SpanId, &Span)> {
        self.entries.iter().map(|(id, span)| (*id, span))
    }

    /// Spans of one kind.
    pub fn of_kind(&self, kind: SpanKind) -> impl Iterator<Item = &Span> {
        self.entries
            .iter()
            .map(|(_, span)| span)
            .filter(move |span| span.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Return a copy of `spans` without degenerate (`start == end`) entries.
///
/// Handles of the surviving spans are preserved.
pub fn simplify(spans: &SpanList) -> SpanList {
    SpanList {
        entries: spans
            .entries
            .iter()
            .filter(|(_, span)| !span.is_degenerate())
            .copied()
            .collect(),
        next_id: spans.next_id,
    }
}
