//! Engine state bound to one paragraph buffer.
//!
//! `MarkdownState` owns the span list, the scan cursor and the open-toggle
//! handles. Appending is handled in `scanner`, backspace in `backspace`, and
//! the reserved overlay spans in `overlay`.

use crate::config::EngineConfig;
use crate::cursor::ScanCursor;
use crate::error::Overlay;
use crate::span::{Span, SpanId, SpanKind, SpanList};

/// Handles to the currently unterminated bold/italic spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenToggles {
    pub bold: Option<SpanId>,
    pub italic: Option<SpanId>,
}

impl OpenToggles {
    /// The open span handle for a markdown kind. Overlays never have one.
    pub fn get(&self, kind: SpanKind) -> Option<SpanId> {
        match kind {
            SpanKind::Bold => self.bold,
            SpanKind::Italic => self.italic,
            SpanKind::CursorHighlight | SpanKind::ComposeUnderline => None,
        }
    }

    pub(crate) fn set(&mut self, kind: SpanKind, id: Option<SpanId>) {
        match kind {
            SpanKind::Bold => self.bold = id,
            SpanKind::Italic => self.italic = id,
            SpanKind::CursorHighlight | SpanKind::ComposeUnderline => {}
        }
    }

    /// Drop any handle pointing at `id`.
    pub(crate) fn forget(&mut self, id: SpanId) {
        if self.bold == Some(id) {
            self.bold = None;
        }
        if self.italic == Some(id) {
            self.italic = None;
        }
    }
}

/// Bookkeeping for the two reserved overlay spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Overlays {
    pub(crate) cursor: SpanId,
    pub(crate) compose: SpanId,
    /// Buffer length right after the cursor marker was appended.
    pub(crate) cursor_shown_len: Option<usize>,
    /// Buffer length when the composition underline was shown.
    pub(crate) compose_shown_len: Option<usize>,
}

/// Incremental markdown formatting state for one text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownState {
    pub(crate) spans: SpanList,
    pub(crate) cursor: ScanCursor,
    pub(crate) toggles: OpenToggles,
    pub(crate) overlays: Overlays,
    pub(crate) cursor_marker: char,
}

impl Default for MarkdownState {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownState {
    /// Create state for a buffer that has not been scanned yet.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        let mut spans = SpanList::new();
        // compose is allocated first so parked overlays list in a fixed order
        let compose = spans.insert(Span::parked(SpanKind::ComposeUnderline));
        let cursor = spans.insert(Span::parked(SpanKind::CursorHighlight));
        Self {
            spans,
            cursor: ScanCursor::new(),
            toggles: OpenToggles::default(),
            overlays: Overlays {
                cursor,
                compose,
                cursor_shown_len: None,
                compose_shown_len: None,
            },
            cursor_marker: config.cursor_marker,
        }
    }

    /// All spans, including the two overlays.
    pub fn spans(&self) -> &SpanList {
        &self.spans
    }

    pub fn scan_cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Byte offset up to which the buffer has been classified.
    pub fn scan_offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn toggles(&self) -> OpenToggles {
        self.toggles
    }

    /// The currently unterminated bold span, if any.
    pub fn open_bold(&self) -> Option<&Span> {
        self.toggles.bold.and_then(|id| self.spans.get(id))
    }

    /// The currently unterminated italic span, if any.
    pub fn open_italic(&self) -> Option<&Span> {
        self.toggles.italic.and_then(|id| self.spans.get(id))
    }

    pub fn cursor_span_id(&self) -> SpanId {
        self.overlays.cursor
    }

    pub fn compose_span_id(&self) -> SpanId {
        self.overlays.compose
    }

    pub fn cursor_marker(&self) -> char {
        self.cursor_marker
    }

    pub fn is_cursor_shown(&self) -> bool {
        self.overlays.cursor_shown_len.is_some()
    }

    pub fn is_compose_shown(&self) -> bool {
        self.overlays.compose_shown_len.is_some()
    }

    /// Mutable access to one of the reserved overlay spans.
    pub(crate) fn overlay_span_mut(&mut self, overlay: Overlay) -> &mut Span {
        let id = match overlay {
            Overlay::Cursor => self.overlays.cursor,
            Overlay::Compose => self.overlays.compose,
        };
        match self.spans.get_mut(id) {
            Some(span) => span,
            None => unreachable!("overlay spans are never removed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_parked_overlays() {
        let state = MarkdownState::new();
        assert_eq!(state.spans().len(), 2);
        let spans: Vec<Span> = state.spans().iter().map(|(_, s)| *s).collect();
        assert_eq!(
            spans,
            vec![
                Span::parked(SpanKind::ComposeUnderline),
                Span::parked(SpanKind::CursorHighlight),
            ]
        );
        assert_eq!(state.toggles(), OpenToggles::default());
        assert_eq!(state.scan_offset(), 0);
        assert!(!state.is_cursor_shown());
        assert!(!state.is_compose_shown());
    }

    #[test]
    fn test_toggles_forget() {
        let mut list = SpanList::new();
        let a = list.insert(Span::open(SpanKind::Bold, 0));
        let b = list.insert(Span::open(SpanKind::Italic, 0));
        let mut toggles = OpenToggles {
            bold: Some(a),
            italic: Some(b),
        };
        toggles.forget(a);
        assert_eq!(toggles.bold, None);
        assert_eq!(toggles.italic, Some(b));
        assert_eq!(toggles.get(SpanKind::CursorHighlight), None);
    }
}
