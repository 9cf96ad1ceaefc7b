//! Marker toggle scanning over newly appended text.
//!
//! Markers stay in the text and are styled along with their content: an
//! italic span covers both underscores, a bold span covers both asterisk
//! pairs. Each kind has at most one open span; markers toggle greedily with
//! no nesting within a kind.

use crate::error::{EngineError, Overlay, Result};
use crate::span::{Span, SpanEnd, SpanKind};
use crate::state::MarkdownState;
use crate::text::TextBuffer;

pub const ITALIC_MARKER: char = '_';
pub const BOLD_MARKER: char = '*';

impl MarkdownState {
    /// Classify everything appended since the last scan.
    ///
    /// Returns the number of codepoints consumed.
    pub fn extend<T: TextBuffer>(&mut self, buffer: &T) -> Result<usize> {
        if self.overlays.cursor_shown_len.is_some() {
            return Err(EngineError::OverlayActive {
                overlay: Overlay::Cursor,
            });
        }
        self.cursor.advance_if_needed(buffer)?;
        if buffer.is_empty() {
            return Ok(0);
        }

        let start = self.cursor.offset();
        let mut consumed = 0;
        for c in buffer.chars_from(start) {
            let offset = self.cursor.offset();
            let prev = self.cursor.prev();
            self.toggle_at(offset, c, prev);
            self.cursor.step(c);
            consumed += 1;
        }

        if consumed > 0 {
            tracing::trace!(
                target: "draftmark::markdown",
                from = start,
                to = self.cursor.offset(),
                consumed,
                open_bold = self.toggles.bold.is_some(),
                open_italic = self.toggles.italic.is_some(),
                "extended markdown spans"
            );
        }
        Ok(consumed)
    }

    fn toggle_at(&mut self, offset: usize, c: char, prev: Option<char>) {
        match c {
            ITALIC_MARKER => self.toggle(SpanKind::Italic, offset, offset + 1),
            // the opening bold span starts at the first asterisk of the pair,
            // which is always a single byte behind
            BOLD_MARKER if prev == Some(BOLD_MARKER) => {
                self.toggle(SpanKind::Bold, offset - 1, offset + 1)
            }
            _ => {}
        }
    }

    /// Open a span of `kind` at `start`, or close the open one at `close_end`.
    fn toggle(&mut self, kind: SpanKind, start: usize, close_end: usize) {
        match self.toggles.get(kind) {
            None => {
                let id = self.spans.insert(Span::open(kind, start));
                self.toggles.set(kind, Some(id));
            }
            Some(id) => {
                if let Some(span) = self.spans.get_mut(id) {
                    span.end = SpanEnd::At(close_end);
                }
                self.toggles.set(kind, None);
            }
        }
    }
}
