//! Cursor and composition overlays.
//!
//! Both overlays are spans reserved at construction and parked at `[0,0)`
//! while hidden. Showing the cursor temporarily appends a marker codepoint to
//! the buffer; no other edit may happen until it is hidden again.

use std::ops::Range;

use crate::error::{EngineError, Overlay, Result, StaleReason};
use crate::span::{Span, SpanEnd, SpanKind};
use crate::state::MarkdownState;
use crate::text::TextBuffer;

impl MarkdownState {
    /// Append the cursor marker and highlight it.
    pub fn show_cursor<T: TextBuffer>(&mut self, buffer: &mut T) -> Result<()> {
        if self.overlays.cursor_shown_len.is_some() {
            return Err(stale(Overlay::Cursor, StaleReason::AlreadyShown));
        }
        let start = buffer.len_bytes();
        buffer.push_char(self.cursor_marker);
        let end = buffer.len_bytes();

        let span = self.overlay_span_mut(Overlay::Cursor);
        span.start = start;
        span.end = SpanEnd::At(end);
        self.overlays.cursor_shown_len = Some(end);
        Ok(())
    }

    /// Remove the cursor marker and park the highlight.
    ///
    /// If the buffer length changed since `show_cursor`, the marker can no
    /// longer be located: the highlight is parked, the buffer is left alone,
    /// and `StaleOverlay` is returned. The marker then still sits past the
    /// scan position, so the caller must truncate the buffer back to the scan
    /// offset before the next `extend`, or the marker is scanned as text.
    pub fn hide_cursor<T: TextBuffer>(&mut self, buffer: &mut T) -> Result<()> {
        let Some(expected) = self.overlays.cursor_shown_len.take() else {
            return Err(stale(Overlay::Cursor, StaleReason::NotShown));
        };
        *self.overlay_span_mut(Overlay::Cursor) = Span::parked(SpanKind::CursorHighlight);

        let actual = buffer.len_bytes();
        if actual != expected {
            return Err(stale(
                Overlay::Cursor,
                StaleReason::BufferChanged { expected, actual },
            ));
        }
        buffer.truncate(expected - self.cursor_marker.len_utf8());
        Ok(())
    }

    /// Underline `range` as in-progress composition text.
    ///
    /// The range is taken as given; it is not derived from scanning.
    pub fn show_compose<T: TextBuffer>(&mut self, buffer: &T, range: Range<usize>) -> Result<()> {
        if self.overlays.compose_shown_len.is_some() {
            return Err(stale(Overlay::Compose, StaleReason::AlreadyShown));
        }
        let len = buffer.len_bytes();
        if range.start > range.end
            || !buffer.is_char_boundary(range.start)
            || !buffer.is_char_boundary(range.end)
        {
            return Err(EngineError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }

        *self.overlay_span_mut(Overlay::Compose) =
            Span::closed(SpanKind::ComposeUnderline, range);
        self.overlays.compose_shown_len = Some(len);
        Ok(())
    }

    /// Park the composition underline.
    pub fn hide_compose<T: TextBuffer>(&mut self, buffer: &T) -> Result<()> {
        let Some(expected) = self.overlays.compose_shown_len.take() else {
            return Err(stale(Overlay::Compose, StaleReason::NotShown));
        };
        *self.overlay_span_mut(Overlay::Compose) =
            Span::parked(SpanKind::ComposeUnderline);

        let actual = buffer.len_bytes();
        if actual != expected {
            return Err(stale(
                Overlay::Compose,
                StaleReason::BufferChanged { expected, actual },
            ));
        }
        Ok(())
    }
}

fn stale(overlay: Overlay, reason: StaleReason) -> EngineError {
    EngineError::StaleOverlay { overlay, reason }
}
