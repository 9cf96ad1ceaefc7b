//! Backspace reconciliation.
//!
//! Toggle state depends on the parity of markers seen so far, so it cannot be
//! recovered by looking at the text around the deleted codepoint. Instead the
//! already-materialized spans are repaired by offset comparison: spans closed
//! by the deleted codepoint are reopened, spans opened by it are dropped.

use crate::error::{EngineError, Overlay, Result};
use crate::scanner::BOLD_MARKER;
use crate::span::{SpanEnd, SpanKind};
use crate::state::MarkdownState;
use crate::text::TextBuffer;

impl MarkdownState {
    /// Remove the codepoint before the scan position and restore spans and
    /// toggles to what they were before it was appended.
    ///
    /// Anything appended after the scan position is discarded along with it.
    /// Returns the removed codepoint, or None if there was nothing to remove.
    pub fn retract<T: TextBuffer>(&mut self, buffer: &mut T) -> Result<Option<char>> {
        if self.overlays.cursor_shown_len.is_some() {
            return Err(EngineError::OverlayActive {
                overlay: Overlay::Cursor,
            });
        }
        self.cursor.advance_if_needed(buffer)?;

        let Some((new_offset, removed)) = self.cursor.step_back(buffer) else {
            return Ok(None);
        };
        buffer.truncate(new_offset);
        self.reconcile(new_offset);

        tracing::trace!(
            target: "draftmark::markdown",
            offset = new_offset,
            removed = %removed.escape_debug(),
            open_bold = self.toggles.bold.is_some(),
            open_italic = self.toggles.italic.is_some(),
            "retracted one codepoint"
        );
        Ok(Some(removed))
    }

    fn reconcile(&mut self, new_offset: usize) {
        let toggles = &mut self.toggles;
        self.spans.retain_mut(|id, span| {
            if !span.kind.is_markdown() {
                return true;
            }

            if span.end > SpanEnd::At(new_offset) {
                if !span.end.is_unbounded() {
                    tracing::debug!(
                        target: "draftmark::markdown",
                        kind = ?span.kind,
                        start = span.start,
                        end = %span.end,
                        "reopening span closed by retracted marker"
                    );
                }
                span.end = SpanEnd::Unbounded;
                toggles.set(span.kind, Some(id));
            }

            // bold spans are anchored on the first asterisk of the pair
            let cutoff = match span.kind {
                SpanKind::Bold => new_offset.saturating_sub(BOLD_MARKER.len_utf8()),
                _ => new_offset,
            };
            if span.start >= cutoff {
                tracing::debug!(
                    target: "draftmark::markdown",
                    kind = ?span.kind,
                    start = span.start,
                    "dropping span opened by retracted marker"
                );
                toggles.forget(id);
                return false;
            }
            true
        });
    }
}
