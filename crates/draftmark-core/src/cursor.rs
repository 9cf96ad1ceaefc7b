//! Scan position with a generation-keyed access cache.

use crate::error::{EngineError, Result};
use crate::text::TextBuffer;

/// How much of the buffer has been classified so far.
///
/// `offset` is authoritative and survives storage changes. The char index and
/// previous codepoint are derived from it and cached against the buffer's
/// storage generation, so that scanning appended text costs O(new chars)
/// rather than a walk from the start of the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCursor {
    offset: usize,
    generation: Option<u64>,
    char_index: usize,
    prev: Option<(usize, char)>,
}

impl ScanCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the first unclassified codepoint.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of codepoints before `offset`.
    ///
    /// Only meaningful after `advance_if_needed` has run against the current
    /// buffer.
    pub fn char_offset(&self) -> usize {
        self.char_index
    }

    /// The codepoint immediately before `offset`.
    pub fn prev(&self) -> Option<char> {
        self.prev.map(|(_, c)| c)
    }

    /// Byte offset of the codepoint immediately before `offset`.
    pub fn prev_offset(&self) -> Option<usize> {
        self.prev.map(|(offset, _)| offset)
    }

    /// Check the position against `buffer` and refresh the cache if the
    /// buffer's storage moved since it was computed.
    pub fn advance_if_needed<T: TextBuffer>(&mut self, buffer: &T) -> Result<()> {
        let len = buffer.len_bytes();
        if self.offset > len {
            return Err(EngineError::InvalidPosition {
                offset: self.offset,
                len,
            });
        }

        let generation = buffer.generation();
        if self.generation != Some(generation) {
            self.char_index = buffer.byte_to_char(self.offset);
            self.prev = buffer.char_before(self.offset);
            self.generation = Some(generation);
            tracing::trace!(
                target: "draftmark::markdown",
                offset = self.offset,
                char_index = self.char_index,
                generation,
                "scan cursor cache refreshed"
            );
        }
        Ok(())
    }

    /// Consume `c`, which must be the codepoint at `offset`.
    pub(crate) fn step(&mut self, c: char) {
        self.prev = Some((self.offset, c));
        self.offset += c.len_utf8();
        self.char_index += 1;
    }

    /// Move back over the previous codepoint, returning its offset and value.
    ///
    /// Returns None at the start of the buffer.
    pub(crate) fn step_back<T: TextBuffer>(&mut self, buffer: &T) -> Option<(usize, char)> {
        let (offset, c) = self.prev?;
        self.offset = offset;
        self.char_index = self.char_index.saturating_sub(1);
        self.prev = buffer.char_before(offset);
        Some((offset, c))
    }
}
