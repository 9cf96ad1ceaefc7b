//! Text buffer abstraction for markdown span tracking.
//!
//! The `TextBuffer` trait is the narrow surface the engine needs from the
//! host's text storage: append, truncate, and byte-offset navigation. Two
//! backends are provided: a contiguous `String` buffer and a ropey rope.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// A growable text buffer addressed by UTF-8 byte offsets.
///
/// The engine only ever appends to the end and truncates back to an earlier
/// length. All offsets passed in are expected to sit on codepoint boundaries.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_bytes() == 0
    }

    /// Append text at the end.
    fn push(&mut self, text: &str);

    /// Append a single codepoint at the end.
    fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.push(c.encode_utf8(&mut buf));
    }

    /// Drop everything from `byte_offset` onward.
    ///
    /// Panics if `byte_offset` is not on a codepoint boundary.
    fn truncate(&mut self, byte_offset: usize);

    /// Whether `byte_offset` is within the buffer and on a codepoint boundary.
    fn is_char_boundary(&self, byte_offset: usize) -> bool;

    /// Convert byte offset to char offset.
    fn byte_to_char(&self, byte_offset: usize) -> usize;

    /// The codepoint ending at `byte_offset`, with its own starting offset.
    ///
    /// Returns None at the start of the buffer or for an invalid offset.
    fn char_before(&self, byte_offset: usize) -> Option<(usize, char)>;

    /// Iterate codepoints starting at `byte_offset`.
    fn chars_from(&self, byte_offset: usize) -> impl Iterator<Item = char> + '_;

    /// Get a byte range as SmolStr. Returns None if range is invalid.
    fn slice(&self, byte_range: Range<usize>) -> Option<SmolStr>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Storage generation.
    ///
    /// Changes whenever positions cached against the previous storage can no
    /// longer be trusted. Logical byte offsets survive a generation change;
    /// derived access paths (char indices, previous codepoint) must be
    /// recomputed.
    fn generation(&self) -> u64;
}

/// Contiguous `String`-backed buffer.
///
/// The generation advances only when appending moves the backing allocation,
/// so the scan cursor's cache stays valid across most keystrokes.
#[derive(Clone, Debug, Default)]
pub struct EditorString {
    text: String,
    generation: u64,
}

impl EditorString {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create from string, reserving `extra_capacity` spare bytes.
    pub fn from_str_with_capacity(s: &str, extra_capacity: usize) -> Self {
        let mut text = String::with_capacity(s.len() + extra_capacity);
        text.push_str(s);
        Self {
            text,
            generation: 0,
        }
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self::from_str_with_capacity(s, 0)
    }

    /// Borrow the contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Bytes available before the next reallocation.
    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }
}

impl TextBuffer for EditorString {
    fn len_bytes(&self) -> usize {
        self.text.len()
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn push(&mut self, text: &str) {
        let before = self.text.as_ptr();
        self.text.push_str(text);
        if self.text.as_ptr() != before {
            self.generation += 1;
        }
    }

    fn truncate(&mut self, byte_offset: usize) {
        self.text.truncate(byte_offset);
    }

    fn is_char_boundary(&self, byte_offset: usize) -> bool {
        self.text.is_char_boundary(byte_offset)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let end = byte_offset.min(self.text.len());
        self.text
            .char_indices()
            .take_while(|(i, _)| *i < end)
            .count()
    }

    fn char_before(&self, byte_offset: usize) -> Option<(usize, char)> {
        let c = self.text.get(..byte_offset)?.chars().next_back()?;
        Some((byte_offset - c.len_utf8(), c))
    }

    fn chars_from(&self, byte_offset: usize) -> impl Iterator<Item = char> + '_ {
        self.text.get(byte_offset..).unwrap_or_default().chars()
    }

    fn slice(&self, byte_range: Range<usize>) -> Option<SmolStr> {
        self.text.get(byte_range).map(SmolStr::new)
    }

    fn to_string(&self) -> String {
        self.text.clone()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl From<&str> for EditorString {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorString {
    fn from(text: String) -> Self {
        Self {
            text,
            generation: 0,
        }
    }
}

/// Ropey-backed text buffer.
///
/// Rope nodes are rebalanced on every edit, so every mutation starts a new
/// generation. Offset conversions are O(log n).
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
    generation: u64,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
            generation: 0,
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn push(&mut self, text: &str) {
        self.rope.insert(self.rope.len_chars(), text);
        self.generation += 1;
    }

    fn truncate(&mut self, byte_offset: usize) {
        assert!(
            self.is_char_boundary(byte_offset),
            "truncate offset {byte_offset} is not a char boundary"
        );
        let char_idx = self.rope.byte_to_char(byte_offset);
        self.rope.remove(char_idx..);
        self.generation += 1;
    }

    fn is_char_boundary(&self, byte_offset: usize) -> bool {
        if byte_offset > self.rope.len_bytes() {
            return false;
        }
        self.rope.char_to_byte(self.rope.byte_to_char(byte_offset)) == byte_offset
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.rope
            .byte_to_char(byte_offset.min(self.rope.len_bytes()))
    }

    fn char_before(&self, byte_offset: usize) -> Option<(usize, char)> {
        if byte_offset == 0 || !self.is_char_boundary(byte_offset) {
            return None;
        }
        let char_idx = self.rope.byte_to_char(byte_offset) - 1;
        Some((self.rope.char_to_byte(char_idx), self.rope.char(char_idx)))
    }

    fn chars_from(&self, byte_offset: usize) -> impl Iterator<Item = char> + '_ {
        self.rope.chars_at(self.byte_to_char(byte_offset))
    }

    fn slice(&self, byte_range: Range<usize>) -> Option<SmolStr> {
        if byte_range.start > byte_range.end
            || !self.is_char_boundary(byte_range.start)
            || !self.is_char_boundary(byte_range.end)
        {
            return None;
        }
        let start = self.rope.byte_to_char(byte_range.start);
        let end = self.rope.byte_to_char(byte_range.end);
        Some(self.rope.slice(start..end).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
