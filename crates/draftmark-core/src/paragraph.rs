//! A paragraph being typed: buffer plus engine state.
//!
//! `Renderable` is what the input loop talks to. Overlays are only reachable
//! through the scoped guards returned by `cursor()` and `composing()`, which
//! hold the paragraph mutably and restore it when dropped.

use std::ops::Deref;

use crate::config::{EngineConfig, RenderStyle};
use crate::error::Result;
use crate::render::{self, Attribute};
use crate::span::SpanList;
use crate::state::MarkdownState;
use crate::text::{EditorString, TextBuffer};

/// Buffer and markdown state for one paragraph.
#[derive(Debug, Clone)]
pub struct Renderable<T = EditorString> {
    buffer: T,
    state: MarkdownState,
    style: RenderStyle,
}

impl Renderable<EditorString> {
    /// Build a paragraph from existing markdown, with spare capacity for
    /// typing, and scan it.
    pub fn new(text: &str, config: &EngineConfig) -> Result<Self> {
        let buffer = EditorString::from_str_with_capacity(text, config.initial_capacity);
        Self::with_buffer(buffer, config)
    }
}

impl<T: TextBuffer> Renderable<T> {
    /// Wrap an existing buffer and scan its contents.
    pub fn with_buffer(buffer: T, config: &EngineConfig) -> Result<Self> {
        let mut state = MarkdownState::with_config(config);
        state.extend(&buffer)?;
        Ok(Self {
            buffer,
            state,
            style: config.style,
        })
    }

    /// Append typed text and classify it.
    pub fn append_chars(&mut self, chars: &str) -> Result<usize> {
        let mut it = chars.chars();
        match (it.next(), it.next()) {
            (None, _) => return Ok(0),
            (Some(c), None) => self.buffer.push_char(c),
            _ => self.buffer.push(chars),
        }
        self.state.extend(&self.buffer)
    }

    /// Delete the last codepoint.
    pub fn backspace(&mut self) -> Result<Option<char>> {
        self.state.retract(&mut self.buffer)
    }

    /// Show the cursor marker until the guard is dropped.
    pub fn cursor(&mut self) -> Result<CursorGuard<'_, T>> {
        CursorGuard::show(self)
    }

    /// Show uncommitted input method text, underlined, until the guard is
    /// dropped. The text is not scanned for markers.
    pub fn composing(&mut self, preedit: &str) -> Result<ComposeGuard<'_, T>> {
        let restore_len = self.buffer.len_bytes();
        if preedit.is_empty() {
            return Ok(ComposeGuard {
                paragraph: self,
                restore_len: None,
            });
        }

        self.buffer.push(preedit);
        let end = self.buffer.len_bytes();
        if let Err(err) = self.state.show_compose(&self.buffer, restore_len..end) {
            self.buffer.truncate(restore_len);
            return Err(err);
        }
        Ok(ComposeGuard {
            paragraph: self,
            restore_len: Some(restore_len),
        })
    }

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn state(&self) -> &MarkdownState {
        &self.state
    }

    pub fn spans(&self) -> &SpanList {
        self.state.spans()
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        render::attributes(self.state.spans())
    }

    /// One line per attribute, as `"{start} {end} {property} {value}"`.
    pub fn attributes_string(&self) -> String {
        render::attributes_to_string(self.state.spans(), &self.style)
    }

    pub fn markup(&self) -> Result<String> {
        render::render_markup(&self.buffer, self.state.spans(), &self.style)
    }
}

/// Cursor marker shown on a paragraph. Hidden again on drop.
#[derive(Debug)]
pub struct CursorGuard<'a, T: TextBuffer> {
    paragraph: &'a mut Renderable<T>,
}

impl<'a, T: TextBuffer> CursorGuard<'a, T> {
    fn show(paragraph: &'a mut Renderable<T>) -> Result<Self> {
        paragraph.state.show_cursor(&mut paragraph.buffer)?;
        Ok(Self { paragraph })
    }
}

impl<T: TextBuffer> Deref for CursorGuard<'_, T> {
    type Target = Renderable<T>;

    fn deref(&self) -> &Self::Target {
        self.paragraph
    }
}

impl<T: TextBuffer> Drop for CursorGuard<'_, T> {
    fn drop(&mut self) {
        let paragraph = &mut *self.paragraph;
        if let Err(err) = paragraph.state.hide_cursor(&mut paragraph.buffer) {
            tracing::warn!(target: "draftmark::overlay", error = %err, "failed to hide cursor");
        }
    }
}

/// Composition text shown on a paragraph. Removed again on drop.
#[derive(Debug)]
pub struct ComposeGuard<'a, T: TextBuffer> {
    paragraph: &'a mut Renderable<T>,
    /// Buffer length to truncate back to; None when nothing was appended.
    restore_len: Option<usize>,
}

impl<T: TextBuffer> ComposeGuard<'_, T> {
    /// Show the cursor after the composition text.
    pub fn cursor(&mut self) -> Result<CursorGuard<'_, T>> {
        CursorGuard::show(&mut *self.paragraph)
    }
}

impl<T: TextBuffer> Deref for ComposeGuard<'_, T> {
    type Target = Renderable<T>;

    fn deref(&self) -> &Self::Target {
        self.paragraph
    }
}

impl<T: TextBuffer> Drop for ComposeGuard<'_, T> {
    fn drop(&mut self) {
        let Some(restore_len) = self.restore_len else {
            return;
        };
        let paragraph = &mut *self.paragraph;
        if let Err(err) = paragraph.state.hide_compose(&paragraph.buffer) {
            tracing::warn!(target: "draftmark::overlay", error = %err, "failed to hide composition");
            return;
        }
        paragraph.buffer.truncate(restore_len);
    }
}
