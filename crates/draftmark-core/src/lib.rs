//! draftmark-core: incremental markdown styling for text being typed.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage abstraction
//! - `EditorString` (contiguous) and `EditorRope` (ropey-backed) buffers
//! - `MarkdownState` - span tracking that only looks at appended text
//! - `Renderable<T>` - a paragraph with scoped cursor/composition overlays
//! - Attribute list and markup output for the rendering backend

pub mod backspace;
pub mod config;
pub mod cursor;
pub mod error;
pub mod overlay;
pub mod paragraph;
pub mod render;
pub mod scanner;
pub mod span;
pub mod state;
pub mod text;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, RenderStyle};
pub use cursor::ScanCursor;
pub use error::{EngineError, Overlay, Result, StaleReason};
pub use paragraph::{ComposeGuard, CursorGuard, Renderable};
pub use render::{
    Attribute, CursorParagraph, OPEN_ATTR_END, attributes, attributes_to_string, cursor_paragraph,
    render_markup,
};
pub use scanner::{BOLD_MARKER, ITALIC_MARKER};
pub use smol_str::SmolStr;
pub use span::{Span, SpanEnd, SpanId, SpanKind, SpanList, simplify};
pub use state::{MarkdownState, OpenToggles};
pub use text::{EditorRope, EditorString, TextBuffer};
