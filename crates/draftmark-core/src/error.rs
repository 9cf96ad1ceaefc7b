//! Error types for markdown span tracking.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Which of the two reserved overlay spans an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// The insertion-point highlight.
    Cursor,
    /// The input-method composition underline.
    Compose,
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlay::Cursor => f.write_str("cursor"),
            Overlay::Compose => f.write_str("compose"),
        }
    }
}

/// Why an overlay hide/show call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// Hide was called without a matching show.
    NotShown,
    /// Show was called while the overlay was already shown.
    AlreadyShown,
    /// The buffer length changed between show and hide.
    BufferChanged { expected: usize, actual: usize },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::NotShown => f.write_str("overlay was not shown"),
            StaleReason::AlreadyShown => f.write_str("overlay is already shown"),
            StaleReason::BufferChanged { expected, actual } => write!(
                f,
                "buffer length changed from {expected} to {actual} while overlay was shown"
            ),
        }
    }
}

/// Errors reported by the markdown engine.
///
/// All of these describe caller contract violations. The engine's own
/// span/toggle bookkeeping never fails.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EngineError {
    /// The scan cursor points past the end of the buffer.
    #[error("scan position {offset} is past the end of the buffer (len {len})")]
    #[diagnostic(
        code(draftmark::invalid_position),
        help("the buffer was truncated behind the engine's back; only truncate through retract")
    )]
    InvalidPosition { offset: usize, len: usize },

    /// An overlay was hidden without being shown, shown twice, or the
    /// buffer changed underneath it.
    #[error("stale {overlay} overlay: {reason}")]
    #[diagnostic(code(draftmark::stale_overlay))]
    StaleOverlay { overlay: Overlay, reason: StaleReason },

    /// A markdown mutation was attempted while an overlay owns the buffer tail.
    #[error("cannot edit markdown while the {overlay} overlay is shown")]
    #[diagnostic(
        code(draftmark::overlay_active),
        help("hide the overlay before appending or retracting")
    )]
    OverlayActive { overlay: Overlay },

    /// A caller-supplied range is out of bounds or splits a codepoint.
    #[error("invalid range {start}..{end} for buffer of len {len}")]
    #[diagnostic(code(draftmark::invalid_range))]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Markup output was requested for spans that cross each other.
    #[error("spans cross each other and cannot be expressed as nested markup")]
    #[diagnostic(
        code(draftmark::crossing_spans),
        help("use the attribute list form for overlapping spans")
    )]
    CrossingSpans,

    /// Writing markup output failed.
    #[error("failed to write markup: {0}")]
    #[diagnostic(code(draftmark::write))]
    Write(#[from] std::fmt::Error),

    /// The KDL configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    #[diagnostic(code(draftmark::config::parse))]
    ConfigParse(#[from] kdl::KdlError),

    /// A configuration value was present but unusable.
    #[error("invalid configuration value for `{key}`: {reason}")]
    #[diagnostic(code(draftmark::config::invalid))]
    InvalidConfig { key: &'static str, reason: String },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
