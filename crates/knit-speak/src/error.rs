//! Symbol table and course expansion errors.

use knit_core::GraphError;

/// Errors raised while defining, resolving, or working stitches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnitSpeakError {
    /// No symbol is registered under this name.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// A cable leg crosses fewer than 1 or more than 3 loops.
    #[error("cable legs must cross 1 to 3 loops, got {left}|{right}")]
    InvalidCableWidth { left: usize, right: usize },

    /// Cables lean left or right; a centred cable is not a crossing.
    #[error("a cable must lean left or right")]
    InvalidCableLean,

    /// A stitch produces at most one loop.
    #[error("a stitch produces 0 or 1 loops, got {0}")]
    InvalidChildCount(usize),

    /// The symbol exists but cannot be used where it was asked for.
    #[error("symbol '{name}' is a {found}, expected a {expected}")]
    NotAStitch {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    /// A parent offset resolves outside the unworked part of the prior course.
    #[error(
        "offset {offset} at cursor {cursor} falls outside the prior course ({len} loops)"
    )]
    MalformedCourseOffset { cursor: usize, offset: i32, len: usize },

    /// The course was finished with loops of the prior course left unworked.
    #[error("course finished with {remaining} unworked loops on the prior course")]
    IncompleteCourse { remaining: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type alias for symbol and expansion operations.
pub type Result<T> = std::result::Result<T, KnitSpeakError>;
