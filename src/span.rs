//! Byte-range spans
//!
//! Every node in a document covers a half-open byte range of the source
//! text. Spans are plain values; copying one never aliases document state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `start..end` within a document's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First byte covered by the span
    pub start: u32,
    /// One past the last byte covered by the span
    pub end: u32,
}

impl Span {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {} exceeds end {}", start, end);
        Self { start, end }
    }

    /// Length of the span in bytes. Inverted bounds count as zero.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` falls inside the span (half-open)
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely within this span
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
