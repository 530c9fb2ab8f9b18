//! # Templescope - Scope resolution for templated documents
//!
//! Declaration visibility for documents that mix markup with embedded
//! script regions, such as single-file components.
//!
//! Templescope provides:
//! - An arena-backed document tree with spans, setup regions, and per-node declarations
//! - Script modules with ordered declarations behind a pluggable lookup trait
//! - A resolver that offers module declarations before the lexical walk
//! - An early-stop processor contract shared by every resolution layer
//! - Template value cleanup (expansion unwrapping, binding prefixes)

pub mod span;
pub mod lang;
pub mod declaration;
pub mod document;
pub mod module;
pub mod resolve;
pub mod expr;

// Re-exports for convenient access
pub use declaration::{Declaration, DeclarationKind, DeclarationProcessor};
pub use document::{Document, DocumentId, NodeId, NodeKind, Position};
pub use lang::LangMode;
pub use module::{ModuleLookup, ModuleRegistry, ScriptModule};
pub use resolve::{DocumentScope, LexicalScope, ResolveOptions, ScopeResolver};
pub use span::Span;

/// Result type alias for Templescope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Templescope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Span {child} does not fit inside parent span {parent}")]
    SpanOutOfBounds { child: Span, parent: Span },

    #[error("Position {0:?} does not reference this document")]
    PositionOutOfDocument(Position),

    #[error("Unknown declaration kind: {0}")]
    UnknownDeclarationKind(String),

    #[error("Unknown lang mode: {0}")]
    UnknownLangMode(String),
}
