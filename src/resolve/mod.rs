//! Declaration resolution for templated documents
//!
//! Two layers cooperate here. [`lexical`] walks a document's node tree from
//! a position outward, honoring shadowing. [`resolver`] sits on top and adds
//! the module pass for setup regions before delegating to the walk.

pub mod lexical;
pub mod resolver;

pub use lexical::{DocumentScope, LexicalScope};
pub use resolver::{ResolveOptions, ScopeResolver};
