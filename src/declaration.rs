//! Declarations and the processor capability
//!
//! A declaration is a named binding introduced by a document node or by an
//! external script module. During resolution, candidate declarations are
//! handed one by one to a caller-supplied [`DeclarationProcessor`], which
//! can stop the search as soon as it has what it needs.

use crate::document::Position;
use crate::span::Span;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kinds of declarations a scope can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Value binding - const, let, reactive state
    Binding,
    /// Function or method
    Callable,
    /// Component made available to the surrounding markup
    Component,
    /// Name brought in from another module
    Import,
}

impl DeclarationKind {
    /// Get the string representation of the declaration kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Binding => "binding",
            DeclarationKind::Callable => "callable",
            DeclarationKind::Component => "component",
            DeclarationKind::Import => "import",
        }
    }

    /// Get all declaration kinds
    pub fn all() -> &'static [DeclarationKind] {
        &[
            DeclarationKind::Binding,
            DeclarationKind::Callable,
            DeclarationKind::Component,
            DeclarationKind::Import,
        ]
    }
}

impl FromStr for DeclarationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "binding" | "value" | "const" | "let" | "var" => Ok(DeclarationKind::Binding),
            "callable" | "function" | "method" | "fn" => Ok(DeclarationKind::Callable),
            "component" | "tag" => Ok(DeclarationKind::Component),
            "import" | "use" => Ok(DeclarationKind::Import),
            _ => Err(Error::UnknownDeclarationKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named declaration visible somewhere in a templated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Identifier the declaration introduces
    pub name: String,
    /// What kind of thing the identifier names
    pub kind: DeclarationKind,
    /// Where the declaration is written, in its defining file's coordinates
    pub span: Span,
}

impl Declaration {
    /// Create a new declaration
    pub fn new(name: impl Into<String>, kind: DeclarationKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
        }
    }
}

/// Visitor capability handed to a resolution call.
///
/// `visit` is invoked once per candidate declaration, module declarations
/// before lexical ones. Returning `false` means "found what I needed, stop
/// searching": the resolution call returns `false` immediately and nothing
/// further is visited. Early stop is the expected way for a lookup to end,
/// not an error condition. A panic inside `visit` unwinds to the caller
/// unmodified.
pub trait DeclarationProcessor {
    /// Inspect one candidate declaration. Return `false` to stop the search.
    fn visit(&mut self, declaration: &Declaration, position: Position) -> bool;
}

/// Processor that collects every candidate it is offered.
#[derive(Debug, Default)]
pub struct DeclarationCollector {
    /// Visited declarations, in visitation order
    pub declarations: Vec<Declaration>,
}

impl DeclarationCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the visited declarations, in visitation order
    pub fn names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }
}

impl DeclarationProcessor for DeclarationCollector {
    fn visit(&mut self, declaration: &Declaration, _position: Position) -> bool {
        self.declarations.push(declaration.clone());
        true
    }
}

/// Processor that stops on the first declaration with a matching name.
#[derive(Debug)]
pub struct FindByName {
    name: String,
    /// First match, if any
    pub found: Option<Declaration>,
}

impl FindByName {
    /// Create a finder for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            found: None,
        }
    }

    /// Consume the finder, yielding the match if there was one
    pub fn into_found(self) -> Option<Declaration> {
        self.found
    }
}

impl DeclarationProcessor for FindByName {
    fn visit(&mut self, declaration: &Declaration, _position: Position) -> bool {
        if declaration.name == self.name {
            self.found = Some(declaration.clone());
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, NodeId};

    fn sample_position() -> Position {
        Position {
            document: DocumentId(1),
            node: NodeId::root(),
            offset: 0,
        }
    }

    fn sample_decl(name: &str) -> Declaration {
        Declaration::new(name, DeclarationKind::Binding, Span::new(0, 4))
    }

    #[test]
    fn test_declaration_kind_roundtrip() {
        for kind in DeclarationKind::all() {
            let parsed: DeclarationKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_declaration_kind_aliases() {
        assert_eq!(
            DeclarationKind::from_str("const").unwrap(),
            DeclarationKind::Binding
        );
        assert_eq!(
            DeclarationKind::from_str("function").unwrap(),
            DeclarationKind::Callable
        );
        assert_eq!(
            DeclarationKind::from_str("use").unwrap(),
            DeclarationKind::Import
        );
        assert!(DeclarationKind::from_str("widget").is_err());
    }

    #[test]
    fn test_collector_preserves_order() {
        let position = sample_position();
        let mut collector = DeclarationCollector::new();
        for name in ["count", "double", "increment"] {
            assert!(collector.visit(&sample_decl(name), position));
        }
        assert_eq!(collector.names(), vec!["count", "double", "increment"]);
    }

    #[test]
    fn test_find_by_name_stops() {
        let position = sample_position();
        let mut finder = FindByName::new("double");
        assert!(finder.visit(&sample_decl("count"), position));
        assert!(!finder.visit(&sample_decl("double"), position));
        assert_eq!(finder.into_found().unwrap().name, "double");
    }

    #[test]
    fn test_declaration_serialized_shape() {
        let decl = Declaration::new("count", DeclarationKind::Binding, Span::new(10, 15));
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["name"], "count");
        assert_eq!(json["kind"], "binding");
        assert_eq!(json["span"]["start"], 10);
        assert_eq!(json["span"]["end"], 15);
    }
}
