//! Lexical fallback - the ordinary scope walk
//!
//! Visits the declarations attached to the position's node and its
//! ancestors, innermost first. This is the default behavior a document
//! type exposes when no setup region is involved, and the continuation
//! step after a module pass.

use crate::declaration::DeclarationProcessor;
use crate::document::{Document, Position};
use std::collections::HashSet;

/// Default scope-resolution strategy of a document.
///
/// Implementations are injected into a resolver as its fallback step. The
/// early-stop contract is the processor's: return `false` as soon as a
/// visit asks to stop, `true` after an exhaustive walk.
pub trait LexicalScope: Send + Sync {
    /// Offer every lexically visible declaration to `processor`.
    fn process_declarations(
        &self,
        document: &Document,
        position: Position,
        processor: &mut dyn DeclarationProcessor,
    ) -> bool;
}

/// Plain lexical walk over the position's node and its ancestors.
///
/// An inner declaration hides an outer declaration with the same
/// identifier; within one node, declarations are visited in attachment
/// order. Module-phase declarations never feed the shadowing set - the
/// walk only shadows within itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentScope;

impl LexicalScope for DocumentScope {
    fn process_declarations(
        &self,
        document: &Document,
        position: Position,
        processor: &mut dyn DeclarationProcessor,
    ) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        for node in document.self_and_ancestors(position.node) {
            for declaration in document.declarations(node) {
                // A name already visited shadows any outer declaration
                if !visited.insert(declaration.name.as_str()) {
                    continue;
                }
                if !processor.visit(declaration, position) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Declaration, DeclarationCollector, DeclarationKind, FindByName};
    use crate::document::NodeId;
    use crate::span::Span;

    fn decl(name: &str) -> Declaration {
        Declaration::new(name, DeclarationKind::Binding, Span::new(0, 1))
    }

    fn nested_document() -> (Document, NodeId) {
        // root(item, shared) > section(index, shared) > row(item)
        let mut doc = Document::new("list.vue", 100);
        doc.add_declaration(NodeId::root(), decl("item")).unwrap();
        doc.add_declaration(NodeId::root(), decl("shared")).unwrap();
        let section = doc
            .add_element(NodeId::root(), "section", Span::new(0, 80))
            .unwrap();
        doc.add_declaration(section, decl("index")).unwrap();
        doc.add_declaration(section, decl("shared")).unwrap();
        let row = doc.add_element(section, "div", Span::new(10, 60)).unwrap();
        doc.add_declaration(row, decl("item")).unwrap();
        (doc, row)
    }

    #[test]
    fn test_innermost_first_with_shadowing() {
        let (doc, row) = nested_document();
        let position = doc.position(row, 20).unwrap();

        let mut collector = DeclarationCollector::new();
        assert!(DocumentScope.process_declarations(&doc, position, &mut collector));

        // row's `item` shadows the root's; section's `shared` shadows the root's
        assert_eq!(collector.names(), vec!["item", "index", "shared"]);
    }

    #[test]
    fn test_early_stop_mid_walk() {
        let (doc, row) = nested_document();
        let position = doc.position(row, 20).unwrap();

        let mut finder = FindByName::new("index");
        assert!(!DocumentScope.process_declarations(&doc, position, &mut finder));
        assert_eq!(finder.into_found().unwrap().name, "index");
    }

    #[test]
    fn test_text_anchor_walks_parents() {
        let (mut doc, row) = nested_document();
        let text = doc.add_text(row, Span::new(20, 30)).unwrap();
        let position = doc.position(text, 25).unwrap();

        let mut collector = DeclarationCollector::new();
        assert!(DocumentScope.process_declarations(&doc, position, &mut collector));
        assert_eq!(collector.names(), vec!["item", "index", "shared"]);
    }
}
