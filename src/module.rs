//! Script modules - external declaration containers
//!
//! A module holds the top-level declarations of a script region, or of an
//! external file backing one. Modules are not owned by documents: the
//! embedder keeps them behind a [`ModuleLookup`] (typically a
//! [`ModuleRegistry`]) and resolution looks one up fresh on every query.

use crate::declaration::{Declaration, DeclarationProcessor};
use crate::document::{Document, DocumentId, NodeId, Position};
use std::collections::HashMap;

/// External declaration container associated with a document's script region.
#[derive(Debug, Clone)]
pub struct ScriptModule {
    name: String,
    origin: Option<(DocumentId, NodeId)>,
    /// Declarations in insertion order; visitation follows this order
    declarations: Vec<Declaration>,
    /// name -> slot of the first declaration with that name
    index: HashMap<String, usize>,
}

impl ScriptModule {
    /// Create an empty module. `name` is a display identity, typically the
    /// defining file's path or a script tag description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            declarations: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Record the embedded script node this module corresponds to.
    ///
    /// The origin is what the resolver's cycle guard compares against a
    /// position's ancestor chain. Node ids stay valid for the life of the
    /// document, so the guard never depends on lookup object identity.
    pub fn with_origin(mut self, document: DocumentId, node: NodeId) -> Self {
        self.origin = Some((document, node));
        self
    }

    /// Display name of the module
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The embedded script node this module corresponds to, if any
    pub fn origin(&self) -> Option<(DocumentId, NodeId)> {
        self.origin
    }

    /// Add a declaration. Insertion order is visitation order; for
    /// [`ScriptModule::get`], the first declaration with a given name wins.
    pub fn add_declaration(&mut self, declaration: Declaration) {
        let slot = self.declarations.len();
        self.index.entry(declaration.name.clone()).or_insert(slot);
        self.declarations.push(declaration);
    }

    /// Declarations in insertion order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Look up a declaration by name
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.index.get(name).map(|&slot| &self.declarations[slot])
    }

    /// Number of declarations in the module
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the module has no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Offer every declaration to `processor`, in insertion order.
    ///
    /// Returns `false` as soon as a visit asks to stop, `true` after an
    /// exhaustive pass.
    pub fn process_declarations(
        &self,
        processor: &mut dyn DeclarationProcessor,
        position: Position,
    ) -> bool {
        for declaration in &self.declarations {
            if !processor.visit(declaration, position) {
                return false;
            }
        }
        true
    }
}

/// Lookup capability resolving the module associated with a document.
///
/// Supplied by the embedding environment. Returning `None` is the common
/// case for ordinary documents, not an error.
pub trait ModuleLookup: Send + Sync {
    /// Find the module for `document`'s script region.
    ///
    /// With `strict` set, only a module originating from the document's
    /// setup region qualifies. Otherwise an ordinary script module is
    /// preferred, and any module associated with the document - including
    /// the setup module itself - is an acceptable fallback; the resolver's
    /// cycle guard handles the self-referential case.
    fn find_module(&self, document: &Document, strict: bool) -> Option<&ScriptModule>;
}

/// Registry of script modules keyed by document.
///
/// The default [`ModuleLookup`]: the embedder registers a module per script
/// region and hands the registry to the resolver.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<ScriptModule>,
    by_document: HashMap<DocumentId, Vec<usize>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module for `document`. Registration order is lookup order.
    pub fn register(&mut self, document: DocumentId, module: ScriptModule) {
        let slot = self.modules.len();
        self.modules.push(module);
        self.by_document.entry(document).or_default().push(slot);
    }

    /// Modules registered for a document, in registration order
    pub fn modules_for(&self, document: DocumentId) -> impl Iterator<Item = &ScriptModule> {
        self.by_document
            .get(&document)
            .into_iter()
            .flatten()
            .map(|&slot| &self.modules[slot])
    }
}

impl ModuleLookup for ModuleRegistry {
    fn find_module(&self, document: &Document, strict: bool) -> Option<&ScriptModule> {
        let mut fallback = None;
        for module in self.modules_for(document.id()) {
            let from_setup = module
                .origin
                .map(|(doc, node)| doc == document.id() && document.is_setup_region(node))
                .unwrap_or(false);
            if strict {
                if from_setup {
                    return Some(module);
                }
            } else if !from_setup {
                return Some(module);
            } else if fallback.is_none() {
                fallback = Some(module);
            }
        }
        if strict { None } else { fallback }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclarationKind;
    use crate::span::Span;

    fn sample_decl(name: &str) -> Declaration {
        Declaration::new(name, DeclarationKind::Binding, Span::new(0, 4))
    }

    fn sample_module(names: &[&str]) -> ScriptModule {
        let mut module = ScriptModule::new("Counter.vue script");
        for name in names {
            module.add_declaration(sample_decl(name));
        }
        module
    }

    #[test]
    fn test_module_lookup_and_order() {
        let mut module = sample_module(&["count", "increment"]);
        module.add_declaration(Declaration::new(
            "count",
            DeclarationKind::Callable,
            Span::new(9, 14),
        ));

        // First declaration with a name wins for get()
        assert_eq!(module.get("count").unwrap().kind, DeclarationKind::Binding);
        assert!(module.get("missing").is_none());
        // Visitation still sees every declaration, duplicates included
        assert_eq!(module.len(), 3);
    }

    #[test]
    fn test_process_declarations_early_stop() {
        let module = sample_module(&["count", "double", "increment"]);
        let position = Position {
            document: DocumentId(1),
            node: NodeId::root(),
            offset: 0,
        };

        let mut collector = crate::declaration::DeclarationCollector::new();
        assert!(module.process_declarations(&mut collector, position));
        assert_eq!(collector.names(), vec!["count", "double", "increment"]);

        let mut finder = crate::declaration::FindByName::new("double");
        assert!(!module.process_declarations(&mut finder, position));
        assert_eq!(finder.into_found().unwrap().name, "double");
    }

    #[test]
    fn test_registry_strict_and_fallback() {
        let mut doc = Document::new("app/Counter.vue", 200);
        let plain = doc
            .add_element(NodeId::root(), "script", Span::new(0, 100))
            .unwrap();
        let setup = doc
            .add_element(NodeId::root(), "script", Span::new(100, 200))
            .unwrap();
        doc.set_setup_region(setup, true).unwrap();

        let mut registry = ModuleRegistry::new();
        registry.register(
            doc.id(),
            sample_module(&["fromSetup"]).with_origin(doc.id(), setup),
        );
        registry.register(
            doc.id(),
            sample_module(&["fromPlain"]).with_origin(doc.id(), plain),
        );

        // strict: only the setup-region module qualifies
        let module = registry.find_module(&doc, true).unwrap();
        assert!(module.get("fromSetup").is_some());

        // non-strict: the ordinary script module is preferred
        let module = registry.find_module(&doc, false).unwrap();
        assert!(module.get("fromPlain").is_some());
    }

    #[test]
    fn test_registry_falls_back_to_setup_module() {
        let mut doc = Document::new("app/SetupOnly.vue", 100);
        let setup = doc
            .add_element(NodeId::root(), "script", Span::new(0, 100))
            .unwrap();
        doc.set_setup_region(setup, true).unwrap();

        let mut registry = ModuleRegistry::new();
        registry.register(
            doc.id(),
            sample_module(&["onlySetup"]).with_origin(doc.id(), setup),
        );

        // Nothing ordinary registered: the setup module itself comes back
        let module = registry.find_module(&doc, false).unwrap();
        assert!(module.get("onlySetup").is_some());
    }

    #[test]
    fn test_registry_is_per_document() {
        let doc_a = Document::new("a.vue", 10);
        let doc_b = Document::new("b.vue", 10);

        let mut registry = ModuleRegistry::new();
        registry.register(doc_a.id(), sample_module(&["a"]));

        assert!(registry.find_module(&doc_a, false).is_some());
        assert!(registry.find_module(&doc_b, false).is_none());
    }
}
