//! Scope resolver - module-first resolution for setup regions
//!
//! Resolution order:
//! 1. Is the position inside a setup region? (ancestor walk, anchor included)
//! 2. If so, the document's associated module - unless that module is the
//!    very scope asking for resolution
//! 3. Lexical fallback (current node and ancestors, shadowing applies)
//!
//! Module declarations are offered before lexical ones, so an early stop
//! during the module pass prevents the fallback from running at all.

use super::lexical::{DocumentScope, LexicalScope};
use crate::declaration::{Declaration, DeclarationProcessor, FindByName};
use crate::document::{Document, Position};
use crate::expr;
use crate::module::{ModuleLookup, ScriptModule};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options controlling a resolver's module lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ResolveOptions {
    /// Restrict module lookup to modules originating from a setup region.
    /// Off by default: inside a setup region, the interesting module is the
    /// ordinary script block's.
    pub strict_modules: bool,
}

/// Resolves the declarations visible at a position in a templated document.
///
/// The resolver owns no state of its own. It composes an injected module
/// lookup with an injected lexical fallback and walks whatever document is
/// handed to each call, so one resolver serves any number of documents.
pub struct ScopeResolver<'a> {
    modules: &'a dyn ModuleLookup,
    fallback: &'a dyn LexicalScope,
    options: ResolveOptions,
}

impl<'a> ScopeResolver<'a> {
    /// Create a resolver with the plain document walk as its fallback.
    pub fn new(modules: &'a dyn ModuleLookup) -> Self {
        Self {
            modules,
            fallback: &DocumentScope,
            options: ResolveOptions::default(),
        }
    }

    /// Create a resolver with an injected fallback strategy.
    pub fn with_fallback(modules: &'a dyn ModuleLookup, fallback: &'a dyn LexicalScope) -> Self {
        Self {
            modules,
            fallback,
            options: ResolveOptions::default(),
        }
    }

    /// Replace the resolver's options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Offer every declaration visible at `position` to `processor`.
    ///
    /// Returns `Ok(true)` after an exhaustive search and `Ok(false)` as
    /// soon as the processor stops it. A position that does not reference
    /// a node of `document` is a contract violation and fails with
    /// [`Error::PositionOutOfDocument`].
    pub fn resolve_declarations(
        &self,
        document: &Document,
        position: Position,
        processor: &mut dyn DeclarationProcessor,
    ) -> Result<bool> {
        if !document.contains(position) {
            return Err(Error::PositionOutOfDocument(position));
        }

        if document.setup_region_of(position.node).is_some() {
            if let Some(module) = self
                .modules
                .find_module(document, self.options.strict_modules)
            {
                if self.is_ancestor_module(document, position, module) {
                    tracing::debug!(
                        "Skipping module {}: it is the scope being resolved",
                        module.name()
                    );
                } else {
                    tracing::trace!(
                        "Visiting module {} before the lexical walk of {}",
                        module.name(),
                        document.path()
                    );
                    if !module.process_declarations(processor, position) {
                        return Ok(false);
                    }
                }
            } else {
                tracing::trace!("No module associated with {}", document.path());
            }
        }

        Ok(self
            .fallback
            .process_declarations(document, position, processor))
    }

    /// First declaration named `name` visible at `position`.
    ///
    /// The module pass runs first, so a module declaration wins over a
    /// lexical one with the same name.
    pub fn resolve_identifier(
        &self,
        document: &Document,
        position: Position,
        name: &str,
    ) -> Result<Option<Declaration>> {
        let mut finder = FindByName::new(name);
        self.resolve_declarations(document, position, &mut finder)?;
        Ok(finder.into_found())
    }

    /// Resolve the identifier inside a raw template attribute value.
    ///
    /// The value is cleaned first (expansion unwrapping, prefix stripping);
    /// malformed or empty values resolve to `None`.
    pub fn resolve_value(
        &self,
        document: &Document,
        position: Position,
        raw: &str,
    ) -> Result<Option<Declaration>> {
        match expr::clean_value(raw) {
            Some(name) if !name.is_empty() => self.resolve_identifier(document, position, name),
            _ => Ok(None),
        }
    }

    /// Cycle guard for the module pass: a module whose origin node is the
    /// position's node or any of its ancestors is the very scope asking
    /// for resolution, and visiting it would loop.
    fn is_ancestor_module(
        &self,
        document: &Document,
        position: Position,
        module: &ScriptModule,
    ) -> bool {
        match module.origin() {
            Some((doc, node)) if doc == document.id() => document
                .self_and_ancestors(position.node)
                .any(|ancestor| ancestor == node),
            _ => false,
        }
    }
}
