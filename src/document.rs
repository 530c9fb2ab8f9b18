//! Document tree - ordered nodes with byte spans and parent links
//!
//! The host parser builds a [`Document`] once; resolution queries then walk
//! it read-only. Nodes live in an arena owned by the document and are
//! addressed by [`NodeId`], so a node can never outlive its document and
//! parent links are acyclic by construction (a child can only be attached
//! under an already-existing node). Mutation requires `&mut Document`,
//! which makes concurrent mutation during a query impossible in safe code.

use crate::declaration::Declaration;
use crate::lang::LangMode;
use crate::span::Span;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Tag of the synthetic root element every document is created with
pub const ROOT_TAG: &str = "#document";

static NEXT_DOCUMENT_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a document within the process.
///
/// Allocated when the document is constructed; a [`Position`] minted for
/// one document can never validate against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

/// Identifier of a node within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node every document is created with
    pub fn root() -> Self {
        Self(0)
    }
}

/// The kind of node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Tag/element node - creates scope, may carry declarations
    Element,
    /// Text content - always a leaf
    Text,
}

/// A location inside a document: an anchor node plus an absolute byte offset.
///
/// Positions are read-only query anchors; resolution never mutates them.
/// A position is valid when its document id matches, its node exists, and
/// its offset falls within the node's span - end boundary included, since
/// a caret may sit just past the last byte of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Document the position belongs to
    pub document: DocumentId,
    /// Node the position is anchored at
    pub node: NodeId,
    /// Absolute byte offset within the document
    pub offset: u32,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    tag: Option<String>,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    setup_region: bool,
    lang: Option<LangMode>,
    declarations: Vec<Declaration>,
}

impl Node {
    fn new(kind: NodeKind, tag: Option<String>, span: Span, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            tag,
            span,
            parent,
            children: Vec::new(),
            setup_region: false,
            lang: None,
            declarations: Vec::new(),
        }
    }
}

/// An ordered tree of element and text nodes covering a templated source file.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    path: String,
    len: u32,
    nodes: Vec<Node>,
    /// Document-level lang override; wins over markup when present
    lang_mode: Option<LangMode>,
}

impl Document {
    /// Create a document whose root element spans the whole source (`0..len`).
    ///
    /// `path` is a display identity, e.g. `app/Counter.vue`.
    pub fn new(path: impl Into<String>, len: u32) -> Self {
        let root = Node::new(
            NodeKind::Element,
            Some(ROOT_TAG.to_string()),
            Span::new(0, len),
            None,
        );
        Self {
            id: DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)),
            path: path.into(),
            len,
            nodes: vec![root],
            lang_mode: None,
        }
    }

    /// Process-unique id of this document
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Display path of this document
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Length of the underlying source in bytes
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the underlying source is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node
    pub fn root(&self) -> NodeId {
        NodeId::root()
    }

    /// Number of nodes in the document, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0 as usize).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(Error::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let node = self.node_mut(id)?;
        if node.kind != NodeKind::Element {
            return Err(Error::NotAnElement(id));
        }
        Ok(node)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        tag: Option<String>,
        span: Span,
    ) -> Result<NodeId> {
        let parent_node = self.node(parent)?;
        if parent_node.kind != NodeKind::Element {
            return Err(Error::NotAnElement(parent));
        }
        if !parent_node.span.contains_span(span) {
            return Err(Error::SpanOutOfBounds {
                child: span,
                parent: parent_node.span,
            });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, tag, span, Some(parent)));
        self.nodes[parent.0 as usize].children.push(id);
        Ok(id)
    }

    /// Append an element node under `parent`.
    ///
    /// The child span must lie entirely within the parent span.
    pub fn add_element(&mut self, parent: NodeId, tag: impl Into<String>, span: Span) -> Result<NodeId> {
        self.attach(parent, NodeKind::Element, Some(tag.into()), span)
    }

    /// Append a text node under `parent`. Text nodes are leaves.
    pub fn add_text(&mut self, parent: NodeId, span: Span) -> Result<NodeId> {
        self.attach(parent, NodeKind::Text, None, span)
    }

    /// Mark or unmark an element as the document's embedded setup region.
    pub fn set_setup_region(&mut self, node: NodeId, setup: bool) -> Result<()> {
        self.element_mut(node)?.setup_region = setup;
        Ok(())
    }

    /// Record the script dialect an element declares (`lang="ts"`).
    pub fn set_lang(&mut self, node: NodeId, lang: LangMode) -> Result<()> {
        self.element_mut(node)?.lang = Some(lang);
        Ok(())
    }

    /// Set the document-level lang mode. Precomputed metadata wins over
    /// anything the markup declares.
    pub fn set_lang_mode(&mut self, mode: LangMode) {
        self.lang_mode = Some(mode);
    }

    /// Attach an in-scope declaration to an element. Elements create scope;
    /// text nodes carry no declarations.
    pub fn add_declaration(&mut self, node: NodeId, declaration: Declaration) -> Result<()> {
        self.element_mut(node)?.declarations.push(declaration);
        Ok(())
    }

    /// Get the kind of a node
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(node.0 as usize).map(|n| n.kind)
    }

    /// Get the tag of an element node
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(node.0 as usize)
            .and_then(|n| n.tag.as_deref())
    }

    /// Get the span of a node
    pub fn span(&self, node: NodeId) -> Option<Span> {
        self.nodes.get(node.0 as usize).map(|n| n.span)
    }

    /// Get the parent of a node (`None` for the root)
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0 as usize).and_then(|n| n.parent)
    }

    /// Children of a node, in document order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Declarations attached to a node, in attachment order
    pub fn declarations(&self, node: NodeId) -> &[Declaration] {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.declarations.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a node is marked as the embedded setup region
    pub fn is_setup_region(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.setup_region)
            .unwrap_or(false)
    }

    /// Script dialect an element declares, if any
    pub fn lang(&self, node: NodeId) -> Option<LangMode> {
        self.nodes.get(node.0 as usize).and_then(|n| n.lang)
    }

    /// Iterator over a node's strict ancestors, innermost first, ending at
    /// the root.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(node),
        }
    }

    /// Like [`Document::ancestors`], but starts at `node` itself.
    pub fn self_and_ancestors(&self, node: NodeId) -> Ancestors<'_> {
        let next = if (node.0 as usize) < self.nodes.len() {
            Some(node)
        } else {
            None
        };
        Ancestors {
            document: self,
            next,
        }
    }

    /// Nearest setup-region node enclosing `node`, the node itself included.
    pub fn setup_region_of(&self, node: NodeId) -> Option<NodeId> {
        self.self_and_ancestors(node)
            .find(|&id| self.is_setup_region(id))
    }

    /// Mint a validated position anchored at `node`.
    pub fn position(&self, node: NodeId, offset: u32) -> Result<Position> {
        let position = Position {
            document: self.id,
            node,
            offset,
        };
        if self.contains(position) {
            Ok(position)
        } else {
            Err(Error::PositionOutOfDocument(position))
        }
    }

    /// Whether `position` references a node of this document with an offset
    /// inside that node's span, end boundary included.
    pub fn contains(&self, position: Position) -> bool {
        if position.document != self.id {
            return false;
        }
        match self.span(position.node) {
            Some(span) => span.start <= position.offset && position.offset <= span.end,
            None => false,
        }
    }

    /// Position at the deepest node whose span contains `offset`.
    pub fn position_at(&self, offset: u32) -> Option<Position> {
        if !self.nodes[0].span.contains(offset) {
            return None;
        }
        let mut current = NodeId::root();
        loop {
            let deeper = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| self.span(child).map(|s| s.contains(offset)).unwrap_or(false));
            match deeper {
                Some(child) => current = child,
                None => {
                    return Some(Position {
                        document: self.id,
                        node: current,
                        offset,
                    })
                }
            }
        }
    }

    /// Script dialect of the document.
    ///
    /// Stored metadata wins when present; otherwise the setup region's
    /// declared `lang` decides, then the first element declaring one, and
    /// plain JavaScript is the default.
    pub fn lang_mode(&self) -> LangMode {
        if let Some(mode) = self.lang_mode {
            return mode;
        }
        let mut first = None;
        for node in &self.nodes {
            if let Some(lang) = node.lang {
                if node.setup_region {
                    return lang;
                }
                if first.is_none() {
                    first = Some(lang);
                }
            }
        }
        first.unwrap_or_default()
    }
}

/// Lazy walk over a node's parent links, ending at the document root.
///
/// Finite (parent links are acyclic by construction) and holds no state
/// beyond the next node to yield, so a fresh walk is cheap to start.
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}
