//! Arena-backed layout tree.
//!
//! Every node of a page lives in one `Vec` owned by [`LayoutTree`] and is
//! addressed by a [`NodeId`]. Composite nodes ("spans") own an ordered deque
//! of child ids; each node stores its parent as a plain index, so the
//! back-reference never owns anything.
//!
//! A span's box is always the box running from its first child's top-left to
//! its last child's bottom-right. It is recomputed after every structural
//! edit of that span (and only that span): ancestors keep the box they had.
//! Nodes detached by an edit stay in the arena until the tree is dropped.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::BBox;
use super::script::{is_primary_script, is_punctuation, primary_percent};
use super::style::Style;
use crate::error::{Error, Result};

/// Stable handle to a node in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural role of a node, resolved once from its hOCR class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Page,
    Block,
    Paragraph,
    Line,
    Word,
    /// Any other classed element; kept so the tree always builds
    Span,
}

impl NodeKind {
    /// Resolve the kind from a (possibly multi-valued) class attribute.
    pub fn from_class(class: &str) -> Self {
        let mut kind = NodeKind::Span;
        for token in class.split_whitespace() {
            let resolved = match token {
                "ocr_page" => NodeKind::Page,
                "ocrx_block" | "ocr_carea" => NodeKind::Block,
                "ocr_par" => NodeKind::Paragraph,
                "ocr_line" | "ocr_header" | "ocr_caption" | "ocr_textfloat" => NodeKind::Line,
                "ocrx_word" => NodeKind::Word,
                _ => continue,
            };
            kind = resolved;
            break;
        }
        kind
    }

    /// The canonical hOCR class for this kind.
    pub fn class_name(self) -> &'static str {
        match self {
            NodeKind::Page => "ocr_page",
            NodeKind::Block => "ocrx_block",
            NodeKind::Paragraph => "ocr_par",
            NodeKind::Line => "ocr_line",
            NodeKind::Word => "ocrx_word",
            NodeKind::Span => "ocr_span",
        }
    }

    /// Whether nodes of this kind hold children.
    pub fn is_span(self) -> bool {
        !matches!(self, NodeKind::Word)
    }
}

/// Leaf text of a word node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Recognized text
    pub text: String,
    /// Whitespace (or other text) following the word in the markup
    pub tail: Option<String>,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, tail: Option<String>) -> Self {
        Self {
            text: text.into(),
            tail,
        }
    }

    /// Text followed by its trailing whitespace.
    pub fn text_with_ws(&self) -> String {
        match &self.tail {
            Some(tail) => format!("{}{}", self.text, tail),
            None => self.text.clone(),
        }
    }

    /// Primary-script test at the given threshold.
    pub fn is_primary_script(&self, threshold: f64) -> bool {
        is_primary_script(&self.text, threshold)
    }

    /// Single punctuation character.
    pub fn is_punct(&self) -> bool {
        is_punctuation(&self.text)
    }
}

#[derive(Debug, Clone)]
enum Content {
    Token(Token),
    Children(VecDeque<NodeId>),
}

/// One node of the layout tree.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    class: String,
    bbox: BBox,
    style: Option<Style>,
    parent: Option<NodeId>,
    content: Content,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The class attribute the node was built from (its type tag).
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Resolved style: the node's own, or the nearest styled ancestor's at build time.
    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The token carried by a word node.
    pub fn token(&self) -> Option<&Token> {
        match &self.content {
            Content::Token(token) => Some(token),
            Content::Children(_) => None,
        }
    }

    /// Ordered children of a span; empty for words.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let children = match &self.content {
            Content::Children(children) => Some(children.iter().copied()),
            Content::Token(_) => None,
        };
        children.into_iter().flatten()
    }

    pub fn is_span(&self) -> bool {
        matches!(self.content, Content::Children(_))
    }
}

/// A page's layout tree.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl LayoutTree {
    /// Create a tree holding a single, childless root span.
    pub fn new(kind: NodeKind, bbox: BBox) -> Self {
        let root = Node {
            kind,
            class: kind.class_name().to_string(),
            bbox,
            style: None,
            parent: None,
            content: Content::Children(VecDeque::new()),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node. Ids are only valid for the tree that issued them.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn bbox(&self, id: NodeId) -> BBox {
        self.node(id).bbox
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.node(id).style()
    }

    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.node(id).token()
    }

    pub(crate) fn set_class(&mut self, id: NodeId, class: impl Into<String>) {
        self.nodes[id.0].class = class.into();
    }

    pub(crate) fn set_style(&mut self, id: NodeId, style: Option<Style>) {
        self.nodes[id.0].style = style;
    }

    pub(crate) fn set_bbox(&mut self, id: NodeId, bbox: BBox) {
        self.nodes[id.0].bbox = bbox;
    }

    /// Allocate a detached word node.
    pub fn new_token(&mut self, token: Token, bbox: BBox, style: Option<Style>) -> NodeId {
        self.push_node(Node {
            kind: NodeKind::Word,
            class: NodeKind::Word.class_name().to_string(),
            bbox,
            style,
            parent: None,
            content: Content::Token(token),
        })
    }

    /// Allocate a detached, childless span.
    pub fn new_span(&mut self, kind: NodeKind, bbox: BBox, style: Option<Style>) -> NodeId {
        self.push_node(Node {
            kind,
            class: kind.class_name().to_string(),
            bbox,
            style,
            parent: None,
            content: Content::Children(VecDeque::new()),
        })
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn children_of(&self, span: NodeId) -> Result<&VecDeque<NodeId>> {
        match &self.node(span).content {
            Content::Children(children) => Ok(children),
            Content::Token(_) => Err(Error::NotASpan(span)),
        }
    }

    fn children_mut(&mut self, span: NodeId) -> Result<&mut VecDeque<NodeId>> {
        match &mut self.nodes[span.0].content {
            Content::Children(children) => Ok(children),
            Content::Token(_) => Err(Error::NotASpan(span)),
        }
    }

    /// Ordered children of `span` (empty for words).
    pub fn children(&self, span: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(span).children()
    }

    /// Number of direct children.
    pub fn len(&self, span: NodeId) -> usize {
        self.children_of(span).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, span: NodeId) -> bool {
        self.len(span) == 0
    }

    /// Position of `child` among the children of `span`.
    pub fn index_of(&self, span: NodeId, child: NodeId) -> Option<usize> {
        self.children_of(span)
            .ok()?
            .iter()
            .position(|&c| c == child)
    }

    /// Last child, without removing it.
    pub fn peek(&self, span: NodeId) -> Option<NodeId> {
        self.children_of(span).ok()?.back().copied()
    }

    /// First child, without removing it.
    pub fn peekleft(&self, span: NodeId) -> Option<NodeId> {
        self.children_of(span).ok()?.front().copied()
    }

    /// Recompute the box of `span` from its first and last child.
    pub fn reset_bbox(&mut self, span: NodeId) {
        let bbox = match self.children_of(span) {
            Ok(children) => match (children.front(), children.back()) {
                (Some(&first), Some(&last)) => {
                    BBox::spanning(&self.nodes[first.0].bbox, &self.nodes[last.0].bbox)
                }
                _ => BBox::ZERO,
            },
            Err(_) => return,
        };
        self.nodes[span.0].bbox = bbox;
    }

    /// Check that `child` may be attached under `span`, then detach it from
    /// any current parent.
    fn prepare_attach(&mut self, span: NodeId, child: NodeId) -> Result<()> {
        self.children_of(span)?;

        let mut cursor = Some(span);
        while let Some(id) = cursor {
            if id == child {
                return Err(Error::InvalidStructure(format!(
                    "{} cannot be attached under its own descendant {}",
                    child, span
                )));
            }
            cursor = self.parent(id);
        }

        if let Some(old_parent) = self.parent(child) {
            self.remove(old_parent, child)?;
        }
        Ok(())
    }

    /// Add `child` as the last child of `span`.
    pub fn append(&mut self, span: NodeId, child: NodeId) -> Result<()> {
        self.prepare_attach(span, child)?;
        self.children_mut(span)?.push_back(child);
        self.nodes[child.0].parent = Some(span);
        self.reset_bbox(span);
        Ok(())
    }

    /// Add `child` as the first child of `span`.
    pub fn prepend(&mut self, span: NodeId, child: NodeId) -> Result<()> {
        self.prepare_attach(span, child)?;
        self.children_mut(span)?.push_front(child);
        self.nodes[child.0].parent = Some(span);
        self.reset_bbox(span);
        Ok(())
    }

    /// Insert `child` before position `index` of `span`.
    pub fn insert(&mut self, span: NodeId, index: usize, child: NodeId) -> Result<()> {
        let len = self.children_of(span)?.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        // a sibling moving right shifts the later children left once detached
        let index = match self.index_of(span, child) {
            Some(old) if old < index => index - 1,
            _ => index,
        };
        self.prepare_attach(span, child)?;
        self.children_mut(span)?.insert(index, child);
        self.nodes[child.0].parent = Some(span);
        self.reset_bbox(span);
        Ok(())
    }

    /// Detach and return the last child, or `None` when `span` has none.
    pub fn pop(&mut self, span: NodeId) -> Option<NodeId> {
        let child = self.children_mut(span).ok()?.pop_back()?;
        self.nodes[child.0].parent = None;
        self.reset_bbox(span);
        Some(child)
    }

    /// Detach and return the first child, or `None` when `span` has none.
    pub fn popleft(&mut self, span: NodeId) -> Option<NodeId> {
        let child = self.children_mut(span).ok()?.pop_front()?;
        self.nodes[child.0].parent = None;
        self.reset_bbox(span);
        Some(child)
    }

    /// Detach `child` from `span`.
    pub fn remove(&mut self, span: NodeId, child: NodeId) -> Result<()> {
        let index = self
            .index_of(span, child)
            .ok_or(Error::NotAChild {
                parent: span,
                child,
            })?;
        self.children_mut(span)?.remove(index);
        self.nodes[child.0].parent = None;
        self.reset_bbox(span);
        Ok(())
    }

    /// Put `new` in the position `old` occupies in `span`, detaching `old`.
    pub fn replace(&mut self, span: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return self
                .index_of(span, old)
                .map(|_| ())
                .ok_or(Error::NotAChild {
                    parent: span,
                    child: old,
                });
        }

        self.index_of(span, old).ok_or(Error::NotAChild {
            parent: span,
            child: old,
        })?;
        self.prepare_attach(span, new)?;

        // `new` may have been a sibling, so look `old` up again
        let index = self.index_of(span, old).ok_or(Error::NotAChild {
            parent: span,
            child: old,
        })?;
        self.children_mut(span)?[index] = new;
        self.nodes[old.0].parent = None;
        self.nodes[new.0].parent = Some(span);
        self.reset_bbox(span);
        Ok(())
    }

    /// Detach every child of `span`.
    pub fn clear(&mut self, span: NodeId) {
        let Ok(children) = self.children_mut(span) else {
            return;
        };
        let detached: Vec<NodeId> = children.drain(..).collect();
        for child in detached {
            self.nodes[child.0].parent = None;
        }
        self.reset_bbox(span);
    }

    /// All word nodes under `id`, in reading order. A word yields itself.
    pub fn tokens(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_tokens(id, &mut out);
        out
    }

    fn collect_tokens(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match &self.node(id).content {
            Content::Token(_) => out.push(id),
            Content::Children(children) => {
                for &child in children {
                    self.collect_tokens(child, out);
                }
            }
        }
    }

    /// Tokens under `id` that are not single punctuation characters.
    pub fn words(&self, id: NodeId) -> Vec<NodeId> {
        self.tokens(id)
            .into_iter()
            .filter(|&t| !self.token(t).is_some_and(Token::is_punct))
            .collect()
    }

    /// Line nodes under `id`; a line yields itself and is not descended into.
    pub fn lines(&self, id: NodeId) -> Vec<NodeId> {
        self.collect_kind(id, NodeKind::Line)
    }

    /// Block nodes under `id`; a block yields itself and is not descended into.
    pub fn blocks(&self, id: NodeId) -> Vec<NodeId> {
        self.collect_kind(id, NodeKind::Block)
    }

    /// Paragraph nodes under `id`.
    pub fn paragraphs(&self, id: NodeId) -> Vec<NodeId> {
        self.collect_kind(id, NodeKind::Paragraph)
    }

    fn collect_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.kind(current) == kind {
                out.push(current);
                continue;
            }
            let children: Vec<NodeId> = self.children(current).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Nearest block ancestor.
    pub fn parent_block(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            if self.kind(current) == NodeKind::Block {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Text of every token under `id`, each followed by its trailing whitespace.
    pub fn text(&self, id: NodeId) -> String {
        self.tokens(id)
            .into_iter()
            .filter_map(|t| self.token(t))
            .map(Token::text_with_ws)
            .collect()
    }

    /// Whether a word node passes the primary-script test.
    pub fn is_primary(&self, id: NodeId, threshold: f64) -> bool {
        self.token(id)
            .is_some_and(|t| t.is_primary_script(threshold))
    }

    /// Whether a word node is single punctuation.
    pub fn is_punct(&self, id: NodeId) -> bool {
        self.token(id).is_some_and(Token::is_punct)
    }

    /// Percentage (0-100) of the words under `id` that are primary-script.
    pub fn percent_primary(&self, id: NodeId, threshold: f64) -> u32 {
        primary_percent(
            self.words(id)
                .into_iter()
                .map(|w| self.is_primary(w, threshold)),
        )
    }
}
