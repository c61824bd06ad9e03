//! Logical tree node.
//!
//! Sibling/child links are `NodeId` fields so the logical tree can diverge
//! from the visual tree, which lives in [`crate::VisualTree`].

use crate::NodeId;

/// Tag name of the selector-driven insertion point.
pub(crate) const CONTENT_TAG: &str = "content";
/// Tag name of the older-tree insertion point.
pub(crate) const SHADOW_TAG: &str = "shadow";

/// A node in the logical tree.
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Insertion point this node is currently distributed into, if any.
    /// A back-reference only; the assignment itself lives on the document.
    pub insertion_parent: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            insertion_parent: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeData::Text(TextData {
            content: content.into(),
        }))
    }

    /// Create a comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::new(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::new(NodeData::Document)
    }

    /// Create a window node
    pub fn window() -> Self {
        Self::new(NodeData::Window)
    }

    /// Create a shadow root attached to `host`
    pub fn shadow_root(host: NodeId, older: NodeId) -> Self {
        Self::new(NodeData::ShadowRoot(ShadowRootData { host, older }))
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// The document's default view; terminates every event path
    Window,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
    /// Root of a shadow tree; never a child of another node
    ShadowRoot(ShadowRootData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag: String,
    /// Attributes in document order
    pub attrs: Vec<(String, String)>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
    /// Current shadow root, NONE if this element is not a host
    pub shadow_root: NodeId,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            shadow_root: NodeId::NONE,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
        self.sync_cache(name);
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| n != name);
        let removed = self.attrs.len() < before;
        if removed {
            self.sync_cache(name);
        }
        removed
    }

    /// True for `<content>` and `<shadow>` elements
    pub fn is_insertion_point(&self) -> bool {
        self.tag == CONTENT_TAG || self.tag == SHADOW_TAG
    }

    fn sync_cache(&mut self, name: &str) {
        match name {
            "id" => self.id = self.get_attr("id").map(str::to_string),
            "class" => {
                self.classes = self
                    .get_attr("class")
                    .map(|v| v.split_ascii_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
            }
            _ => {}
        }
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Shadow root data: host back-reference plus the older-tree chain link
#[derive(Debug)]
pub struct ShadowRootData {
    /// The element this root is (or was) attached to
    pub host: NodeId,
    /// Previously attached root of the same host, NONE at the end of the chain
    pub older: NodeId,
}
