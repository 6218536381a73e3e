//! DOM Node - Compact representation
//!
//! Nodes link to each other through `NodeId` indices instead of pointers,
//! and names are interned, so a `Node` stays small and trivially movable.

use crate::{CustomElementState, DOMRect, InternedString, NodeId, ShadowRootData};

/// Namespaced name (namespace URL + local name), both interned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualName {
    pub ns: InternedString,
    pub local: InternedString,
}

impl QualName {
    pub fn new(ns: InternedString, local: InternedString) -> Self {
        Self { ns, local }
    }
}

/// DOM node types, numbered like `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    /// Fragments and shadow roots
    DocumentFragment = 11,
}

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create an unlinked node
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Node type
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::DocumentFragment | NodeData::ShadowRoot(_) => NodeType::DocumentFragment,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Whether nodes can be appended to this one
    #[inline]
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document
                | NodeData::DocumentFragment
                | NodeData::ShadowRoot(_)
                | NodeData::Element(_)
        )
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

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(root) => Some(root),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Parentless list of siblings
    DocumentFragment,
    /// Root of an encapsulated tree attached to a host element
    ShadowRoot(ShadowRootData),
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (qualified)
    pub name: QualName,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<InternedString>,
    /// Cached class list
    pub classes: Vec<InternedString>,
    /// Customized built-in `is` value
    pub is_value: Option<String>,
    /// Custom element state at creation
    pub custom_state: CustomElementState,
    /// Attached shadow root, if any
    pub shadow_root: NodeId,
    /// Content fragment of a `<template>`
    pub template_contents: NodeId,
    /// Border box in viewport coordinates, as reported by layout
    pub client_rect: Option<DOMRect>,
}

impl ElementData {
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            is_value: None,
            custom_state: CustomElementState::Uncustomized,
            shadow_root: NodeId::NONE,
            template_contents: NodeId::NONE,
            client_rect: None,
        }
    }

    /// Get an attribute value by local name
    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name
    pub fn set_attr(&mut self, name: QualName, value: String) {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}
