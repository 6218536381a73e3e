//! elkit DOM - Document Object Model
//!
//! Arena-allocated DOM tree with shadow roots, slots, selector matching
//! and point hit-testing.

mod custom_elements;
mod document;
mod escape;
mod geometry;
mod interner;
mod node;
mod operations;
mod selector;
mod shadow;
mod tree;

pub use custom_elements::{
    CustomElementDefinition, CustomElementError, CustomElementRegistry, CustomElementState,
};
pub use document::Document;
pub use escape::css_escape;
pub use geometry::DOMRect;
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, NodeType, QualName, TextData};
pub use operations::{DomError, DomResult};
pub use selector::{SelectorError, SelectorList};
pub use shadow::{
    ComponentShadowRoots, OpenShadowRoots, ShadowLookup, ShadowRootData, ShadowRootInit,
    ShadowRootMode,
};
pub use tree::{Children, Descendants, DomTree};

/// HTML namespace
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
/// SVG namespace
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// MathML namespace
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
/// XLink namespace (attributes only)
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
/// XML namespace (attributes only)
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// XMLNS namespace (attributes only)
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the tree's document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// `Some(self)` unless this is the sentinel
    #[inline]
    pub fn get(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
