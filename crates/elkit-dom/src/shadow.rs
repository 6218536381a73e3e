//! Shadow DOM
//!
//! Shadow roots, slot assignment, and the adapter used to reach a host's
//! shadow root.
//!
//! A shadow root is a `NodeData::ShadowRoot` node with no parent; its host
//! points at it through `ElementData::shadow_root` and it points back
//! through `ShadowRootData::host`. Tree walks (`descendants`, selector
//! matching, `root_node`) therefore stop at the boundary on their own.

use crate::custom_elements::is_valid_custom_element_name;
use crate::{DomError, DomResult, DomTree, HTML_NAMESPACE, NodeData, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    /// The host component keeps its own handle to the root. For closed
    /// roots this is the only way to reach them from the host.
    pub retain_reference: bool,
}

impl ShadowRootInit {
    pub fn open() -> Self {
        Self::default()
    }

    /// Closed root whose host component keeps a reference
    pub fn closed_retained() -> Self {
        Self {
            mode: ShadowRootMode::Closed,
            retain_reference: true,
        }
    }
}

/// Shadow root node data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    pub mode: ShadowRootMode,
    /// Whether the host component retained a reference
    pub retained: bool,
}

/// HTML elements allowed to host a shadow root besides custom elements
const SHADOW_HOST_NAMES: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "main", "nav", "p", "section", "span",
];

impl DomTree {
    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> DomResult<NodeId> {
        let elem = self
            .get(host)
            .ok_or(DomError::NotFound)?
            .as_element()
            .ok_or(DomError::InvalidNodeType)?;

        let local = self.resolve(elem.name.local);
        let attachable = self.resolve(elem.name.ns) == HTML_NAMESPACE
            && (SHADOW_HOST_NAMES.contains(&local) || is_valid_custom_element_name(local));
        if !attachable || elem.shadow_root.is_valid() {
            return Err(DomError::NotSupported);
        }

        let root = self.push(NodeData::ShadowRoot(ShadowRootData {
            host,
            mode: init.mode,
            retained: init.retain_reference,
        }));
        if let Some(elem) = self.get_mut(host).and_then(|n| n.as_element_mut()) {
            elem.shadow_root = root;
        }

        tracing::trace!("Attached {:?} shadow root {:?} to {:?}", init.mode, root, host);
        Ok(root)
    }

    /// `element.shadowRoot`: open roots only
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let (root, data) = self.attached_root(host)?;
        (data.mode == ShadowRootMode::Open).then_some(root)
    }

    /// Root the host component retained at attach time, whatever its mode
    pub fn retained_shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let (root, data) = self.attached_root(host)?;
        data.retained.then_some(root)
    }

    fn attached_root(&self, host: NodeId) -> Option<(NodeId, &ShadowRootData)> {
        let root = self.element(host)?.shadow_root.get()?;
        Some((root, self.get(root)?.as_shadow_root()?))
    }

    pub fn is_shadow_root(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.as_shadow_root().is_some())
    }

    /// `ShadowRoot.host`; `None` unless `root` is a shadow root
    pub fn host_of(&self, root: NodeId) -> Option<NodeId> {
        Some(self.get(root)?.as_shadow_root()?.host)
    }

    /// Slot name (`name` attribute, empty for the default slot)
    pub fn slot_name(&self, slot: NodeId) -> &str {
        self.get_attribute(slot, "name").unwrap_or("")
    }

    /// Light children of the host assigned to `slot`, in tree order.
    ///
    /// Elements go to the slot named by their `slot` attribute, text nodes
    /// to the default slot. Only the first slot with a given name in the
    /// shadow tree receives nodes.
    pub fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        if !self.is_html_element_named(slot, "slot") {
            return Vec::new();
        }
        let root = self.root_node(slot);
        let Some(host) = self.host_of(root) else {
            return Vec::new();
        };

        let name = self.slot_name(slot);
        let first_slot = self
            .descendants(root)
            .find(|&node| self.is_html_element_named(node, "slot") && self.slot_name(node) == name);
        if first_slot != Some(slot) {
            return Vec::new();
        }

        self.children(host)
            .filter(|(child, node)| match &node.data {
                NodeData::Element(_) => self.get_attribute(*child, "slot").unwrap_or("") == name,
                NodeData::Text(_) => name.is_empty(),
                _ => false,
            })
            .map(|(child, _)| child)
            .collect()
    }
}

/// How a host's shadow root is reached.
///
/// Hosts expose open roots through `shadowRoot`. Components that attach a
/// closed root keep their own reference instead; `ComponentShadowRoots`
/// accepts either, so callers need a single lookup.
pub trait ShadowLookup {
    fn shadow_root_of(&self, tree: &DomTree, host: NodeId) -> Option<NodeId>;
}

/// Standard `shadowRoot`: open roots only
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenShadowRoots;

impl ShadowLookup for OpenShadowRoots {
    fn shadow_root_of(&self, tree: &DomTree, host: NodeId) -> Option<NodeId> {
        tree.shadow_root(host)
    }
}

/// Open roots, falling back to a root retained by the host component
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentShadowRoots;

impl ShadowLookup for ComponentShadowRoots {
    fn shadow_root_of(&self, tree: &DomTree, host: NodeId) -> Option<NodeId> {
        tree.shadow_root(host)
            .or_else(|| tree.retained_shadow_root(host))
    }
}
