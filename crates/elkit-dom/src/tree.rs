//! DOM Tree (arena-based allocation)
//!
//! Every node of a document lives in one `Vec<Node>`; links are `NodeId`
//! indices. Removed nodes stay in the arena, unlinked, until the tree is
//! dropped.

use crate::{
    DomError, DomResult, ElementData, HTML_NAMESPACE, InternedString, Node, NodeData, NodeId,
    QualName, StringInterner, TextData,
};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only its document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Intern a name in this tree
    #[inline]
    pub fn intern(&mut self, s: &str) -> InternedString {
        self.interner.intern(s)
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    pub(crate) fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Callers validate `id` first
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    // --- Node creation (no name validation, see `Document`) ---

    /// Create a detached HTML element
    pub fn create_element(&mut self, local: &str) -> NodeId {
        self.create_element_ns(HTML_NAMESPACE, local)
    }

    /// Create a detached element in `ns`
    pub fn create_element_ns(&mut self, ns: &str, local: &str) -> NodeId {
        let name = QualName::new(self.intern(ns), self.intern(local));
        self.push(NodeData::Element(ElementData::new(name)))
    }

    /// Create an HTML element as the last child of `parent`. A new element
    /// never breaks the hierarchy, so it is only left detached when `parent`
    /// is unknown or cannot have children.
    pub fn append_new_element(&mut self, parent: NodeId, local: &str) -> NodeId {
        let id = self.create_element(local);
        if self.get(parent).is_some_and(Node::can_have_children) {
            self.link(parent, id, None);
        }
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::DocumentFragment)
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    // --- Navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.get()
    }

    /// Parent if it is an element (not a document, fragment or shadow root)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.get(parent)?.is_element().then_some(parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.get()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child.get()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling.get()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling.get()
    }

    /// Iterate over child nodes
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Child IDs, collected so the tree can be mutated while walking them
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Iterate over child elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    /// Preorder walk below `root` (exclusive). Shadow trees and template
    /// contents are separate trees and are not entered.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.get(root).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Topmost inclusive ancestor (`getRootNode()`)
    pub fn root_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // --- Mutation ---

    /// Append `child` to `parent`; a fragment moves its children instead
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_insertable(parent, child, reference)?;

        let mut reference = reference;
        if reference == Some(child) {
            reference = self.next_sibling(child);
        }

        if matches!(self.nodes[child.index()].data, NodeData::DocumentFragment) {
            for node in self.child_ids(child) {
                self.detach(node);
                self.link(parent, node, reference);
            }
        } else {
            self.detach(child);
            self.link(parent, child, reference);
        }

        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(child).ok_or(DomError::NotFound)?.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent (`node.remove()`); no-op when detached
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else {
            self.node_mut(parent).last_child = prev;
        }

        let node = self.node_mut(id);
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    fn ensure_insertable(
        &self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound)?;
        let child_node = self.get(child).ok_or(DomError::NotFound)?;

        if !parent_node.can_have_children() {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(
            child_node.data,
            NodeData::Document | NodeData::ShadowRoot(_)
        ) {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(parent_node.data, NodeData::Document) && child_node.is_text() {
            return Err(DomError::HierarchyRequest);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotFound);
            }
        }
        Ok(())
    }

    /// Link a detached node under `parent` before `reference`
    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(reference) => self.nodes[reference.index()].prev_sibling,
            None => self.nodes[parent.index()].last_child,
        };
        let next = reference.unwrap_or(NodeId::NONE);

        let node = self.node_mut(child);
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;

        if prev.is_valid() {
            self.node_mut(prev).next_sibling = child;
        } else {
            self.node_mut(parent).first_child = child;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = child;
        } else {
            self.node_mut(parent).last_child = child;
        }
    }

    // --- Element accessors ---

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| self.resolve(e.name.local))
    }

    /// Namespace URL, `None` for non-elements and null-namespace elements
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        let ns = self.resolve(self.element(id)?.name.ns);
        (!ns.is_empty()).then_some(ns)
    }

    /// Whether the node is an element in the HTML namespace
    pub fn is_html_element(&self, id: NodeId) -> bool {
        self.namespace_uri(id) == Some(HTML_NAMESPACE)
    }

    /// Whether the node is an HTML element with the given local name
    pub fn is_html_element_named(&self, id: NodeId, local: &str) -> bool {
        self.is_html_element(id) && self.local_name(id) == Some(local)
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.id.map(|value| self.resolve(value))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        let Some(class) = self.interner.lookup(class) else {
            return false;
        };
        self.element(id).is_some_and(|e| e.classes.contains(&class))
    }

    /// Customized built-in `is` value
    pub fn is_value(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.is_value.as_deref()
    }

    // --- Attributes ---

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.element(id)?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set a null-namespace attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.set_attribute_ns(id, "", name, value)
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attribute_ns(
        &mut self,
        id: NodeId,
        ns: &str,
        local: &str,
        value: &str,
    ) -> DomResult<()> {
        if !is_valid_attribute_name(local) {
            return Err(DomError::InvalidCharacter(local.to_string()));
        }
        if !self.get(id).ok_or(DomError::NotFound)?.is_element() {
            return Err(DomError::InvalidNodeType);
        }

        let name = QualName::new(self.intern(ns), self.intern(local));
        let plain = ns.is_empty();
        let cached_id = (plain && local == "id").then(|| self.intern(value));
        let cached_classes: Option<Vec<_>> = (plain && local == "class")
            .then(|| value.split_ascii_whitespace().map(|c| self.intern(c)).collect());

        let Some(elem) = self.node_mut(id).as_element_mut() else {
            return Err(DomError::InvalidNodeType);
        };
        elem.set_attr(name, value.to_string());
        if cached_id.is_some() {
            elem.id = cached_id;
        }
        if let Some(classes) = cached_classes {
            elem.classes = classes;
        }
        Ok(())
    }

    /// Remove an attribute by local name; returns whether it existed
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(local) = self.interner.lookup(name) else {
            return false;
        };
        let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) else {
            return false;
        };
        let before = elem.attrs.len();
        elem.attrs.retain(|a| a.name.local != local);
        if name == "id" {
            elem.id = None;
        } else if name == "class" {
            elem.classes.clear();
        }
        elem.attrs.len() != before
    }

    // --- Content ---

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.data {
            NodeData::Text(text) => text.content.clone(),
            NodeData::Comment(content) => content.clone(),
            NodeData::Document | NodeData::Doctype { .. } => String::new(),
            _ => self
                .descendants(id)
                .filter_map(|d| self.get(d).and_then(Node::as_text))
                .collect(),
        }
    }

    /// Contents fragment of a `<template>`, created on first use
    pub fn template_contents(&mut self, template: NodeId) -> DomResult<NodeId> {
        if !self.is_html_element_named(template, "template") {
            return Err(DomError::InvalidNodeType);
        }
        let existing = self.element(template).map_or(NodeId::NONE, |e| e.template_contents);
        if existing.is_valid() {
            return Ok(existing);
        }
        let fragment = self.create_fragment();
        if let Some(elem) = self.node_mut(template).as_element_mut() {
            elem.template_contents = fragment;
        }
        Ok(fragment)
    }

    // --- Cloning ---

    /// `cloneNode(deep)` within this tree. Shadow roots and layout boxes are
    /// not copied; template contents are copied when `deep`.
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let copy = self.clone_shallow(node, deep)?;
        if deep {
            let mut stack = vec![(node, copy)];
            while let Some((original, clone)) = stack.pop() {
                for child in self.child_ids(original) {
                    let child_copy = self.clone_shallow(child, true)?;
                    self.link(clone, child_copy, None);
                    stack.push((child, child_copy));
                }
            }
        }
        Ok(copy)
    }

    fn clone_shallow(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = self.get(node).ok_or(DomError::NotFound)?.data.clone();
        match data {
            NodeData::Document | NodeData::ShadowRoot(_) => Err(DomError::NotSupported),
            NodeData::Element(mut elem) => {
                let contents = std::mem::replace(&mut elem.template_contents, NodeId::NONE);
                elem.shadow_root = NodeId::NONE;
                elem.client_rect = None;
                let copy = self.push(NodeData::Element(elem));
                if deep && contents.is_valid() {
                    let contents_copy = self.clone_node(contents, true)?;
                    if let Some(elem) = self.node_mut(copy).as_element_mut() {
                        elem.template_contents = contents_copy;
                    }
                }
                Ok(copy)
            }
            other => Ok(self.push(other)),
        }
    }

    /// `importNode(deep)`: copy a node of `source` into this tree, re-interning
    /// names. The copy is detached and shares nothing with `source`.
    pub fn import_node(&mut self, source: &DomTree, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let copy = self.import_shallow(source, node, deep)?;
        if deep {
            let mut stack = vec![(node, copy)];
            while let Some((original, clone)) = stack.pop() {
                for (child, _) in source.children(original) {
                    let child_copy = self.import_shallow(source, child, true)?;
                    self.link(clone, child_copy, None);
                    stack.push((child, child_copy));
                }
            }
        }
        Ok(copy)
    }

    fn import_shallow(&mut self, source: &DomTree, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let src = source.get(node).ok_or(DomError::NotFound)?;
        let elem = match &src.data {
            NodeData::Document | NodeData::ShadowRoot(_) => return Err(DomError::NotSupported),
            NodeData::Element(elem) => elem,
            other => return Ok(self.push(other.clone())),
        };

        let mut copy = ElementData::new(self.import_name(source, elem.name));
        for attr in &elem.attrs {
            let name = self.import_name(source, attr.name);
            copy.set_attr(name, attr.value.clone());
        }
        copy.id = elem.id.map(|id| self.intern(source.resolve(id)));
        copy.classes = elem
            .classes
            .iter()
            .map(|&class| self.intern(source.resolve(class)))
            .collect();
        copy.is_value = elem.is_value.clone();
        copy.custom_state = elem.custom_state;

        let contents = elem.template_contents;
        let id = self.push(NodeData::Element(copy));
        if deep && contents.is_valid() {
            let contents_copy = self.import_node(source, contents, true)?;
            if let Some(elem) = self.node_mut(id).as_element_mut() {
                elem.template_contents = contents_copy;
            }
        }
        Ok(id)
    }

    fn import_name(&mut self, source: &DomTree, name: QualName) -> QualName {
        QualName::new(
            self.intern(source.resolve(name.ns)),
            self.intern(source.resolve(name.local)),
        )
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute names: non-empty, no whitespace, NUL, `/`, `>`, `=`, quotes
pub(crate) fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_ascii_whitespace() || matches!(c, '\0' | '/' | '>' | '=' | '"' | '\'')
        })
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.get()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Preorder iterator below a root node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.get()?;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the root
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() {
                    break NodeId::NONE;
                }
            }
        };

        Some(current)
    }
}
