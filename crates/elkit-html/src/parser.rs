//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena tree.

use elkit_dom::{
    CustomElementRegistry, Document, DomError, DomResult, DomTree, HTML_NAMESPACE, Node, NodeData,
    NodeId, QualName, ShadowRootInit,
};
use html5ever::tendril::TendrilSink;
use html5ever::{
    Attribute as RcAttribute, QualName as RcQualName, local_name, ns, parse_document,
    parse_fragment,
};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL.
    ///
    /// `<template shadowrootmode="open|closed">` becomes a shadow root of
    /// its parent element; closed roots stay reachable through the host's
    /// retained reference.
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_rcdom(html);
        let mut document = Document::empty(url);
        let registry = document.custom_elements().clone();
        let root = document.tree().root();
        Converter {
            tree: document.tree_mut(),
            registry: &registry,
            declarative_shadow_roots: true,
        }
        .convert_children(&dom.document, root);

        document.finalize();
        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `html` as the contents of a `<template>` and append the result
    /// to `fragment`.
    ///
    /// Runs the fragment parsing algorithm with a `template` context, as
    /// setting `innerHTML` on a template does. A stray `</template>` is
    /// ignored like any other unmatched end tag.
    pub fn parse_template_contents(
        &self,
        html: &str,
        tree: &mut DomTree,
        fragment: NodeId,
    ) -> DomResult<()> {
        let target = tree.get(fragment).ok_or(DomError::NotFound)?;
        if !matches!(target.data, NodeData::DocumentFragment) {
            return Err(DomError::InvalidNodeType);
        }

        tracing::debug!("Parsing {} bytes of template contents", html.len());
        let context = RcQualName::new(None, ns!(html), local_name!("template"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .one(html);
        // The fragment parser puts everything under a single <html> root
        let Some(contents) = dom.document.children.borrow().first().cloned() else {
            return Ok(());
        };

        let registry = CustomElementRegistry::new();
        Converter {
            tree,
            registry: &registry,
            declarative_shadow_roots: false,
        }
        .convert_children(&contents, fragment);
        Ok(())
    }
}

fn parse_rcdom(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Copies an RcDom subtree into the arena
struct Converter<'a> {
    tree: &'a mut DomTree,
    registry: &'a CustomElementRegistry,
    declarative_shadow_roots: bool,
}

impl Converter<'_> {
    /// Convert the children of `source` under `parent`, in order
    fn convert_children(&mut self, source: &Handle, parent: NodeId) {
        let mut stack: Vec<(Handle, NodeId)> = source
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), parent))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            if let Some((children_of, target)) = self.convert_node(&handle, parent) {
                let children = children_of.children.borrow();
                stack.extend(children.iter().rev().map(|child| (child.clone(), target)));
            }
        }
    }

    /// Convert one node. Returns the RcDom node whose children still need
    /// converting and the arena node they go under.
    fn convert_node(&mut self, handle: &Handle, parent: NodeId) -> Option<(Handle, NodeId)> {
        match &handle.data {
            RcNodeData::Document => Some((handle.clone(), parent)),
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                let id = self.tree.create_doctype(name, public_id, system_id);
                self.append(parent, id);
                None
            }
            RcNodeData::Text { contents } => {
                let id = self.tree.create_text(&contents.borrow());
                self.append(parent, id);
                None
            }
            RcNodeData::Comment { contents } => {
                let id = self.tree.create_comment(contents);
                self.append(parent, id);
                None
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let attrs = attrs.borrow();
                let contents = template_contents.borrow().clone();

                if let Some(contents) = &contents {
                    if self.declarative_shadow_roots {
                        if let Some(root) = self.attach_declarative_shadow(parent, &attrs) {
                            return Some((contents.clone(), root));
                        }
                    }
                }

                let id = self.create_element(name, &attrs);
                self.append(parent, id);
                match contents {
                    Some(contents) => {
                        let fragment = self.tree.template_contents(id).ok()?;
                        Some((contents, fragment))
                    }
                    None => Some((handle.clone(), id)),
                }
            }
            RcNodeData::ProcessingInstruction { .. } => None,
        }
    }

    fn create_element(&mut self, name: &RcQualName, attrs: &[RcAttribute]) -> NodeId {
        let id = self.tree.create_element_ns(&name.ns, &name.local);
        let is_html = &*name.ns == HTML_NAMESPACE;

        let mut converted = Vec::with_capacity(attrs.len());
        let mut id_value = None;
        let mut classes = Vec::new();
        let mut is_value = None;
        for attr in attrs {
            let qname = QualName::new(
                self.tree.intern(&attr.name.ns),
                self.tree.intern(&attr.name.local),
            );
            if attr.name.ns.is_empty() {
                match &*attr.name.local {
                    "id" => id_value = Some(self.tree.intern(&attr.value)),
                    "class" => {
                        classes = attr
                            .value
                            .split_ascii_whitespace()
                            .map(|class| self.tree.intern(class))
                            .collect();
                    }
                    "is" if is_html => is_value = Some(attr.value.to_string()),
                    _ => {}
                }
            }
            converted.push((qname, attr.value.to_string()));
        }

        let custom_state = if is_html {
            self.registry.state_for(&name.local, is_value.as_deref())
        } else {
            Default::default()
        };

        if let Some(elem) = self.tree.get_mut(id).and_then(Node::as_element_mut) {
            for (qname, value) in converted {
                elem.set_attr(qname, value);
            }
            elem.id = id_value;
            elem.classes = classes;
            elem.is_value = is_value;
            elem.custom_state = custom_state;
        }
        id
    }

    fn attach_declarative_shadow(&mut self, host: NodeId, attrs: &[RcAttribute]) -> Option<NodeId> {
        let mode = attrs
            .iter()
            .find(|attr| attr.name.ns.is_empty() && &*attr.name.local == "shadowrootmode")?;
        let init = if mode.value.eq_ignore_ascii_case("open") {
            ShadowRootInit::open()
        } else if mode.value.eq_ignore_ascii_case("closed") {
            ShadowRootInit::closed_retained()
        } else {
            return None;
        };

        match self.tree.attach_shadow(host, init) {
            Ok(root) => Some(root),
            Err(err) => {
                tracing::debug!("Declarative shadow root on {:?} kept as template: {}", host, err);
                None
            }
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Err(err) = self.tree.append_child(parent, child) {
            tracing::debug!("Dropping parsed node {:?} under {:?}: {}", child, parent, err);
        }
    }
}
