//! Document - High-level document API

use crate::{
    CustomElementRegistry, CustomElementState, DomError, DomResult, DomTree, HTML_NAMESPACE,
    NodeId, ShadowRootInit,
};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Custom element definitions used at element creation
    custom_elements: CustomElementRegistry,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an `<html><head><body>` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let root = tree.root();
        let html = tree.append_new_element(root, "html");
        let head = tree.append_new_element(html, "head");
        let body = tree.append_new_element(html, "body");

        Self {
            tree,
            url: url.to_string(),
            custom_elements: CustomElementRegistry::new(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            custom_elements: CustomElementRegistry::new(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Re-locate `<html>`, `<head>` and `<body>` after the tree was built
    /// by hand or by a parser
    pub fn finalize(&mut self) {
        self.html_element = self
            .tree
            .element_children(self.tree.root())
            .find(|&id| self.tree.is_html_element_named(id, "html"))
            .unwrap_or(NodeId::NONE);

        let child_named = |name: &str| {
            self.tree
                .element_children(self.html_element)
                .find(|&id| self.tree.is_html_element_named(id, name))
                .unwrap_or(NodeId::NONE)
        };
        let (head, body) = (child_named("head"), child_named("body"));
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.get()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.get()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.get()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.custom_elements
    }

    pub fn custom_elements_mut(&mut self) -> &mut CustomElementRegistry {
        &mut self.custom_elements
    }

    // --- Node creation ---

    /// `document.createElement(local)`: HTML namespace, name lowercased
    pub fn create_element(&mut self, local: &str) -> DomResult<NodeId> {
        self.create_html_element(local, None)
    }

    /// `document.createElement(local, { is })`
    pub fn create_element_with_is(&mut self, local: &str, is: &str) -> DomResult<NodeId> {
        self.create_html_element(local, Some(is))
    }

    fn create_html_element(&mut self, local: &str, is: Option<&str>) -> DomResult<NodeId> {
        validate_element_name(local)?;
        let local = local.to_ascii_lowercase();
        let state = self.custom_elements.state_for(&local, is);

        let id = self.tree.create_element(&local);
        if let Some(elem) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            elem.is_value = is.map(str::to_string);
            elem.custom_state = state;
        }
        Ok(id)
    }

    /// `document.createElementNS(ns, local)`: name kept as given
    pub fn create_element_ns(&mut self, ns: &str, local: &str) -> DomResult<NodeId> {
        validate_element_name(local)?;
        let state = if ns == HTML_NAMESPACE {
            self.custom_elements.state_for(local, None)
        } else {
            CustomElementState::Uncustomized
        };

        let id = self.tree.create_element_ns(ns, local);
        if let Some(elem) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            elem.custom_state = state;
        }
        Ok(id)
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.create_fragment()
    }

    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.tree.create_text(data)
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.tree.create_comment(data)
    }

    /// `document.importNode(node, deep)` from another tree
    pub fn import_node(&mut self, source: &DomTree, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.tree.import_node(source, node, deep)
    }

    // --- Queries ---

    /// Get element by ID (light tree, tree order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let target = self.tree.interner().lookup(id)?;
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).is_some_and(|e| e.id == Some(target)))
    }

    /// `document.elementFromPoint(x, y)`
    pub fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        self.tree.hit_test(self.tree.root(), x, y)
    }

    /// `element.attachShadow(init)`
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> DomResult<NodeId> {
        self.tree.attach_shadow(host, init)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// Element local names: first character a letter, `_` or non-ASCII; no
/// whitespace, NUL, `/` or `>` anywhere
fn validate_element_name(local: &str) -> DomResult<()> {
    let mut chars = local.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c >= '\u{80}');
    let valid_rest = chars.all(|c| !(c.is_ascii_whitespace() || matches!(c, '\0' | '/' | '>')));

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(local.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DOMRect;

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        let html = doc.document_element().unwrap();

        assert_eq!(doc.url(), "about:blank");
        assert_eq!(doc.tree.local_name(html), Some("html"));
        assert_eq!(doc.tree.parent(doc.head().unwrap()), Some(html));
        assert_eq!(doc.tree.parent(doc.body().unwrap()), Some(html));
        assert_eq!(doc.tree.child_ids(doc.tree.root()), vec![html]);
        assert_eq!(
            doc.tree.child_ids(html),
            vec![doc.head().unwrap(), doc.body().unwrap()]
        );
        assert!(Document::empty("about:blank").body().is_none());
    }

    #[test]
    fn test_finalize_finds_structure() {
        let mut doc = Document::empty("about:blank");
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let root = tree.root();
        tree.append_child(root, html).unwrap();
        tree.append_child(html, body).unwrap();

        doc.finalize();
        assert_eq!(doc.document_element(), Some(html));
        assert_eq!(doc.head(), None);
        assert_eq!(doc.body(), Some(body));
    }

    #[test]
    fn test_create_element_lowercases_and_validates() {
        let mut doc = Document::default();
        let div = doc.create_element("DIV").unwrap();
        assert_eq!(doc.tree.local_name(div), Some("div"));
        assert_eq!(doc.tree.namespace_uri(div), Some(HTML_NAMESPACE));

        for bad in ["", "1abc", "a b", "a/b", "a>b", "-x"] {
            assert_eq!(
                doc.create_element(bad),
                Err(DomError::InvalidCharacter(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_create_element_ns_keeps_case() {
        let mut doc = Document::default();
        let el = doc
            .create_element_ns(crate::SVG_NAMESPACE, "foreignObject")
            .unwrap();
        assert_eq!(doc.tree.local_name(el), Some("foreignObject"));
        assert_eq!(doc.tree.element(el).unwrap().custom_state, CustomElementState::Uncustomized);
    }

    #[test]
    fn test_customized_builtin_state() {
        let mut doc = Document::default();
        doc.custom_elements_mut()
            .define("fancy-button", Some("button"))
            .unwrap();

        let defined = doc.create_element_with_is("button", "fancy-button").unwrap();
        let undefined = doc.create_element_with_is("button", "plain-button").unwrap();
        let autonomous = doc.create_element("x-widget").unwrap();

        assert_eq!(doc.tree.is_value(defined), Some("fancy-button"));
        assert_eq!(doc.tree.element(defined).unwrap().custom_state, CustomElementState::Custom);
        assert_eq!(doc.tree.element(undefined).unwrap().custom_state, CustomElementState::Undefined);
        assert_eq!(doc.tree.element(autonomous).unwrap().custom_state, CustomElementState::Undefined);
    }

    #[test]
    fn test_get_element_by_id_and_point() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let el = doc.create_element("section").unwrap();
        doc.tree.set_attribute(el, "id", "main").unwrap();
        doc.tree.append_child(body, el).unwrap();
        doc.tree
            .set_client_rect(el, DOMRect::from_xywh(0.0, 0.0, 50.0, 50.0))
            .unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(el));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(doc.element_from_point(10.0, 10.0), Some(el));
        assert_eq!(doc.element_from_point(60.0, 10.0), None);
    }
}
