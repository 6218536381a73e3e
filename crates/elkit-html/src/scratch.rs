//! Template scratch container
//!
//! An inert document holding one `<template>` whose contents receive parsed
//! markup. Each `set_inner_html` starts from a fresh document, so the
//! content only ever reflects the latest call and the arena does not grow
//! across reuse.

use elkit_dom::{Document, DomResult, DomTree, Node, NodeId};

use crate::HtmlParser;

#[derive(Debug, Clone)]
pub struct TemplateScratch {
    document: Document,
    template: NodeId,
    content: NodeId,
}

impl TemplateScratch {
    pub fn new() -> Self {
        let mut document = Document::empty("about:blank");
        let tree = document.tree_mut();
        let root = tree.root();
        let template = tree.append_new_element(root, "template");
        let content = tree.create_fragment();
        if let Some(elem) = tree.get_mut(template).and_then(Node::as_element_mut) {
            elem.template_contents = content;
        }

        Self {
            document,
            template,
            content,
        }
    }

    /// `template.innerHTML = html`; returns the content fragment
    pub fn set_inner_html(&mut self, html: &str) -> DomResult<NodeId> {
        *self = Self::new();
        HtmlParser::new().parse_template_contents(html, self.document.tree_mut(), self.content)?;
        Ok(self.content)
    }

    /// The template's content fragment
    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn template(&self) -> NodeId {
        self.template
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Default for TemplateScratch {
    fn default() -> Self {
        Self::new()
    }
}
