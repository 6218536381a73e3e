//! HTML Serialization (innerHTML/outerHTML)
//!
//! Follows the HTML fragment serialization algorithm:
//! - void elements get no end tag
//! - raw text elements (`script`, `style`, ...) keep their text unescaped
//! - `<template>` serializes its contents fragment
//! - namespaced attributes get their `xml:`, `xmlns:` or `xlink:` prefix

use elkit_dom::{
    DomTree, HTML_NAMESPACE, NodeData, NodeId, ShadowRootMode, XLINK_NAMESPACE, XML_NAMESPACE,
    XMLNS_NAMESPACE,
};

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer {
    /// Emit open shadow roots as `<template shadowrootmode="open">` so the
    /// output parses back into the same shadow tree
    pub serialize_shadow_roots: bool,
}

/// Void elements (no end tag, no children)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer that also writes open shadow roots
    pub fn with_shadow_roots() -> Self {
        Self {
            serialize_shadow_roots: true,
        }
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot(_) => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name.local);
                let is_html = tree.resolve(elem.name.ns) == HTML_NAMESPACE;

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    push_attribute_name(tree.resolve(attr.name.ns), tree.resolve(attr.name.local), output);
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if is_html && VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                if self.serialize_shadow_roots {
                    self.serialize_shadow_root(tree, elem.shadow_root, output);
                }
                if is_html && tag == "template" && elem.template_contents.is_valid() {
                    self.serialize_children(tree, elem.template_contents, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                let raw = tree
                    .parent(node_id)
                    .filter(|&parent| tree.is_html_element(parent))
                    .and_then(|parent| tree.local_name(parent))
                    .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
                if raw {
                    output.push_str(&text.content);
                } else {
                    escape_text(&text.content, output);
                }
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_shadow_root(&self, tree: &DomTree, root: NodeId, output: &mut String) {
        let Some(data) = tree.get(root).and_then(|n| n.as_shadow_root()) else {
            return;
        };
        if data.mode != ShadowRootMode::Open {
            return;
        }
        output.push_str("<template shadowrootmode=\"open\">");
        self.serialize_children(tree, root, output);
        output.push_str("</template>");
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }
}

fn push_attribute_name(ns: &str, local: &str, output: &mut String) {
    match ns {
        XML_NAMESPACE => output.push_str("xml:"),
        XMLNS_NAMESPACE if local != "xmlns" => output.push_str("xmlns:"),
        XLINK_NAMESPACE => output.push_str("xlink:"),
        _ => {}
    }
    output.push_str(local);
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{A0}' => output.push_str("&nbsp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{A0}' => output.push_str("&nbsp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
