//! Markup-to-node parsing
//!
//! `html` and `svg` take template-style input: literal segments with
//! values spliced between them. The markup is parsed as `<template>`
//! contents in a scratch document and deep-imported into the caller's
//! document, so the returned nodes belong to the caller and share nothing
//! with the scratch.

use std::fmt;

use elkit_dom::{Document, DomError, DomTree, NodeId, SVG_NAMESPACE, SelectorList, css_escape};
use elkit_html::TemplateScratch;

/// Reserved id of the `<svg>` wrapper used by [`svg`]
pub const SVG_STUB_ID: &str = "x-stub";

/// Result of parsing markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedNode {
    /// The only element of the markup, detached
    Element(NodeId),
    /// A fragment holding every top-level node
    Fragment(NodeId),
}

impl ParsedNode {
    pub fn node(self) -> NodeId {
        match self {
            Self::Element(id) | Self::Fragment(id) => id,
        }
    }

    pub fn element(self) -> Option<NodeId> {
        match self {
            Self::Element(id) => Some(id),
            Self::Fragment(_) => None,
        }
    }

    pub fn fragment(self) -> Option<NodeId> {
        match self {
            Self::Fragment(id) => Some(id),
            Self::Element(_) => None,
        }
    }
}

/// Parse HTML markup with a fresh scratch container
pub fn html(doc: &mut Document, strings: &[&str], values: &[&dyn fmt::Display]) -> ParsedNode {
    html_with(doc, &mut TemplateScratch::new(), strings, values)
}

/// Parse HTML markup through a caller-owned scratch container.
///
/// Exactly one top-level element: that element is returned and any text
/// around it is dropped. Anything else: the whole fragment. Only the
/// returned nodes are imported into `doc`.
pub fn html_with(
    doc: &mut Document,
    scratch: &mut TemplateScratch,
    strings: &[&str],
    values: &[&dyn fmt::Display],
) -> ParsedNode {
    let markup = concat(strings, values);
    let content = match scratch.set_inner_html(&markup) {
        Ok(content) => content,
        Err(err) => return parse_failed(doc, err),
    };
    let source = scratch.tree();

    let imported = match only_element_child(source, content) {
        Some(element) => doc.import_node(source, element, true).map(ParsedNode::Element),
        None => doc.import_node(source, content, true).map(ParsedNode::Fragment),
    };
    imported.unwrap_or_else(|err| parse_failed(doc, err))
}

/// Parse SVG markup with a fresh scratch container
pub fn svg(doc: &mut Document, strings: &[&str], values: &[&dyn fmt::Display]) -> ParsedNode {
    svg_with(doc, &mut TemplateScratch::new(), strings, values)
}

/// Parse SVG markup through a caller-owned scratch container.
///
/// The markup is wrapped in `<svg id="x-stub">` so its elements land in
/// the SVG namespace. One element inside the wrapper is returned on its
/// own; otherwise the wrapper's children are copied into a new fragment.
/// The wrapper itself never reaches `doc`.
pub fn svg_with(
    doc: &mut Document,
    scratch: &mut TemplateScratch,
    strings: &[&str],
    values: &[&dyn fmt::Display],
) -> ParsedNode {
    let markup = format!(
        r#"<svg id="{SVG_STUB_ID}" xmlns="{SVG_NAMESPACE}">{}</svg>"#,
        concat(strings, values)
    );
    let content = match scratch.set_inner_html(&markup) {
        Ok(content) => content,
        Err(err) => return parse_failed(doc, err),
    };
    let source = scratch.tree();

    let stub = SelectorList::parse(&format!("svg#{}", css_escape(SVG_STUB_ID)))
        .ok()
        .and_then(|selector| source.query_selector(content, &selector));
    let Some(stub) = stub else {
        tracing::debug!("SVG wrapper missing from parsed markup");
        return ParsedNode::Fragment(doc.create_document_fragment());
    };

    if let Some(element) = only_element_child(source, stub) {
        return doc
            .import_node(source, element, true)
            .map_or_else(|err| parse_failed(doc, err), ParsedNode::Element);
    }

    let fragment = doc.create_document_fragment();
    for child in source.child_ids(stub) {
        let moved = doc
            .import_node(source, child, true)
            .and_then(|copy| doc.tree_mut().append_child(fragment, copy));
        if let Err(err) = moved {
            tracing::debug!("Could not copy {:?} out of the SVG wrapper: {}", child, err);
        }
    }
    ParsedNode::Fragment(fragment)
}

/// `strings[0] values[0] strings[1] ... strings[n-1]`; values without a
/// gap to fill are ignored
fn concat(strings: &[&str], values: &[&dyn fmt::Display]) -> String {
    let mut markup = String::new();
    for (index, segment) in strings.iter().enumerate() {
        if let Some(value) = index.checked_sub(1).and_then(|i| values.get(i)) {
            markup.push_str(&value.to_string());
        }
        markup.push_str(segment);
    }
    markup
}

fn parse_failed(doc: &mut Document, err: DomError) -> ParsedNode {
    tracing::debug!("Importing parsed markup failed: {}", err);
    ParsedNode::Fragment(doc.create_document_fragment())
}

fn only_element_child(tree: &DomTree, parent: NodeId) -> Option<NodeId> {
    let mut elements = tree.element_children(parent);
    match (elements.next(), elements.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
