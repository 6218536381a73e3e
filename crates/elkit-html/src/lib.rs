//! elkit HTML
//!
//! HTML5 parsing on html5ever, template-content parsing into a scratch
//! container, and HTML serialization.

mod parser;
mod scratch;
mod serializer;

pub use elkit_dom::{Document, DomTree, NodeId};
pub use parser::HtmlParser;
pub use scratch::TemplateScratch;
pub use serializer::HtmlSerializer;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Utility: Get innerHTML of a node
pub fn inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// Utility: Get outerHTML of a node
pub fn outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}
