//! elkit
//!
//! Element utilities over an elkit document:
//! - [`html`] / [`svg`]: template-style markup to an element or fragment
//! - [`create_element`]: element factory with `svg:` names and `is` tokens
//! - [`element_from_point`]: hit-testing that descends into shadow trees
//! - [`closest`]: ancestor search that continues at shadow hosts
//! - [`generate_unique_id`]: id not yet used inside a fragment
//!
//! # Example
//! ```rust,ignore
//! use elkit::{Document, html, closest, SelectorList};
//!
//! let mut doc = Document::default();
//! let card = html(&mut doc, &["<section class=\"card\"><p>", "</p></section>"], &[&"Hi"]);
//! let p = doc.tree().first_element_child(card.node()).unwrap();
//! let selector = SelectorList::parse(".card")?;
//! assert_eq!(closest(doc.tree(), p, &selector, true), card.element());
//! ```

mod element;
mod markup;

pub use element::{
    closest, create_element, element_from_point, element_from_point_with, generate_unique_id,
};
pub use markup::{ParsedNode, SVG_STUB_ID, html, html_with, svg, svg_with};

pub use elkit_dom::{
    ComponentShadowRoots, DOMRect, Document, DomError, DomResult, DomTree, NodeId,
    OpenShadowRoots, SelectorError, SelectorList, ShadowLookup, ShadowRootInit, ShadowRootMode,
};
pub use elkit_html::TemplateScratch;

// Re-export sub-crates for advanced usage
pub use elkit_dom as dom;
pub use elkit_html as markup_parser;
