//! Document model tests across tree, shadow, selector and geometry APIs

use elkit_dom::{
    ComponentShadowRoots, DOMRect, Document, DomError, NodeType, SVG_NAMESPACE, SelectorList,
    ShadowLookup, ShadowRootInit, css_escape,
};

#[test]
fn test_escaped_ids_select_their_element() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let ids = ["1st", "with space", "a#b.c", "\"quoted\"", "ünïcödé", "-", "-5x"];

    let elements: Vec<_> = ids
        .iter()
        .map(|id| {
            let el = doc.create_element("span").unwrap();
            doc.tree.set_attribute(el, "id", id).unwrap();
            doc.tree.append_child(body, el).unwrap();
            el
        })
        .collect();

    for (id, el) in ids.iter().zip(elements) {
        let selector = SelectorList::parse(&format!("#{}", css_escape(id))).unwrap();
        assert_eq!(doc.tree.query_selector(body, &selector), Some(el), "id {id:?}");
    }
}

#[test]
fn test_import_between_documents_shares_nothing() {
    let mut source = Document::default();
    let card = source.create_element("article").unwrap();
    source.tree.set_attribute(card, "class", "card wide").unwrap();
    let template = source.create_element("template").unwrap();
    source.tree.append_child(card, template).unwrap();
    let contents = source.tree.template_contents(template).unwrap();
    let text = source.create_text_node("inside");
    source.tree.append_child(contents, text).unwrap();

    let mut target = Document::empty("about:blank");
    let copy = target.import_node(source.tree(), card, true).unwrap();
    assert!(target.tree.has_class(copy, "wide"));

    let copied_template = target.tree.first_element_child(copy).unwrap();
    let copied_contents = target.tree.template_contents(copied_template).unwrap();
    assert_eq!(target.tree.text_content(copied_contents), "inside");

    // Mutating the copy leaves the source untouched
    target.tree.set_attribute(copy, "class", "other").unwrap();
    assert!(source.tree.has_class(card, "wide"));
}

#[test]
fn test_shadow_lookup_and_selectors_respect_boundaries() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let host = doc.create_element("x-menu").unwrap();
    doc.tree.append_child(body, host).unwrap();
    let root = doc.attach_shadow(host, ShadowRootInit::closed_retained()).unwrap();
    let item = doc.create_element("li").unwrap();
    doc.tree.append_child(root, item).unwrap();

    assert_eq!(doc.tree.shadow_root(host), None);
    assert_eq!(ComponentShadowRoots.shadow_root_of(&doc.tree, host), Some(root));
    assert_eq!(doc.tree.get(root).unwrap().node_type(), NodeType::DocumentFragment);

    let li = SelectorList::parse("li").unwrap();
    assert_eq!(doc.tree.query_selector(body, &li), None);
    assert_eq!(doc.tree.query_selector(root, &li), Some(item));
    assert_eq!(doc.tree.append_child(body, root), Err(DomError::HierarchyRequest));
}

#[test]
fn test_document_hit_test_with_overlap() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let svg = doc.create_element_ns(SVG_NAMESPACE, "svg").unwrap();
    let overlay = doc.create_element("div").unwrap();
    doc.tree.append_child(body, svg).unwrap();
    doc.tree.append_child(body, overlay).unwrap();
    doc.tree
        .set_client_rect(svg, DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    doc.tree
        .set_client_rect(overlay, DOMRect::from_xywh(50.0, 0.0, 100.0, 100.0))
        .unwrap();

    assert_eq!(doc.element_from_point(25.0, 50.0), Some(svg));
    assert_eq!(doc.element_from_point(75.0, 50.0), Some(overlay));
}
