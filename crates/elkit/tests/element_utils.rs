//! Integration tests for the element utilities

use elkit::{
    ComponentShadowRoots, DOMRect, Document, NodeId, OpenShadowRoots, ParsedNode, SVG_STUB_ID,
    SelectorList, ShadowRootInit, TemplateScratch, closest, create_element, element_from_point,
    element_from_point_with, generate_unique_id, html, html_with, svg,
};
use elkit::dom::{HTML_NAMESPACE, SVG_NAMESPACE};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sel(selector: &str) -> SelectorList {
    SelectorList::parse(selector).unwrap()
}

fn boxed(doc: &mut Document, parent: NodeId, name: &str, rect: (f64, f64, f64, f64)) -> NodeId {
    let el = doc.create_element(name).unwrap();
    doc.tree.append_child(parent, el).unwrap();
    doc.tree
        .set_client_rect(el, DOMRect::from_xywh(rect.0, rect.1, rect.2, rect.3))
        .unwrap();
    el
}

// ============================================================================
// MARKUP PARSING
// ============================================================================

#[test]
fn test_html_single_element() {
    init_tracing();
    let mut doc = Document::default();
    let label = "Save";
    let parsed = html(
        &mut doc,
        &["<button class=\"primary\" title=\"", "\">", "</button>"],
        &[&label, &label],
    );

    let ParsedNode::Element(button) = parsed else {
        panic!("expected an element, got {parsed:?}");
    };
    let tree = doc.tree();
    assert_eq!(tree.local_name(button), Some("button"));
    assert_eq!(tree.namespace_uri(button), Some(HTML_NAMESPACE));
    assert_eq!(tree.get_attribute(button, "class"), Some("primary"));
    assert_eq!(tree.get_attribute(button, "title"), Some("Save"));
    assert_eq!(tree.text_content(button), "Save");
    assert_eq!(tree.parent(button), None);
}

#[test]
fn test_html_siblings_give_fragment_in_order() {
    let mut doc = Document::default();
    let parsed = html(&mut doc, &["<li>a</li>text<li>b</li><li>c</li>"], &[]);

    let fragment = parsed.fragment().unwrap();
    let tree = doc.tree();
    let texts: Vec<_> = tree
        .child_ids(fragment)
        .into_iter()
        .map(|child| tree.text_content(child))
        .collect();
    assert_eq!(texts, ["a", "text", "b", "c"]);
}

#[test]
fn test_html_result_is_owned_by_caller() {
    let mut doc = Document::default();
    let mut scratch = TemplateScratch::new();

    let first = html_with(&mut doc, &mut scratch, &["<p id=one></p>"], &[]).node();
    let second = html_with(&mut doc, &mut scratch, &["<p id=two></p>"], &[]).node();

    assert_eq!(doc.tree().element_id(first), Some("one"));
    assert_eq!(doc.tree().element_id(second), Some("two"));
    assert_eq!(scratch.tree().text_content(scratch.content()), "");

    let body = doc.body().unwrap();
    doc.tree.append_child(body, first).unwrap();
    assert_eq!(doc.get_element_by_id("one"), Some(first));
}

#[test]
fn test_html_stray_template_end_tag_keeps_later_markup() {
    let mut doc = Document::default();
    let parsed = html(&mut doc, &["<b>a</b></template><i>b</i>"], &[]);

    let ParsedNode::Fragment(fragment) = parsed else {
        panic!("expected a fragment, got {parsed:?}");
    };
    let tree = doc.tree();
    let names: Vec<_> = tree
        .element_children(fragment)
        .map(|el| tree.local_name(el).unwrap_or(""))
        .collect();
    assert_eq!(names, ["b", "i"]);
    assert_eq!(tree.text_content(fragment), "ab");
}

#[test]
fn test_html_reused_scratch_leaves_no_wrappers_behind() {
    let mut doc = Document::default();
    let mut scratch = TemplateScratch::new();
    let before = doc.tree().len();

    for _ in 0..10 {
        html_with(&mut doc, &mut scratch, &["<hr>"], &[]);
    }
    assert_eq!(doc.tree().len() - before, 10);
}

#[test]
fn test_svg_single_element() {
    let mut doc = Document::default();
    let radius = 4;
    let parsed = svg(&mut doc, &["<circle r=\"", "\"/>"], &[&radius]);

    let circle = parsed.element().unwrap();
    let tree = doc.tree();
    assert_eq!(tree.local_name(circle), Some("circle"));
    assert_eq!(tree.namespace_uri(circle), Some(SVG_NAMESPACE));
    assert_eq!(tree.get_attribute(circle, "r"), Some("4"));
    assert_eq!(tree.parent(circle), None);
}

#[test]
fn test_svg_siblings_leave_no_stub() {
    let mut doc = Document::default();
    let parsed = svg(&mut doc, &["<rect/><path d=\"M0 0\"/><g></g>"], &[]);

    let fragment = parsed.fragment().unwrap();
    let tree = doc.tree();
    let kids = tree.child_ids(fragment);
    let names: Vec<_> = kids.iter().map(|&k| tree.local_name(k).unwrap_or("")).collect();
    assert_eq!(names, ["rect", "path", "g"]);
    for kid in kids {
        assert_eq!(tree.parent(kid), Some(fragment));
        assert_eq!(tree.namespace_uri(kid), Some(SVG_NAMESPACE));
        assert_ne!(tree.element_id(kid), Some(SVG_STUB_ID));
    }
}

// ============================================================================
// ELEMENT FACTORY
// ============================================================================

#[test]
fn test_create_element_names() {
    let mut doc = Document::default();

    let div = create_element(&mut doc, "div", None).unwrap();
    assert_eq!(doc.tree().local_name(div), Some("div"));
    assert_eq!(doc.tree().namespace_uri(div), Some(HTML_NAMESPACE));

    let circle = create_element(&mut doc, "svg:circle", None).unwrap();
    assert_eq!(doc.tree().local_name(circle), Some("circle"));
    assert_eq!(doc.tree().namespace_uri(circle), Some(SVG_NAMESPACE));

    assert_eq!(create_element(&mut doc, "foo:bar", None), None);
    assert_eq!(create_element(&mut doc, "a:b:c", None), None);
}

#[test]
fn test_create_customized_builtin() {
    let mut doc = Document::default();
    doc.custom_elements_mut()
        .define("x-fancy-button", Some("button"))
        .unwrap();

    let button = create_element(&mut doc, "button", Some("x-fancy-button")).unwrap();
    assert_eq!(doc.tree().is_value(button), Some("x-fancy-button"));
    assert_eq!(
        doc.tree().element(button).unwrap().custom_state,
        elkit::dom::CustomElementState::Custom
    );
}

// ============================================================================
// UNIQUE IDS
// ============================================================================

#[test]
fn test_generate_unique_id() {
    let mut doc = Document::default();
    let parsed = html(&mut doc, &["<i id=x1></i><b><i id=x2></i></b>"], &[]);
    let fragment = parsed.fragment().unwrap();

    assert_eq!(generate_unique_id(doc.tree(), fragment, "x"), "x3");

    let empty = doc.create_document_fragment();
    assert_eq!(generate_unique_id(doc.tree(), empty, "id-"), "id-1");
    assert_eq!(generate_unique_id(doc.tree(), empty, ""), "1");
}

// ============================================================================
// SHADOW-AWARE CLOSEST
// ============================================================================

#[test]
fn test_closest_crosses_shadow_boundary() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let host = doc.create_element("x-panel").unwrap();
    doc.tree.set_attribute(host, "class", "panel").unwrap();
    doc.tree.append_child(body, host).unwrap();

    let shadow = doc.attach_shadow(host, ShadowRootInit::open()).unwrap();
    let wrapper = doc.create_element("div").unwrap();
    let button = doc.create_element("button").unwrap();
    doc.tree.append_child(shadow, wrapper).unwrap();
    doc.tree.append_child(wrapper, button).unwrap();

    let tree = doc.tree();
    assert_eq!(closest(tree, button, &sel(".panel"), true), Some(host));
    assert_eq!(closest(tree, button, &sel(".panel"), false), None);
    assert_eq!(closest(tree, button, &sel("div"), true), Some(wrapper));
    assert_eq!(closest(tree, button, &sel("body"), true), Some(body));
    assert_eq!(closest(tree, button, &sel("table"), true), None);
}

#[test]
fn test_closest_through_nested_shadow_trees() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let outer = doc.create_element("x-outer").unwrap();
    doc.tree.set_attribute(outer, "data-root", "").unwrap();
    doc.tree.append_child(body, outer).unwrap();
    let outer_shadow = doc.attach_shadow(outer, ShadowRootInit::closed_retained()).unwrap();
    let inner = doc.create_element("x-inner").unwrap();
    doc.tree.append_child(outer_shadow, inner).unwrap();
    let inner_shadow = doc.attach_shadow(inner, ShadowRootInit::open()).unwrap();
    let leaf = doc.create_element("span").unwrap();
    doc.tree.append_child(inner_shadow, leaf).unwrap();

    assert_eq!(closest(doc.tree(), leaf, &sel("[data-root]"), true), Some(outer));
    assert_eq!(closest(doc.tree(), leaf, &sel("x-inner"), true), Some(inner));
}

// ============================================================================
// SHADOW-AWARE HIT-TESTING
// ============================================================================

/// body > x-outer (0,0 200x200) #shadow > x-inner (10,10 100x100) #shadow > button (20,20 30x30)
fn nested_hosts(outer_init: ShadowRootInit) -> (Document, [NodeId; 3]) {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let outer = boxed(&mut doc, body, "x-outer", (0.0, 0.0, 200.0, 200.0));
    let outer_shadow = doc.attach_shadow(outer, outer_init).unwrap();
    let inner = boxed(&mut doc, outer_shadow, "x-inner", (10.0, 10.0, 100.0, 100.0));
    let inner_shadow = doc.attach_shadow(inner, ShadowRootInit::open()).unwrap();
    let button = boxed(&mut doc, inner_shadow, "button", (20.0, 20.0, 30.0, 30.0));
    (doc, [outer, inner, button])
}

#[test]
fn test_element_from_point_descends_shadow_trees() {
    init_tracing();
    let (doc, [outer, inner, button]) = nested_hosts(ShadowRootInit::open());

    assert_eq!(element_from_point(&doc, 25.0, 25.0, true), Some(button));
    assert_eq!(element_from_point(&doc, 25.0, 25.0, false), Some(outer));
    assert_eq!(element_from_point(&doc, 100.0, 100.0, true), Some(inner));
    assert_eq!(element_from_point(&doc, 150.0, 150.0, true), Some(outer));
    assert_eq!(element_from_point(&doc, 500.0, 500.0, true), None);
}

#[test]
fn test_element_from_point_closed_roots_need_component_lookup() {
    let (doc, [outer, _, button]) = nested_hosts(ShadowRootInit::closed_retained());

    assert_eq!(element_from_point_with(&doc, 25.0, 25.0, true, &ComponentShadowRoots), Some(button));
    assert_eq!(element_from_point_with(&doc, 25.0, 25.0, true, &OpenShadowRoots), Some(outer));
}

#[test]
fn test_element_from_point_ignores_slotted_light_nodes() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let host = boxed(&mut doc, body, "x-frame", (0.0, 0.0, 100.0, 100.0));
    let _light = boxed(&mut doc, host, "img", (10.0, 10.0, 20.0, 20.0));
    let shadow = doc.attach_shadow(host, ShadowRootInit::open()).unwrap();
    let slot = doc.create_element("slot").unwrap();
    doc.tree.append_child(shadow, slot).unwrap();

    assert_eq!(element_from_point(&doc, 15.0, 15.0, true), Some(host));
}
