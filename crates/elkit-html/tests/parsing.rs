//! Parsing and serialization tests for elkit-html

use elkit_dom::{ComponentShadowRoots, OpenShadowRoots, SVG_NAMESPACE, ShadowLookup};
use elkit_html::{HtmlParser, HtmlSerializer, TemplateScratch, inner_html, outer_html, parse};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// DOCUMENTS
// ============================================================================

#[test]
fn test_parse_minimal_html() {
    init_tracing();
    let doc = parse("");
    assert!(doc.document_element().is_some());
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_malformed_html() {
    init_tracing();
    let doc = parse("<div><p>Unclosed paragraph<span>Unclosed span</div></p>");
    let body = doc.body().unwrap();
    assert!(doc.tree().text_content(body).contains("Unclosed span"));
}

#[test]
fn test_doctype_is_kept() {
    let doc = parse("<!DOCTYPE html><p>x</p>");
    let first = doc.tree().first_child(doc.tree().root()).unwrap();
    assert_eq!(outer_html(doc.tree(), first), "<!DOCTYPE html>");
}

#[test]
fn test_whitespace_text_is_kept() {
    let doc = parse("<ul> <li>a</li> <li>b</li> </ul>");
    let ul = doc.tree().first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(doc.tree().children(ul).count(), 5);
}

#[test]
fn test_svg_content_is_namespaced() {
    let doc = parse("<svg viewBox=\"0 0 10 10\"><foreignObject></foreignObject></svg>");
    let svg = doc.tree().first_element_child(doc.body().unwrap()).unwrap();
    let child = doc.tree().first_element_child(svg).unwrap();

    assert_eq!(doc.tree().namespace_uri(svg), Some(SVG_NAMESPACE));
    assert_eq!(doc.tree().local_name(child), Some("foreignObject"));
    assert_eq!(doc.tree().get_attribute(svg, "viewBox"), Some("0 0 10 10"));
}

// ============================================================================
// DECLARATIVE SHADOW ROOTS
// ============================================================================

#[test]
fn test_declarative_open_shadow_root() {
    init_tracing();
    let doc = parse(
        "<x-card id=card><template shadowrootmode=open><b>inside</b><slot></slot></template>light</x-card>",
    );
    let tree = doc.tree();
    let host = doc.get_element_by_id("card").unwrap();
    let root = tree.shadow_root(host).unwrap();

    assert_eq!(tree.host_of(root), Some(host));
    assert_eq!(tree.text_content(root), "inside");
    assert_eq!(inner_html(tree, host), "light");
    assert_eq!(
        HtmlSerializer::with_shadow_roots().serialize_inner(tree, host),
        "<template shadowrootmode=\"open\"><b>inside</b><slot></slot></template>light"
    );
}

#[test]
fn test_declarative_closed_shadow_root_is_retained() {
    let doc = parse("<div id=host><template shadowrootmode=closed><i>secret</i></template></div>");
    let tree = doc.tree();
    let host = doc.get_element_by_id("host").unwrap();

    assert_eq!(OpenShadowRoots.shadow_root_of(tree, host), None);
    let root = ComponentShadowRoots.shadow_root_of(tree, host).unwrap();
    assert_eq!(tree.text_content(root), "secret");
}

#[test]
fn test_declarative_shadow_on_invalid_host_stays_template() {
    let doc = parse("<a id=link><template shadowrootmode=open>x</template></a>");
    let tree = doc.tree();
    let link = doc.get_element_by_id("link").unwrap();

    assert!(tree.shadow_root(link).is_none());
    let template = tree.first_element_child(link).unwrap();
    assert_eq!(tree.local_name(template), Some("template"));
}

// ============================================================================
// TEMPLATE CONTENTS
// ============================================================================

#[test]
fn test_template_contents_do_not_attach_shadow_roots() {
    let mut scratch = TemplateScratch::new();
    let content = scratch
        .set_inner_html("<div><template shadowrootmode=open>x</template></div>")
        .unwrap();
    let tree = scratch.tree();
    let div = tree.first_element_child(content).unwrap();

    assert!(tree.shadow_root(div).is_none());
    assert_eq!(tree.child_element_count(div), 1);
}

#[test]
fn test_template_contents_round_trip() {
    let markup = "<p class=\"a\">one &amp; two</p><!--note--><img src=\"x.png\">";
    let mut scratch = TemplateScratch::new();
    let content = scratch.set_inner_html(markup).unwrap();

    assert_eq!(inner_html(scratch.tree(), content), markup);
}

#[test]
fn test_parse_template_contents_appends() {
    let mut doc = parse("");
    let fragment = doc.create_document_fragment();
    let parser = HtmlParser::new();
    parser.parse_template_contents("<i>a</i>", doc.tree_mut(), fragment).unwrap();
    parser.parse_template_contents("<i>b</i>", doc.tree_mut(), fragment).unwrap();

    assert_eq!(inner_html(doc.tree(), fragment), "<i>a</i><i>b</i>");
}
