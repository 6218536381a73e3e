//! Element utilities: factory, shadow-aware hit-testing, shadow-aware
//! `closest`, and fragment-unique ids.

use elkit_dom::{
    ComponentShadowRoots, Document, DomTree, NodeId, SVG_NAMESPACE, SelectorList, ShadowLookup,
    css_escape,
};

/// `document.createElement` that also understands `svg:<local>`.
///
/// Bare names create HTML elements (lowercased), with `is` recorded for
/// customized built-ins. `svg:` names create SVG elements and ignore `is`.
/// Other prefixes, extra colons and names the document rejects give `None`.
pub fn create_element(doc: &mut Document, name: &str, is: Option<&str>) -> Option<NodeId> {
    let mut parts = name.split(':');
    let created = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), None, _) => match is {
            Some(is) => doc.create_element_with_is(local, is),
            None => doc.create_element(local),
        },
        (Some("svg"), Some(local), None) => doc.create_element_ns(SVG_NAMESPACE, local),
        _ => {
            tracing::debug!("Unsupported element name {:?}", name);
            return None;
        }
    };

    match created {
        Ok(element) => Some(element),
        Err(err) => {
            tracing::debug!("Element name {:?} rejected: {}", name, err);
            None
        }
    }
}

/// `elementFromPoint` that can descend into shadow trees, reaching open
/// roots and closed roots retained by their component
pub fn element_from_point(doc: &Document, x: f64, y: f64, walk_shadow_dom: bool) -> Option<NodeId> {
    element_from_point_with(doc, x, y, walk_shadow_dom, &ComponentShadowRoots)
}

/// [`element_from_point`] with an explicit shadow root lookup
pub fn element_from_point_with<L>(
    doc: &Document,
    x: f64,
    y: f64,
    walk_shadow_dom: bool,
    lookup: &L,
) -> Option<NodeId>
where
    L: ShadowLookup + ?Sized,
{
    let tree = doc.tree();
    let mut element = doc.element_from_point(x, y)?;
    if !walk_shadow_dom {
        return Some(element);
    }

    while let Some(shadow_root) = lookup.shadow_root_of(tree, element) {
        // A slotted light-tree node can come back from the shadow hit-test;
        // only nodes of the shadow tree itself count.
        let descendant = tree
            .hit_test(shadow_root, x, y)
            .filter(|&hit| tree.root_node(hit) == shadow_root);

        match descendant {
            Some(hit) if hit != element => {
                tracing::trace!("Descending from {:?} into {:?}", element, hit);
                element = hit;
            }
            _ => break,
        }
    }
    Some(element)
}

/// `element.closest(selectors)` that continues at the shadow host when the
/// element's own tree has no match
pub fn closest(
    tree: &DomTree,
    element: NodeId,
    selectors: &SelectorList,
    walk_shadow_dom: bool,
) -> Option<NodeId> {
    let mut current = element;
    loop {
        if let Some(found) = tree.closest(current, selectors) {
            return Some(found);
        }
        if !walk_shadow_dom {
            return None;
        }
        current = tree.host_of(tree.root_node(current))?;
    }
}

/// First `prefix1`, `prefix2`, ... not used as an element id under `fragment`
pub fn generate_unique_id(tree: &DomTree, fragment: NodeId, prefix: &str) -> String {
    let mut counter: u64 = 1;
    loop {
        let id = format!("{prefix}{counter}");
        let taken = SelectorList::parse(&format!("#{}", css_escape(&id)))
            .is_ok_and(|selector| tree.query_selector(fragment, &selector).is_some());
        if !taken {
            return id;
        }
        counter += 1;
    }
}
