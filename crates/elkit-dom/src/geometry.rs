//! Geometry APIs
//!
//! DOMRect, per-element client rects, and point hit-testing.

use crate::{DomError, DomResult, DomTree, NodeData, NodeId};

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Check if point is inside (edges inclusive)
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if rects intersect
    pub fn intersects(&self, other: &DOMRect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }
}

impl DomTree {
    /// Record the border box layout computed for an element
    pub fn set_client_rect(&mut self, element: NodeId, rect: DOMRect) -> DomResult<()> {
        let elem = self
            .get_mut(element)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        elem.client_rect = Some(rect);
        Ok(())
    }

    /// Border box of an element, if laid out
    pub fn client_rect(&self, element: NodeId) -> Option<DOMRect> {
        self.element(element)?.client_rect
    }

    /// `elementFromPoint` for a document or shadow root scope.
    ///
    /// Walks the scope's light tree front to back: later siblings paint over
    /// earlier ones and descendants over ancestors, so the deepest element
    /// whose box contains the point wins. Elements without a box are not hit
    /// themselves but their children are; a box that misses prunes its
    /// subtree. Nested shadow trees are not entered, and a shadow host's
    /// light children are skipped since they render through its shadow tree.
    /// Inside a shadow scope a `<slot>` renders its assigned nodes (or its
    /// own children when nothing is assigned), so the result can be a
    /// light-tree node of the host.
    pub fn hit_test(&self, scope: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let in_shadow = match self.get(scope)?.data {
            NodeData::Document => false,
            NodeData::ShadowRoot(_) => true,
            _ => return None,
        };

        // Each frame holds the children still to visit, in tree order;
        // popping from the back visits the topmost first.
        let mut stack = vec![(scope, self.rendered_children(scope, in_shadow))];
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.1.pop() {
                let candidate = self
                    .element(child)
                    .is_some_and(|e| e.client_rect.is_none_or(|r| r.contains_point(x, y)));
                if candidate {
                    let children = self.rendered_children(child, in_shadow);
                    stack.push((child, children));
                }
            } else {
                let node = frame.0;
                stack.pop();
                if self.client_rect(node).is_some_and(|r| r.contains_point(x, y)) {
                    tracing::trace!("Hit {:?} at ({}, {}) in scope {:?}", node, x, y, scope);
                    return Some(node);
                }
            }
        }
        None
    }

    fn rendered_children(&self, node: NodeId, in_shadow: bool) -> Vec<NodeId> {
        if self.element(node).is_some_and(|e| e.shadow_root.is_valid()) {
            return Vec::new();
        }
        if in_shadow && self.is_html_element_named(node, "slot") {
            let assigned = self.assigned_nodes(node);
            if !assigned.is_empty() {
                return assigned;
            }
        }
        self.child_ids(node)
    }
}
