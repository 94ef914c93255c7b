//! Measure Module - Asynchronous layout measurement.
//!
//! A [`LayoutMeasurer`] answers "where is this node relative to that one?"
//! some time after being asked. Results arrive through callbacks; there is
//! no retry and no cancellation, so callers must tolerate late answers.
//!
//! [`TaffyMeasurer`] is the bundled backend. It owns a Taffy tree, queues
//! requests, and resolves them on [`flush`](TaffyMeasurer::flush), which the
//! host calls once per frame after layout.
//!
//! # Example
//!
//! ```ignore
//! let measurer = TaffyMeasurer::new();
//! let list = measurer.new_leaf(list_style)?;
//! let content = measurer.new_with_children(column_style, &[header, list])?;
//! measurer.compute_layout(content, Size::MAX_CONTENT)?;
//!
//! measurer.measure_layout(list, content,
//!     Box::new(|x, y| println!("list at ({x}, {y})")),
//!     Box::new(|| println!("not measurable")));
//! measurer.flush();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

use taffy::{AvailableSpace, NodeId, Size, Style, TaffyTree};

use crate::error::NestError;
use crate::types::NodeHandle;

// =============================================================================
// MEASUREMENT CAPABILITY
// =============================================================================

/// Success callback: position `(x, y)` of the node in the anchor's space.
pub type OnMeasured = Box<dyn FnOnce(f32, f32)>;

/// Failure callback. Carries no payload.
pub type OnMeasureFailed = Box<dyn FnOnce()>;

/// Host capability resolving one node's position relative to another.
pub trait LayoutMeasurer {
    /// Request the position of `node` in `relative_to`'s coordinate space.
    ///
    /// Exactly one of the callbacks runs, possibly much later.
    fn measure_layout(
        &self,
        node: NodeHandle,
        relative_to: NodeHandle,
        on_success: OnMeasured,
        on_fail: OnMeasureFailed,
    );
}

// =============================================================================
// TAFFY BACKEND
// =============================================================================

struct MeasureRequest {
    node: NodeHandle,
    relative_to: NodeHandle,
    on_success: OnMeasured,
    on_fail: OnMeasureFailed,
}

/// Taffy-backed layout host with queued measurement.
pub struct TaffyMeasurer {
    tree: RefCell<TaffyTree<()>>,
    live: RefCell<HashSet<NodeHandle>>,
    /// False after any structural change until the next `compute_layout`.
    computed: Cell<bool>,
    queue: RefCell<VecDeque<MeasureRequest>>,
}

impl TaffyMeasurer {
    /// Create an empty layout host.
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(TaffyTree::new()),
            live: RefCell::new(HashSet::new()),
            computed: Cell::new(false),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Tree building
    // -------------------------------------------------------------------------

    /// Add a childless node.
    pub fn new_leaf(&self, style: Style) -> Result<NodeHandle, NestError> {
        let id = self.tree.borrow_mut().new_leaf(style)?;
        Ok(self.track(id))
    }

    /// Add a node with the given children.
    pub fn new_with_children(
        &self,
        style: Style,
        children: &[NodeHandle],
    ) -> Result<NodeHandle, NestError> {
        let ids = self.resolve_ids(children)?;
        let id = self.tree.borrow_mut().new_with_children(style, &ids)?;
        Ok(self.track(id))
    }

    /// Replace a node's style.
    pub fn set_style(&self, node: NodeHandle, style: Style) -> Result<(), NestError> {
        let id = self.resolve_id(node)?;
        self.tree.borrow_mut().set_style(id, style)?;
        self.computed.set(false);
        Ok(())
    }

    /// Remove a node. Its children stay alive as detached roots.
    pub fn remove(&self, node: NodeHandle) -> Result<(), NestError> {
        let id = self.resolve_id(node)?;
        self.tree.borrow_mut().remove(id)?;
        self.live.borrow_mut().remove(&node);
        self.computed.set(false);
        Ok(())
    }

    /// Run layout from `root`.
    pub fn compute_layout(
        &self,
        root: NodeHandle,
        available: Size<AvailableSpace>,
    ) -> Result<(), NestError> {
        let id = self.resolve_id(root)?;
        self.tree.borrow_mut().compute_layout(id, available)?;
        self.computed.set(true);
        Ok(())
    }

    /// True if `node` exists in the tree.
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.live.borrow().contains(&node)
    }

    fn track(&self, id: NodeId) -> NodeHandle {
        let handle = NodeHandle::from(id);
        self.live.borrow_mut().insert(handle);
        self.computed.set(false);
        handle
    }

    fn resolve_id(&self, node: NodeHandle) -> Result<NodeId, NestError> {
        if self.contains(node) {
            Ok(node.into())
        } else {
            Err(NestError::Layout(format!("unknown node {node:?}")))
        }
    }

    fn resolve_ids(&self, nodes: &[NodeHandle]) -> Result<Vec<NodeId>, NestError> {
        nodes.iter().map(|&node| self.resolve_id(node)).collect()
    }

    // -------------------------------------------------------------------------
    // Measurement
    // -------------------------------------------------------------------------

    /// Resolve a position synchronously against the last computed layout.
    ///
    /// `node` must be `relative_to` itself or one of its descendants.
    pub fn resolve(
        &self,
        node: NodeHandle,
        relative_to: NodeHandle,
    ) -> Result<(f32, f32), NestError> {
        let failed = NestError::MeasurementFailed { node, relative_to };

        if !self.computed.get() || !self.contains(node) || !self.contains(relative_to) {
            return Err(failed);
        }

        let tree = self.tree.borrow();
        let anchor: NodeId = relative_to.into();
        let mut current: NodeId = node.into();
        let (mut x, mut y) = (0.0, 0.0);

        while current != anchor {
            let layout = tree.layout(current)?;
            x += layout.location.x;
            y += layout.location.y;

            current = match tree.parent(current) {
                Some(parent) => parent,
                None => return Err(failed),
            };
        }

        Ok((x, y))
    }

    /// Number of queued requests.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Resolve every queued request. Returns how many were processed.
    ///
    /// Requests queued by callbacks during the flush wait for the next one.
    pub fn flush(&self) -> usize {
        let requests: Vec<MeasureRequest> = self.queue.borrow_mut().drain(..).collect();
        let count = requests.len();

        for request in requests {
            match self.resolve(request.node, request.relative_to) {
                Ok((x, y)) => (request.on_success)(x, y),
                Err(err) => {
                    log::debug!("measure request rejected: {err}");
                    (request.on_fail)();
                }
            }
        }

        count
    }
}

impl Default for TaffyMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutMeasurer for TaffyMeasurer {
    fn measure_layout(
        &self,
        node: NodeHandle,
        relative_to: NodeHandle,
        on_success: OnMeasured,
        on_fail: OnMeasureFailed,
    ) {
        self.queue.borrow_mut().push_back(MeasureRequest {
            node,
            relative_to,
            on_success,
            on_fail,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use taffy::style_helpers::{length, TaffyMaxContent};
    use taffy::FlexDirection;

    fn rows(height: f32) -> Style {
        Style {
            size: Size {
                width: length(80.0),
                height: length(height),
            },
            flex_shrink: 0.0,
            ..Default::default()
        }
    }

    fn column() -> Style {
        Style {
            flex_direction: FlexDirection::Column,
            ..Default::default()
        }
    }

    /// content: [header(120), list(200)]
    fn build() -> (TaffyMeasurer, NodeHandle, NodeHandle, NodeHandle) {
        let measurer = TaffyMeasurer::new();
        let header = measurer.new_leaf(rows(120.0)).unwrap();
        let list = measurer.new_leaf(rows(200.0)).unwrap();
        let content = measurer.new_with_children(column(), &[header, list]).unwrap();
        measurer.compute_layout(content, Size::MAX_CONTENT).unwrap();
        (measurer, content, header, list)
    }

    #[test]
    fn test_resolve_relative_position() {
        let (measurer, content, header, list) = build();

        assert_eq!(measurer.resolve(header, content), Ok((0.0, 0.0)));
        assert_eq!(measurer.resolve(list, content), Ok((0.0, 120.0)));
        assert_eq!(measurer.resolve(content, content), Ok((0.0, 0.0)));
    }

    #[test]
    fn test_resolve_nested_offsets_accumulate() {
        let measurer = TaffyMeasurer::new();
        let spacer = measurer.new_leaf(rows(10.0)).unwrap();
        let list = measurer.new_leaf(rows(50.0)).unwrap();
        let section = measurer.new_with_children(column(), &[spacer, list]).unwrap();
        let header = measurer.new_leaf(rows(30.0)).unwrap();
        let content = measurer.new_with_children(column(), &[header, section]).unwrap();
        measurer.compute_layout(content, Size::MAX_CONTENT).unwrap();

        assert_eq!(measurer.resolve(list, section), Ok((0.0, 10.0)));
        assert_eq!(measurer.resolve(list, content), Ok((0.0, 40.0)));
    }

    #[test]
    fn test_resolve_fails_for_non_descendant() {
        let (measurer, content, header, list) = build();

        assert!(measurer.resolve(content, list).is_err());
        assert!(measurer.resolve(list, header).is_err());
    }

    #[test]
    fn test_resolve_fails_before_layout() {
        let measurer = TaffyMeasurer::new();
        let list = measurer.new_leaf(rows(10.0)).unwrap();
        let content = measurer.new_with_children(column(), &[list]).unwrap();

        assert_eq!(
            measurer.resolve(list, content),
            Err(NestError::MeasurementFailed {
                node: list,
                relative_to: content
            })
        );
    }

    #[test]
    fn test_structural_change_invalidates_layout() {
        let (measurer, content, header, list) = build();

        measurer.set_style(header, rows(60.0)).unwrap();
        assert!(measurer.resolve(list, content).is_err());

        measurer.compute_layout(content, Size::MAX_CONTENT).unwrap();
        assert_eq!(measurer.resolve(list, content), Ok((0.0, 60.0)));
    }

    #[test]
    fn test_removed_node_is_unknown() {
        let (measurer, content, _header, list) = build();

        measurer.remove(list).unwrap();
        assert!(!measurer.contains(list));
        assert!(measurer.remove(list).is_err());
        assert!(measurer.resolve(list, content).is_err());
    }

    #[test]
    fn test_requests_wait_for_flush() {
        let (measurer, content, _header, list) = build();
        let result = Rc::new(RefCell::new(None));

        let result_clone = result.clone();
        measurer.measure_layout(
            list,
            content,
            Box::new(move |x, y| *result_clone.borrow_mut() = Some((x, y))),
            Box::new(|| panic!("should measure")),
        );

        assert_eq!(measurer.pending(), 1);
        assert_eq!(*result.borrow(), None);

        assert_eq!(measurer.flush(), 1);
        assert_eq!(measurer.pending(), 0);
        assert_eq!(*result.borrow(), Some((0.0, 120.0)));
    }

    #[test]
    fn test_flush_reports_failure() {
        let (measurer, content, _header, list) = build();
        let failed = Rc::new(Cell::new(false));

        let failed_clone = failed.clone();
        measurer.measure_layout(
            content,
            list,
            Box::new(|_, _| panic!("should fail")),
            Box::new(move || failed_clone.set(true)),
        );
        measurer.flush();

        assert!(failed.get());
    }

    #[test]
    fn test_requests_from_callbacks_wait_for_next_flush() {
        let (measurer, content, _header, list) = build();
        let measurer = Rc::new(measurer);
        let count = Rc::new(Cell::new(0));

        let again = measurer.clone();
        let count_clone = count.clone();
        measurer.measure_layout(
            list,
            content,
            Box::new(move |_, _| {
                count_clone.set(count_clone.get() + 1);
                let count_inner = count_clone.clone();
                again.measure_layout(
                    list,
                    content,
                    Box::new(move |_, _| count_inner.set(count_inner.get() + 1)),
                    Box::new(|| {}),
                );
            }),
            Box::new(|| {}),
        );

        assert_eq!(measurer.flush(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(measurer.pending(), 1);

        assert_eq!(measurer.flush(), 1);
        assert_eq!(count.get(), 2);
    }
}
