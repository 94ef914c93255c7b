//! Core types for spark-nestable.
//!
//! Plain value types shared by the scroll context, the outer container and
//! the drag coordinator. All offsets and sizes are vertical and measured in
//! terminal rows as `f32`, so sub-row animation values pass through untouched.

use taffy::NodeId;

// =============================================================================
// Node Handle
// =============================================================================

/// Opaque identity of a laid-out node.
///
/// Used as the coordinate-space anchor for layout measurement. The handle
/// converts losslessly to and from a Taffy [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u64);

impl NodeHandle {
    /// Create a handle from a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<NodeId> for NodeHandle {
    fn from(id: NodeId) -> Self {
        Self(u64::from(id))
    }
}

impl From<NodeHandle> for NodeId {
    fn from(handle: NodeHandle) -> Self {
        NodeId::from(handle.0)
    }
}

// =============================================================================
// Layout Events
// =============================================================================

/// Emitted by the inner list when its container is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEvent {
    /// The inner list's container node.
    pub container: NodeHandle,
}

/// Content size reported by the outer scrollable surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSize {
    pub width: f32,
    pub height: f32,
}

// =============================================================================
// Drag Lifecycle
// =============================================================================

/// Drag-begin notification from the inner reorder engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragBegin {
    /// Index of the picked item.
    pub index: usize,
}

/// Drag-end notification from the inner reorder engine.
///
/// Cancellation is reported as a drag end with `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub from: usize,
    pub to: usize,
}

impl DragEnd {
    /// True if the drop left the item where it started.
    pub fn is_cancel(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_handle_roundtrips_through_node_id() {
        let handle = NodeHandle::new(42);
        let id: NodeId = handle.into();
        assert_eq!(NodeHandle::from(id), handle);
    }

    #[test]
    fn test_drag_end_cancel() {
        assert!(DragEnd { from: 3, to: 3 }.is_cancel());
        assert!(!DragEnd { from: 3, to: 1 }.is_cancel());
    }
}
