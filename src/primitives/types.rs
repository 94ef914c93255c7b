//! Primitive types - Props, callbacks and animated values.
//!
//! These types define the interface between the caller, the coordination
//! layer and the inner reorder engine. Props follow the usual pattern:
//! `Option` means "caller did not say", and `Default` gives an empty set.

use std::fmt;
use std::rc::Rc;

use spark_signals::{derived, Signal};

use super::callback::StableCallback;
use crate::types::{ContentSize, DragBegin, DragEnd, LayoutEvent};

// =============================================================================
// Constants
// =============================================================================

/// Rows the pointer must travel before the inner engine starts a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 20.0;

// =============================================================================
// Callback Types
// =============================================================================

/// Drag-begin callback.
pub type DragBeginCallback = Rc<dyn Fn(&DragBegin)>;

/// Drag-end callback (also fires on cancel).
pub type DragEndCallback = Rc<dyn Fn(&DragEnd)>;

/// Called once the inner engine's animated values are available.
pub type AnimValInitCallback = Rc<dyn Fn(&NestedAnimValues)>;

/// Inner container layout callback.
pub type LayoutCallback = Rc<dyn Fn(&LayoutEvent)>;

/// Outer scroll offset callback.
pub type ScrollCallback = Rc<dyn Fn(f32)>;

/// Outer viewport size callback.
pub type SizeCallback = Rc<dyn Fn(f32)>;

/// Outer content size callback.
pub type ContentSizeCallback = Rc<dyn Fn(&ContentSize)>;

// =============================================================================
// Animated Values
// =============================================================================

/// Animated values reported by the inner reorder engine on mount.
#[derive(Clone)]
pub struct AnimValues {
    /// How far the dragged item's pointer sits inside the list, in rows.
    pub hover_offset: Signal<f32>,
    /// Index of the item being dragged, if any.
    pub active_index: Signal<Option<usize>>,
}

impl AnimValues {
    /// Fresh values with nothing dragged.
    pub fn new() -> Self {
        Self {
            hover_offset: spark_signals::signal(0.0),
            active_index: spark_signals::signal(None),
        }
    }
}

impl Default for AnimValues {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnimValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimValues")
            .field("hover_offset", &self.hover_offset.get())
            .field("active_index", &self.active_index.get())
            .finish()
    }
}

/// Read-only view of a derived offset.
///
/// Reading inside an effect or derived tracks the underlying inputs.
#[derive(Clone)]
pub struct CombinedOffset {
    read: Rc<dyn Fn() -> f32>,
}

impl CombinedOffset {
    /// Derive an offset from `compute`, re-evaluated whenever its inputs change.
    pub fn derive<F>(compute: F) -> Self
    where
        F: Fn() -> f32 + 'static,
    {
        let value = derived(compute);
        Self {
            read: Rc::new(move || value.get()),
        }
    }

    /// Current value.
    pub fn get(&self) -> f32 {
        (self.read)()
    }
}

impl fmt::Debug for CombinedOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CombinedOffset").field(&self.get()).finish()
    }
}

/// Engine values augmented with the hover offset in outer coordinates.
#[derive(Clone, Debug)]
pub struct NestedAnimValues {
    /// What the engine reported.
    pub inner: AnimValues,
    /// Local hover offset plus the list's measured position in the outer container.
    pub hover_offset: CombinedOffset,
}

// =============================================================================
// Nestable List Props (caller-facing)
// =============================================================================

/// Properties for a draggable list nested in an outer scroll container.
///
/// `extra` carries the inner engine's own configuration and is passed
/// through untouched.
pub struct NestableListProps<E = ()> {
    /// Drag activation distance (default: [`DEFAULT_ACTIVATION_DISTANCE`]).
    pub activation_distance: Option<f32>,

    /// Ignored. The inner list never scrolls on its own.
    pub scroll_enabled: Option<bool>,

    /// Drag begin callback, runs after the outer container is locked.
    pub on_drag_begin: Option<DragBeginCallback>,

    /// Drag end callback, runs after the outer container is unlocked.
    pub on_drag_end: Option<DragEndCallback>,

    /// Animated values callback, receives the augmented set.
    pub on_anim_val_init: Option<AnimValInitCallback>,

    /// Inner container layout callback. Replaces the coordinator's own
    /// measurement: when set, `local_vertical_offset` is never updated.
    pub on_container_layout: Option<LayoutCallback>,

    /// Engine configuration passed through as-is.
    pub extra: E,
}

impl<E: Default> Default for NestableListProps<E> {
    fn default() -> Self {
        Self {
            activation_distance: None,
            scroll_enabled: None,
            on_drag_begin: None,
            on_drag_end: None,
            on_anim_val_init: None,
            on_container_layout: None,
            extra: E::default(),
        }
    }
}

/// Caller handlers kept by the coordinator between renders.
#[derive(Default, Clone)]
pub(crate) struct ListHandlers {
    pub on_drag_begin: Option<DragBeginCallback>,
    pub on_drag_end: Option<DragEndCallback>,
    pub on_anim_val_init: Option<AnimValInitCallback>,
    pub on_container_layout: Option<LayoutCallback>,
}

impl<E> NestableListProps<E> {
    /// Split into the handler set and the remaining configuration.
    pub(crate) fn split(self) -> (ListHandlers, Option<f32>, E) {
        let handlers = ListHandlers {
            on_drag_begin: self.on_drag_begin,
            on_drag_end: self.on_drag_end,
            on_anim_val_init: self.on_anim_val_init,
            on_container_layout: self.on_container_layout,
        };
        (handlers, self.activation_distance, self.extra)
    }
}

// =============================================================================
// Inner List Props (engine-facing)
// =============================================================================

/// What the coordinator hands to the inner reorder engine.
#[derive(Clone)]
pub struct InnerListProps<E> {
    /// Always false: the list is driven by drag gestures only.
    pub scroll_enabled: bool,

    /// Resolved activation distance.
    pub activation_distance: f32,

    /// Live outer scroll offset.
    pub outer_scroll_offset: Signal<f32>,

    /// Hover offset in outer coordinates.
    pub hover_offset: CombinedOffset,

    /// Call on every layout of the list's container.
    pub on_container_layout: StableCallback<LayoutEvent>,

    /// Call when a drag starts.
    pub on_drag_begin: StableCallback<DragBegin>,

    /// Call when a drag ends or is cancelled.
    pub on_drag_end: StableCallback<DragEnd>,

    /// Call once animated values exist (again after a remount).
    pub on_anim_val_init: StableCallback<AnimValues>,

    /// Engine configuration from the caller.
    pub extra: E,
}

impl<E: fmt::Debug> fmt::Debug for InnerListProps<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerListProps")
            .field("scroll_enabled", &self.scroll_enabled)
            .field("activation_distance", &self.activation_distance)
            .field("outer_scroll_offset", &self.outer_scroll_offset.get())
            .field("hover_offset", &self.hover_offset)
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Scroll Container Props
// =============================================================================

/// Properties for the outer scroll container.
#[derive(Default)]
pub struct ScrollContainerProps {
    /// Scroll callback, runs after the shared offset is written.
    pub on_scroll: Option<ScrollCallback>,

    /// Viewport layout callback, runs after the shared size is written.
    pub on_layout: Option<SizeCallback>,

    /// Content size callback, runs after the shared size is written.
    pub on_content_size_change: Option<ContentSizeCallback>,

    /// Child render function. Runs once at mount with the scroll context provided.
    pub children: Option<Box<dyn FnOnce()>>,
}

/// Caller handlers kept by the container between renders.
#[derive(Default, Clone)]
pub(crate) struct ContainerHandlers {
    pub on_scroll: Option<ScrollCallback>,
    pub on_layout: Option<SizeCallback>,
    pub on_content_size_change: Option<ContentSizeCallback>,
}

impl ScrollContainerProps {
    /// Split off the children, keeping the handlers.
    pub(crate) fn split(self) -> (ContainerHandlers, Option<Box<dyn FnOnce()>>) {
        let handlers = ContainerHandlers {
            on_scroll: self.on_scroll,
            on_layout: self.on_layout,
            on_content_size_change: self.on_content_size_change,
        };
        (handlers, self.children)
    }
}
