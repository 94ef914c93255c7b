//! Outer Scroll Container - Publishes scroll state to nested lists.
//!
//! The container mirrors every scroll, layout and content-size event of the
//! outer scrollable surface into its [`ScrollContext`], and gates its own
//! scroll gestures on the context's enabled flag.
//!
//! # API
//!
//! - `OuterScrollContainer::mount(handle, props)` - Create the context and render children
//! - `on_scroll` / `on_layout` / `on_content_size_change` - Host event entry points
//! - `scroll_by(delta)` - User scroll gesture, refused while a nested drag holds the lock
//! - `scroll_to(offset)` - Programmatic scroll (auto-scroll), always applied
//! - `handlers()` - Stable handles to register with the host once
//!
//! # Example
//!
//! ```ignore
//! let container = OuterScrollContainer::mount(surface, ScrollContainerProps {
//!     children: Some(Box::new(move || {
//!         let list = NestedDragCoordinator::from_context(measurer, props).unwrap();
//!         // ...
//!     })),
//!     ..Default::default()
//! });
//!
//! container.on_layout(24.0);
//! container.on_content_size_change(80.0, 300.0);
//! container.scroll_by(3.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::Signal;

use super::context::{provide, ScrollContext};
use crate::primitives::{ContainerHandlers, ScrollContainerProps, StableCallback};
use crate::types::{ContentSize, NodeHandle};

// =============================================================================
// HANDLERS
// =============================================================================

/// Stable entry points for the host's event stream.
#[derive(Clone, Debug)]
pub struct SurfaceHandlers {
    pub on_scroll: StableCallback<f32>,
    pub on_layout: StableCallback<f32>,
    pub on_content_size_change: StableCallback<ContentSize>,
}

// =============================================================================
// CONTAINER
// =============================================================================

/// The outer scrollable container hosting nested draggable lists.
pub struct OuterScrollContainer {
    context: ScrollContext,
    handle: NodeHandle,
    props: Rc<RefCell<ContainerHandlers>>,
    handlers: SurfaceHandlers,
}

impl OuterScrollContainer {
    /// Mount a container over the scrollable surface `handle`.
    ///
    /// Creates a fresh [`ScrollContext`], records `handle` as the measurement
    /// anchor, and runs `props.children` with the context provided.
    pub fn mount(handle: NodeHandle, props: ScrollContainerProps) -> Self {
        let context = ScrollContext::create();
        context.set_scrollable(handle);

        let (handlers, children) = props.split();
        let props = Rc::new(RefCell::new(handlers));
        let handlers = SurfaceHandlers {
            on_scroll: StableCallback::noop(),
            on_layout: StableCallback::noop(),
            on_content_size_change: StableCallback::noop(),
        };

        let container = Self {
            context,
            handle,
            props,
            handlers,
        };
        container.bind_handlers();

        if let Some(children) = children {
            let _scope = provide(container.context.clone());
            children();
        }

        log::debug!(
            "outer scroll container {} mounted on {:?}",
            container.context.id(),
            handle
        );
        container
    }

    /// Install the handler bodies behind the stable handles.
    fn bind_handlers(&self) {
        let ctx = self.context.clone();
        let props = self.props.clone();
        self.handlers.on_scroll.wrap(move |&offset: &f32| {
            ctx.set_outer_scroll_offset(offset);
            let forward = props.borrow().on_scroll.clone();
            if let Some(on_scroll) = forward {
                on_scroll(offset);
            }
        });

        let ctx = self.context.clone();
        let props = self.props.clone();
        self.handlers.on_layout.wrap(move |&size: &f32| {
            ctx.set_container_size(size);
            let forward = props.borrow().on_layout.clone();
            if let Some(on_layout) = forward {
                on_layout(size);
            }
        });

        let ctx = self.context.clone();
        let props = self.props.clone();
        self.handlers
            .on_content_size_change
            .wrap(move |size: &ContentSize| {
                ctx.set_content_size(size.height);
                let forward = props.borrow().on_content_size_change.clone();
                if let Some(on_change) = forward {
                    on_change(size);
                }
            });
    }

    /// Swap in new caller props. Handles given to the host stay valid.
    ///
    /// Children only render at mount; any `children` here are ignored.
    pub fn set_props(&self, props: ScrollContainerProps) {
        let (handlers, _children) = props.split();
        *self.props.borrow_mut() = handlers;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The shared scroll state of this container.
    pub fn context(&self) -> &ScrollContext {
        &self.context
    }

    /// The scrollable surface this container wraps.
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Stable handles for the host to call on surface events.
    pub fn handlers(&self) -> SurfaceHandlers {
        self.handlers.clone()
    }

    /// Whether the surface currently accepts scroll gestures.
    ///
    /// Read inside an effect to follow changes.
    pub fn scroll_enabled(&self) -> bool {
        self.context.outer_scroll_enabled()
    }

    /// The enabled flag as a signal, for binding to the surface.
    pub fn scroll_enabled_signal(&self) -> Signal<bool> {
        self.context.outer_scroll_enabled_signal()
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.context.content_size() - self.context.container_size()).max(0.0)
    }

    // -------------------------------------------------------------------------
    // Host events
    // -------------------------------------------------------------------------

    /// The surface scrolled to `offset`.
    pub fn on_scroll(&self, offset: f32) {
        self.handlers.on_scroll.call(&offset);
    }

    /// The surface's viewport was laid out with height `size`.
    pub fn on_layout(&self, size: f32) {
        self.handlers.on_layout.call(&size);
    }

    /// The surface's content size changed.
    pub fn on_content_size_change(&self, width: f32, height: f32) {
        self.handlers
            .on_content_size_change
            .call(&ContentSize { width, height });
    }

    // -------------------------------------------------------------------------
    // Scroll operations
    // -------------------------------------------------------------------------

    /// Scroll to `offset`, clamped to the content.
    ///
    /// Programmatic: applies even while a nested drag holds the lock.
    pub fn scroll_to(&self, offset: f32) {
        let clamped = offset.clamp(0.0, self.max_scroll());
        self.on_scroll(clamped);
    }

    /// User scroll gesture by `delta` rows.
    ///
    /// Returns `false` if scrolling is locked or already at the boundary.
    pub fn scroll_by(&self, delta: f32) -> bool {
        if !self.scroll_enabled() {
            return false;
        }

        let current = self.context.outer_scroll_offset();
        let next = (current + delta).clamp(0.0, self.max_scroll());
        if next == current {
            return false;
        }

        self.on_scroll(next);
        true
    }

    /// Unmount. Nested lists holding the context keep a detached copy.
    pub fn unmount(self) {
        log::debug!("outer scroll container {} unmounted", self.context.id());
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NestError;
    use crate::state::context::{current_scroll_context, reset_scroll_contexts};
    use spark_signals::effect;
    use std::cell::Cell;

    fn setup() {
        reset_scroll_contexts();
    }

    fn mount() -> OuterScrollContainer {
        OuterScrollContainer::mount(NodeHandle::new(1), ScrollContainerProps::default())
    }

    fn sized(viewport: f32, content: f32) -> OuterScrollContainer {
        let container = mount();
        container.on_layout(viewport);
        container.on_content_size_change(80.0, content);
        container
    }

    #[test]
    fn test_mount_records_handle() {
        setup();

        let container = mount();
        assert_eq!(container.context().scrollable(), Some(NodeHandle::new(1)));
        assert_eq!(container.handle(), NodeHandle::new(1));
        assert!(container.scroll_enabled());
    }

    #[test]
    fn test_scroll_events_last_write_wins() {
        setup();

        let container = mount();
        for offset in [3.0, 9.0, 4.0, 27.5, 11.0] {
            container.on_scroll(offset);
        }
        assert_eq!(container.context().outer_scroll_offset(), 11.0);
    }

    #[test]
    fn test_scroll_events_delivered_in_order() {
        setup();

        let container = mount();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let offset = container.context().outer_scroll_offset_signal();
        let seen_clone = seen.clone();
        let _stop = effect(move || seen_clone.borrow_mut().push(offset.get()));

        for value in [1.0, 2.0, 5.0, 3.0] {
            container.on_scroll(value);
        }

        assert_eq!(*seen.borrow(), vec![0.0, 1.0, 2.0, 5.0, 3.0]);
    }

    #[test]
    fn test_layout_and_content_size() {
        setup();

        let container = sized(24.0, 300.0);
        assert_eq!(container.context().container_size(), 24.0);
        assert_eq!(container.context().content_size(), 300.0);
        assert_eq!(container.max_scroll(), 276.0);
    }

    #[test]
    fn test_content_size_forwards_original_event() {
        setup();

        let forwarded = Rc::new(Cell::new(None));
        let forwarded_clone = forwarded.clone();
        let container = OuterScrollContainer::mount(
            NodeHandle::new(1),
            ScrollContainerProps {
                on_content_size_change: Some(Rc::new(move |size: &ContentSize| {
                    forwarded_clone.set(Some(*size));
                })),
                ..Default::default()
            },
        );

        container.on_content_size_change(70.0, 140.0);

        assert_eq!(
            forwarded.get(),
            Some(ContentSize {
                width: 70.0,
                height: 140.0
            })
        );
        assert_eq!(container.context().content_size(), 140.0);
    }

    #[test]
    fn test_children_see_context() {
        setup();

        let seen_id = Rc::new(Cell::new(None));
        let seen_clone = seen_id.clone();
        let container = OuterScrollContainer::mount(
            NodeHandle::new(1),
            ScrollContainerProps {
                children: Some(Box::new(move || {
                    seen_clone.set(current_scroll_context().ok().map(|c| c.id()));
                })),
                ..Default::default()
            },
        );

        assert_eq!(seen_id.get(), Some(container.context().id()));
        // Provided only while children render.
        assert_eq!(current_scroll_context().err(), Some(NestError::MissingProvider));
    }

    #[test]
    fn test_scroll_by_clamps_and_reports() {
        setup();

        let container = sized(20.0, 50.0);

        assert!(container.scroll_by(25.0));
        assert_eq!(container.context().outer_scroll_offset(), 25.0);

        assert!(container.scroll_by(100.0));
        assert_eq!(container.context().outer_scroll_offset(), 30.0);

        assert!(!container.scroll_by(1.0));
        assert!(container.scroll_by(-100.0));
        assert_eq!(container.context().outer_scroll_offset(), 0.0);
        assert!(!container.scroll_by(-1.0));
    }

    #[test]
    fn test_scroll_by_refused_while_locked() {
        setup();

        let container = sized(20.0, 50.0);
        container.context().set_outer_scroll_enabled(false);

        assert!(!container.scroll_by(5.0));
        assert_eq!(container.context().outer_scroll_offset(), 0.0);

        container.context().set_outer_scroll_enabled(true);
        assert!(container.scroll_by(5.0));
    }

    #[test]
    fn test_scroll_to_ignores_lock() {
        setup();

        let container = sized(20.0, 50.0);
        container.context().set_outer_scroll_enabled(false);

        container.scroll_to(12.0);
        assert_eq!(container.context().outer_scroll_offset(), 12.0);

        container.scroll_to(-5.0);
        assert_eq!(container.context().outer_scroll_offset(), 0.0);
    }

    #[test]
    fn test_set_props_keeps_handler_identity() {
        setup();

        let container = mount();
        let host_copy = container.handlers();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        container.set_props(ScrollContainerProps {
            on_scroll: Some(Rc::new(move |_: f32| count_clone.set(count_clone.get() + 1))),
            ..Default::default()
        });

        assert!(host_copy.on_scroll.same_identity(&container.handlers().on_scroll));
        host_copy.on_scroll.call(&4.0);

        assert_eq!(count.get(), 1);
        assert_eq!(container.context().outer_scroll_offset(), 4.0);
    }

    #[test]
    fn test_scroll_enabled_follows_context() {
        setup();

        let container = mount();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let enabled = container.scroll_enabled_signal();
        let seen_clone = seen.clone();
        let _stop = effect(move || seen_clone.borrow_mut().push(enabled.get()));

        container.context().set_outer_scroll_enabled(false);
        container.context().set_outer_scroll_enabled(true);

        assert_eq!(*seen.borrow(), vec![true, false, true]);
    }
}
