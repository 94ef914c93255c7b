//! Scroll Context - Shared scroll state of one outer scroll container.
//!
//! Every outer container owns exactly one [`ScrollContext`]. The context is a
//! bundle of signal handles: cloning it shares the same signals, so a write
//! from any descendant is visible to every other holder without re-propagation.
//!
//! # API
//!
//! - `ScrollContext::create()` - Allocate a fresh bundle
//! - `provide(ctx)` - Make a context current for the returned scope
//! - `current_scroll_context()` - Read the innermost provided context
//!
//! Prefer passing the context explicitly. Ambient lookup exists for code
//! built inside a container's `children` render function, and fails fast with
//! [`NestError::MissingProvider`] outside one.

use std::cell::{Cell, RefCell};
use std::fmt;

use spark_signals::{signal, Signal};

use crate::error::NestError;
use crate::types::NodeHandle;

// =============================================================================
// SCROLL CONTEXT
// =============================================================================

/// Shared reactive scroll state for one outer container subtree.
#[derive(Clone)]
pub struct ScrollContext {
    id: u64,
    outer_scroll_offset: Signal<f32>,
    container_size: Signal<f32>,
    content_size: Signal<f32>,
    outer_scroll_enabled: Signal<bool>,
    scrollable: Signal<Option<NodeHandle>>,
}

thread_local! {
    static NEXT_CONTEXT_ID: Cell<u64> = const { Cell::new(0) };
}

impl ScrollContext {
    /// Allocate a bundle: offsets and sizes at zero, scrolling enabled, no handle.
    pub fn create() -> Self {
        let id = NEXT_CONTEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });

        Self {
            id,
            outer_scroll_offset: signal(0.0),
            container_size: signal(0.0),
            content_size: signal(0.0),
            outer_scroll_enabled: signal(true),
            scrollable: signal(None),
        }
    }

    /// Identity of this bundle. Clones share it.
    pub fn id(&self) -> u64 {
        self.id
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Current vertical scroll offset of the outer container.
    pub fn outer_scroll_offset(&self) -> f32 {
        self.outer_scroll_offset.get()
    }

    /// Viewport height of the outer container.
    pub fn container_size(&self) -> f32 {
        self.container_size.get()
    }

    /// Total scrollable content height.
    pub fn content_size(&self) -> f32 {
        self.content_size.get()
    }

    /// Whether the outer container accepts scroll gestures.
    pub fn outer_scroll_enabled(&self) -> bool {
        self.outer_scroll_enabled.get()
    }

    /// The outer scrollable surface, once mounted.
    pub fn scrollable(&self) -> Option<NodeHandle> {
        self.scrollable.get()
    }

    // -------------------------------------------------------------------------
    // Signals (for effects, deriveds and engines)
    // -------------------------------------------------------------------------

    /// Scroll offset as a signal, for effects and deriveds.
    pub fn outer_scroll_offset_signal(&self) -> Signal<f32> {
        self.outer_scroll_offset.clone()
    }

    /// Viewport height as a signal.
    pub fn container_size_signal(&self) -> Signal<f32> {
        self.container_size.clone()
    }

    /// Content height as a signal.
    pub fn content_size_signal(&self) -> Signal<f32> {
        self.content_size.clone()
    }

    /// Enabled flag as a signal; the outer surface binds to this.
    pub fn outer_scroll_enabled_signal(&self) -> Signal<bool> {
        self.outer_scroll_enabled.clone()
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub(crate) fn set_outer_scroll_offset(&self, offset: f32) {
        self.outer_scroll_offset.set(offset);
    }

    pub(crate) fn set_container_size(&self, size: f32) {
        self.container_size.set(size);
    }

    pub(crate) fn set_content_size(&self, size: f32) {
        self.content_size.set(size);
    }

    pub(crate) fn set_scrollable(&self, handle: NodeHandle) {
        self.scrollable.set(Some(handle));
    }

    /// Lock or unlock the outer container's scrolling.
    ///
    /// There is no reference count: with several nested lists under one
    /// container, overlapping drags race and the last writer wins.
    pub fn set_outer_scroll_enabled(&self, enabled: bool) {
        self.outer_scroll_enabled.set(enabled);
    }
}

impl fmt::Debug for ScrollContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollContext")
            .field("id", &self.id)
            .field("outer_scroll_offset", &self.outer_scroll_offset())
            .field("container_size", &self.container_size())
            .field("content_size", &self.content_size())
            .field("outer_scroll_enabled", &self.outer_scroll_enabled())
            .field("scrollable", &self.scrollable())
            .finish()
    }
}

// =============================================================================
// PROVIDER STACK
// =============================================================================

thread_local! {
    /// Contexts currently provided, innermost last.
    static PROVIDER_STACK: RefCell<Vec<ScrollContext>> = RefCell::new(Vec::new());
}

/// Keeps a context current until dropped.
#[must_use = "the context is only provided while the scope is alive"]
#[derive(Debug)]
pub struct ProviderScope {
    id: u64,
}

impl Drop for ProviderScope {
    fn drop(&mut self) {
        PROVIDER_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|ctx| ctx.id == self.id) {
                stack.remove(pos);
            }
        });
    }
}

/// Make `ctx` the current context until the returned scope is dropped.
pub fn provide(ctx: ScrollContext) -> ProviderScope {
    let id = ctx.id;
    PROVIDER_STACK.with(|stack| stack.borrow_mut().push(ctx));
    ProviderScope { id }
}

/// The innermost provided context.
///
/// Fails with [`NestError::MissingProvider`] when called outside any outer
/// scroll container.
pub fn current_scroll_context() -> Result<ScrollContext, NestError> {
    PROVIDER_STACK.with(|stack| stack.borrow().last().cloned().ok_or(NestError::MissingProvider))
}

/// Number of contexts currently provided.
pub fn provider_depth() -> usize {
    PROVIDER_STACK.with(|stack| stack.borrow().len())
}

/// Drop every provided context (for testing).
pub fn reset_scroll_contexts() {
    PROVIDER_STACK.with(|stack| stack.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
