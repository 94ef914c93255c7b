//! Auto-Scroll - Scrolls the outer container while a drag hovers near an edge.
//!
//! The hover offset is in outer content coordinates, so its distance to the
//! viewport edges is a plain subtraction against the outer scroll offset:
//!
//! ```text
//!   to_top    = hover - scroll
//!   to_bottom = scroll + viewport - hover
//! ```
//!
//! A strategy turns those inputs into a target offset. The driver applies the
//! target through [`OuterScrollContainer::scroll_to`], which bypasses the
//! scroll lock the drag itself holds.

use super::container::OuterScrollContainer;
use super::coordinator::NestedDragCoordinator;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Distance from a viewport edge that triggers auto-scroll.
pub const AUTOSCROLL_THRESHOLD: f32 = 30.0;

/// Rows scrolled per tick.
pub const AUTOSCROLL_SPEED: f32 = 100.0;

// =============================================================================
// STRATEGY
// =============================================================================

/// Snapshot of the values an auto-scroll decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoScrollInput {
    pub hover_offset: f32,
    pub scroll_offset: f32,
    pub container_size: f32,
    pub content_size: f32,
}

impl AutoScrollInput {
    /// Largest valid scroll offset for these sizes.
    pub fn max_scroll(&self) -> f32 {
        (self.content_size - self.container_size).max(0.0)
    }
}

/// Decides where the outer container should scroll during a drag.
pub trait AutoScroll {
    /// Target offset, or `None` to leave the container where it is.
    fn scroll_target(&self, input: &AutoScrollInput) -> Option<f32>;
}

/// Tuning for [`EdgeAutoScroll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollConfig {
    pub threshold: f32,
    pub speed: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            threshold: AUTOSCROLL_THRESHOLD,
            speed: AUTOSCROLL_SPEED,
        }
    }
}

/// Jumps by a fixed step when the hover is within `threshold` of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeAutoScroll {
    pub config: AutoScrollConfig,
}

impl EdgeAutoScroll {
    /// Edge auto-scroll with custom tuning.
    pub fn new(config: AutoScrollConfig) -> Self {
        Self { config }
    }
}

impl AutoScroll for EdgeAutoScroll {
    fn scroll_target(&self, input: &AutoScrollInput) -> Option<f32> {
        let max = input.max_scroll();
        if max <= 0.0 {
            return None;
        }

        let AutoScrollConfig { threshold, speed } = self.config;
        let scroll = input.scroll_offset;

        let to_top = input.hover_offset - scroll;
        if to_top < threshold && scroll > 0.0 {
            return Some((scroll - speed).max(0.0));
        }

        let to_bottom = scroll + input.container_size - input.hover_offset;
        if to_bottom < threshold && scroll < max {
            return Some((scroll + speed).min(max));
        }

        None
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Applies an [`AutoScroll`] strategy on every host frame.
#[derive(Debug, Clone, Default)]
pub struct AutoScrollDriver<S = EdgeAutoScroll> {
    strategy: S,
}

impl<S: AutoScroll> AutoScrollDriver<S> {
    /// Driver applying `strategy`.
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// The strategy in use.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run one frame. Returns the offset scrolled to, if any.
    ///
    /// Does nothing unless `list` is dragging.
    pub fn tick<E: Clone>(
        &self,
        container: &OuterScrollContainer,
        list: &NestedDragCoordinator<E>,
    ) -> Option<f32> {
        if !list.is_dragging() {
            return None;
        }

        let ctx = container.context();
        let input = AutoScrollInput {
            hover_offset: list.hover_offset().get(),
            scroll_offset: ctx.outer_scroll_offset(),
            container_size: ctx.container_size(),
            content_size: ctx.content_size(),
        };

        let target = self.strategy.scroll_target(&input)?;
        log::trace!("auto-scroll {} -> {target}", input.scroll_offset);
        container.scroll_to(target);
        Some(target)
    }
}

// =============================================================================
// TESTS
// =============================================================================
