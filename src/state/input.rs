//! Input Module - Terminal wheel events for the outer container.
//!
//! Bridges crossterm's mouse events to [`OuterScrollContainer::scroll_by`].
//! Only the wheel is handled here: presses, drags and moves belong to the
//! inner reorder engine's gesture recognition.
//!
//! # API
//!
//! - `route_wheel` - Apply a wheel event to a container
//! - `route_event` - Same, for any terminal event
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::{poll, read};
//!
//! loop {
//!     if poll(Duration::from_millis(16))? {
//!         route_event(&container, &read()?);
//!     }
//!     driver.tick(&container, &list);
//! }
//! ```

use crossterm::event::{Event as CrosstermEvent, MouseEvent as CrosstermMouseEvent, MouseEventKind};

use super::container::OuterScrollContainer;

/// Rows scrolled per wheel notch.
pub const WHEEL_SCROLL: f32 = 3.0;

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Apply a wheel event to `container`.
///
/// Returns true if the container scrolled. A wheel event while a nested drag
/// holds the lock is swallowed without scrolling and reports false.
pub fn route_wheel(container: &OuterScrollContainer, event: &CrosstermMouseEvent) -> bool {
    let delta = match event.kind {
        MouseEventKind::ScrollUp => -WHEEL_SCROLL,
        MouseEventKind::ScrollDown => WHEEL_SCROLL,
        _ => return false,
    };

    if !container.scroll_enabled() {
        log::trace!("wheel at row {} ignored: outer scroll locked", event.row);
        return false;
    }

    container.scroll_by(delta)
}

/// Route any terminal event. Non-mouse events are not consumed.
pub fn route_event(container: &OuterScrollContainer, event: &CrosstermEvent) -> bool {
    match event {
        CrosstermEvent::Mouse(mouse) => route_wheel(container, mouse),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
