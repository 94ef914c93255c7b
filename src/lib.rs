//! # spark-nestable
//!
//! Nested drag-to-reorder lists inside an outer scroll container.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! An outer scroll container publishes its scroll state as a bundle of
//! signals. Every draggable list nested inside it gets a coordinator that
//! measures where the list sits in the outer content, translates the inner
//! engine's hover offset into outer coordinates, and locks outer scrolling
//! for the duration of a drag:
//!
//! ```text
//! host events → OuterScrollContainer → ScrollContext (signals)
//!                                          │
//!            inner engine ⇄ NestedDragCoordinator ⇄ LayoutMeasurer
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Node handles and event payloads
//! - [`error`] - [`NestError`]
//! - [`primitives`] - Props, stable callbacks, animated values
//! - [`state`] - Context, container, coordinator, measurement, auto-scroll, input

pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use error::NestError;
pub use types::*;

pub use primitives::{
    AnimValues, CombinedOffset, InnerListProps, NestableListProps, NestedAnimValues,
    ScrollContainerProps, StableCallback, DEFAULT_ACTIVATION_DISTANCE,
};

pub use state::{
    // Context
    current_scroll_context, provide, reset_scroll_contexts, ProviderScope, ScrollContext,
    // Container
    OuterScrollContainer, SurfaceHandlers,
    // Coordinator
    CoordinatorPhase, NestedDragCoordinator,
    // Measurement
    LayoutMeasurer, TaffyMeasurer,
    // Auto-scroll
    AutoScroll, AutoScrollConfig, AutoScrollDriver, AutoScrollInput, EdgeAutoScroll,
    // Input
    route_event, route_wheel,
};
