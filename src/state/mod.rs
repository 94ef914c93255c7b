//! State Module - Reactive state systems for nested drag coordination
//!
//! - **Context** - Shared scroll state and its provider stack
//! - **Container** - The outer scroll container publishing that state
//! - **Coordinator** - Per-list drag lifecycle, measurement, hover offset
//! - **Measure** - Asynchronous layout measurement over a taffy tree
//! - **Autoscroll** - Edge auto-scroll while a drag is active
//! - **Input** - Terminal wheel events for the outer container

pub mod autoscroll;
pub mod container;
pub mod context;
pub mod coordinator;
pub mod input;
pub mod measure;

pub use autoscroll::{
    AutoScroll, AutoScrollConfig, AutoScrollDriver, AutoScrollInput, EdgeAutoScroll,
    AUTOSCROLL_SPEED, AUTOSCROLL_THRESHOLD,
};
pub use container::{OuterScrollContainer, SurfaceHandlers};
pub use context::{
    current_scroll_context, provide, provider_depth, reset_scroll_contexts, ProviderScope,
    ScrollContext,
};
pub use coordinator::{CoordinatorPhase, NestedDragCoordinator};
pub use input::{route_event, route_wheel, WHEEL_SCROLL};
pub use measure::{LayoutMeasurer, OnMeasureFailed, OnMeasured, TaffyMeasurer};
