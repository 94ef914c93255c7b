//! Primitives - Props, callbacks and value types shared across the state modules.
//!
//! - [`StableCallback`] - handler handles whose identity survives re-renders
//! - [`NestableListProps`] / [`InnerListProps`] - caller-facing and engine-facing list props
//! - [`ScrollContainerProps`] - outer container props
//! - [`AnimValues`] / [`NestedAnimValues`] - animated values handed over by the engine

mod callback;
mod types;

pub use callback::StableCallback;
pub use types::*;
