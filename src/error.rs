//! Error types.

use thiserror::Error;

use crate::types::NodeHandle;

/// Errors surfaced by the coordination layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NestError {
    /// Shared scroll state was read outside an outer scroll container.
    ///
    /// This is an integration bug, not a runtime condition.
    #[error("scroll context read outside of an outer scroll container")]
    MissingProvider,

    /// The host could not resolve a node's position relative to an anchor.
    #[error("cannot measure node {node:?} relative to {relative_to:?}")]
    MeasurementFailed {
        node: NodeHandle,
        relative_to: NodeHandle,
    },

    /// The layout engine rejected an operation.
    #[error("layout engine error: {0}")]
    Layout(String),
}

impl From<taffy::TaffyError> for NestError {
    fn from(err: taffy::TaffyError) -> Self {
        NestError::Layout(err.to_string())
    }
}
