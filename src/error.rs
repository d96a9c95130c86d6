use thiserror::Error;

use crate::{EdgeId, NodeId, PaletteError};

/// Rejection of an operation addressed to an element of the active view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("node `{0}` is not in the active view")]
    UnknownNode(NodeId),

    #[error("relation `{0}` is not in the active view")]
    UnknownRelation(EdgeId),

    #[error("node `{0}` already exists in the active view")]
    DuplicateNode(NodeId),

    #[error("relation `{0}` already exists in the active view")]
    DuplicateRelation(EdgeId),

    #[error("relation `{relation}` references missing node `{endpoint}`")]
    DanglingRelation { relation: EdgeId, endpoint: NodeId },

    #[error("node `{0}` is not a router")]
    NotARouter(NodeId),

    #[error(transparent)]
    Palette(#[from] PaletteError),
}
