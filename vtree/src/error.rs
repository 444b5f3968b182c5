use alloc::boxed::Box;

use crate::NodeId;

/// Failure reported by a row renderer. It aborts the render pass and is returned, untouched,
/// from the call that started the pass.
pub type RenderError = Box<dyn core::error::Error + Send + Sync>;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node already has a parent; detach it first.
    #[error("node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeId),
    /// The node (or the reference node of an insert) has no parent.
    #[error("node {0:?} is not attached to a parent")]
    NotAttached(NodeId),
    /// A reorder was applied without passing validation.
    #[error("node {node:?} cannot be dropped onto {target:?}")]
    InvalidDrop {
        node: Option<NodeId>,
        target: NodeId,
    },
    /// The handle is stale or belongs to another tree.
    #[error("node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),
    #[error("attaching {node:?} under {parent:?} would create a cycle")]
    WouldCycle { node: NodeId, parent: NodeId },
    #[error("the root node cannot be attached or discarded")]
    RootNode,
    #[error("row renderer failed")]
    Render(#[source] RenderError),
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}
