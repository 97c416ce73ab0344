//! Core errors.
//!
//! Gesture entry points on [`Tree`](crate::Tree) swallow these into silent
//! no-ops; the typed variants exist on the lower-level operations so callers
//! and tests can observe why something was rejected.

use thiserror::Error;

use crate::ident::NodeId;
use crate::load::LoadTarget;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("dragging is disabled")]
    DraggingDisabled,

    #[error("drag already in flight for node {0}")]
    DragInFlight(NodeId),

    #[error("no drag in flight")]
    NoActiveDrag,

    #[error("cannot drop node {0} onto itself")]
    SelfDrop(NodeId),

    #[error("node {node} is already a child of {parent}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    #[error("dropping node {node} onto {target} would create a cycle")]
    WouldCycle { node: NodeId, target: NodeId },

    #[error("stale load completion for {target} (generation {generation})")]
    StaleLoad { target: LoadTarget, generation: u64 },

    #[error("no loading placeholder pending at {target}")]
    NoPlaceholder { target: LoadTarget },
}

pub type TreeResult<T> = Result<T, TreeError>;
