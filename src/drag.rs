//! Drag-reparent state machine.
//!
//! At most one drag is in flight per tree, held as an explicit session
//! slot. Beginning a drag while one is active is rejected rather than
//! silently overwritten. A valid drop is committed as an atomic two-phase
//! move (detach from the original parent, append to the target) within one
//! update, so no deferred removal step is needed and recorded positions can
//! never go stale in between.

use generational_arena::Index;
use tracing::instrument;

use crate::arena::TreeArena;
use crate::error::{TreeError, TreeResult};
use crate::ident::NodeId;

/// Snapshot of an in-progress drag: the grabbed node and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub(crate) node: Index,
    /// Stable id of the dragged node.
    pub node_id: NodeId,
    /// Parent at drag start, None when the node was a root.
    pub(crate) origin_parent: Option<Index>,
    /// Position within the origin sequence at drag start.
    pub origin_index: usize,
}

/// Open a drag session for `id`. Rejected while another drag is active.
pub(crate) fn begin(
    arena: &TreeArena,
    active: Option<&DragSession>,
    id: NodeId,
) -> TreeResult<DragSession> {
    if let Some(session) = active {
        return Err(TreeError::DragInFlight(session.node_id));
    }
    let idx = arena.lookup(id).ok_or(TreeError::UnknownNode(id))?;
    let node = arena.get_node(idx).ok_or(TreeError::UnknownNode(id))?;
    let origin_parent = node.parent;
    let origin_index = arena
        .collection(origin_parent)
        .iter()
        .position(|&child| child == idx)
        .ok_or(TreeError::UnknownNode(id))?;

    Ok(DragSession {
        node: idx,
        node_id: id,
        origin_parent,
        origin_index,
    })
}

/// Check the three illegal-move conditions without mutating anything:
/// dropping a node onto itself, onto its current parent (which already owns
/// it), or into its own subtree (which would make it its own ancestor).
/// Returns the resolved target index.
pub(crate) fn validate(
    arena: &TreeArena,
    session: &DragSession,
    target_id: NodeId,
) -> TreeResult<Index> {
    let target = arena
        .lookup(target_id)
        .ok_or(TreeError::UnknownNode(target_id))?;
    if session.node == target {
        return Err(TreeError::SelfDrop(session.node_id));
    }
    let current_parent = arena.get_node(session.node).and_then(|node| node.parent);
    if current_parent == Some(target) {
        return Err(TreeError::AlreadyAttached {
            node: session.node_id,
            parent: target_id,
        });
    }
    if arena.is_ancestor(session.node, target) {
        return Err(TreeError::WouldCycle {
            node: session.node_id,
            target: target_id,
        });
    }
    Ok(target)
}

/// Validate and perform the move: detach the dragged node from its current
/// position and append it to the target's children, auto-expanding the
/// target.
#[instrument(level = "debug", skip(arena, session))]
pub(crate) fn commit(
    arena: &mut TreeArena,
    session: &DragSession,
    target_id: NodeId,
) -> TreeResult<()> {
    let target = validate(arena, session, target_id)?;

    arena.detach(session.node);
    arena.attach(session.node, target);
    if let Some(target_node) = arena.get_node_mut(target) {
        target_node.data.opened = true;
    }
    Ok(())
}
