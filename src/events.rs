//! Notifications for the embedding UI.
//!
//! Operations only mutate state and push events; the host drains the queue
//! with [`Tree::take_events`](crate::Tree::take_events) after each update and
//! reacts (redraw, emit to listeners). Events are pushed after the internal
//! mutation settles, so observers always see the final state.

use crate::ident::NodeId;

/// Observable effect of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A node was clicked; selection has already been updated.
    ItemClick { id: NodeId },
    /// A node was moved under a new parent by a valid drop.
    ItemDrop { id: NodeId, new_parent: NodeId },
}
