//! Node identity: stable ids and per-tree id generation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a tree node.
///
/// Unique within one [`Tree`](crate::Tree) for the tree's lifetime; once
/// assigned it never changes and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source scoped to one tree instance.
///
/// Raw records may carry an explicit `id`; [`observe`](Self::observe) advances
/// the counter past it so later generated ids stay unique.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first id is `start`. Lets a host partition id spaces
    /// across tree instances.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    pub fn observe(&mut self, id: NodeId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}
